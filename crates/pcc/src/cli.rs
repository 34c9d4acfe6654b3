//! Clap derive structures for the `pcc` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pcc -- manage a Prisma Cloud Compute console from the command line
#[derive(Debug, Parser)]
#[command(
    name = "pcc",
    version,
    about = "Manage Prisma Cloud Compute consoles from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "PCC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console URL (overrides profile)
    #[arg(long, short = 'c', env = "PCC_CONSOLE", global = true)]
    pub console: Option<String>,

    /// Console username (overrides profile)
    #[arg(long, short = 'u', env = "PCC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Console password
    #[arg(long, env = "PCC_PASSWORD", global = true, hide = true, hide_env = true)]
    pub password: Option<String>,

    /// Output format [default: profile defaults, else table]
    #[arg(long, short = 'o', env = "PCC_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "PCC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, env = "PCC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate against the console and report the result
    Login,

    /// Manage access groups
    #[command(alias = "group", alias = "g")]
    Groups(GroupsArgs),

    /// View and replace registry scan settings
    #[command(alias = "reg")]
    Registry(RegistryArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List all groups
    #[command(alias = "ls")]
    List,

    /// Create a group
    Create(GroupInput),

    /// Update a group (matched by name)
    Update(GroupInput),

    /// Delete a group
    #[command(alias = "rm")]
    Delete {
        /// Group name
        name: String,
    },
}

/// Group definition: a JSON file or the common fields as flags.
#[derive(Debug, Args)]
pub struct GroupInput {
    /// Read the full group definition from a JSON file
    #[arg(long, short = 'f', conflicts_with_all = ["name", "role"])]
    pub from_file: Option<PathBuf>,

    /// Group name
    #[arg(long, required_unless_present = "from_file")]
    pub name: Option<String>,

    /// Console role granted to members
    #[arg(long)]
    pub role: Option<String>,
}

// ── Registry ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegistryCommand {
    /// Show the current registry scan settings
    Get,

    /// Replace the registry scan settings
    Update {
        /// JSON file holding the complete settings document
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the resolved configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
