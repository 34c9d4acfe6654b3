//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: config::Defaults {
            output: cfg.defaults.output.clone(),
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.password.is_some() {
                    p.password = Some(REDACTED.into());
                }
                (name.clone(), p)
            })
            .collect(),
    }
}

/// TOML-like view of the config, secrets masked.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for name in cfg.profile_names() {
        let p = &cfg.profiles[&name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "console = \"{}\"", p.console);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{REDACTED}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_password() -> Result<String, CliError> {
    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(pass)
}

/// Store the password in the keyring or hand it back for the config file.
fn prompt_password_storage(profile_name: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(profile_name, &password)?;
        eprintln!("   Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let format = config::output_format(global, &cfg);
            let out = output::render_single(format, &redacted(&cfg), format_config_redacted, |c| {
                c.profile_names().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let password = prompt_password()?;
            config::store_password(&profile_name, &password)?;
            output::status(
                &format!("Password for profile '{profile_name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("pcc configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let console: String = Input::new()
        .with_prompt("Console URL")
        .default("https://localhost:8083".into())
        .validate_with(|input: &String| {
            pcc_config::validate_console_url(input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = prompt_password()?;
    let password = prompt_password_storage(&profile_name, password)?;

    let insecure = Confirm::new()
        .with_prompt("Skip TLS certificate verification (self-signed console)?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        console,
        username: Some(username),
        password,
        insecure: insecure.then_some(true),
        ..Profile::default()
    };

    if cfg.profiles.is_empty() || cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }
    cfg.profiles.insert(profile_name.clone(), profile);

    config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: pcc login --profile {profile_name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                console: "https://lab.internal".into(),
                username: Some("tester".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_passwords() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("console = \"https://lab.internal\""));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn structured_output_masks_passwords() {
        let cfg = redacted(&sample());
        assert_eq!(cfg.profiles["lab"].password.as_deref(), Some(REDACTED));
        assert_eq!(cfg.profiles["lab"].username.as_deref(), Some("tester"));
    }
}
