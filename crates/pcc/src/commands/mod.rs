//! Command handlers, one module per top-level command.

pub mod config_cmd;
pub mod groups;
pub mod login;
pub mod registry;
pub mod util;

use pcc_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a console command to its handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(client, global),
        Command::Groups(args) => groups::handle(client, args, global).await,
        Command::Registry(args) => registry::handle(client, args, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
