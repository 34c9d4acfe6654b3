//! `pcc login`: the session is opened before dispatch, so reaching this
//! handler means the console accepted the credentials.

use pcc_api::Client;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[allow(clippy::unnecessary_wraps)]
pub fn handle(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    output::print_output(
        &format!(
            "Authenticated as {} at {}",
            client.username(),
            client.base_url()
        ),
        global.quiet,
    );
    Ok(())
}
