//! Registry settings command handlers.

use std::fmt::Write;

use pcc_api::Client;
use pcc_api::settings::{RegistrySettings, RegistrySpecification};

use crate::cli::{GlobalOpts, RegistryArgs, RegistryCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Table view: one line per specification.
fn format_settings(settings: &RegistrySettings) -> String {
    let mut out = String::new();
    if !settings.webhook_url_suffix.is_empty() {
        let _ = writeln!(out, "Webhook URL suffix: {}", settings.webhook_url_suffix);
    }
    if !settings.harbor_scanner_url_suffix.is_empty() {
        let _ = writeln!(
            out,
            "Harbor scanner URL suffix: {}",
            settings.harbor_scanner_url_suffix
        );
    }
    let _ = writeln!(out, "Specifications: {}", settings.specifications.len());
    for spec in &settings.specifications {
        let _ = writeln!(out, "  {}", spec_line(spec));
    }
    out.trim_end().to_owned()
}

fn spec_line(spec: &RegistrySpecification) -> String {
    let registry = if spec.registry.is_empty() {
        "docker.io"
    } else {
        &spec.registry
    };
    let mut line = format!("{registry}/{}", spec.repository);
    if !spec.tag.is_empty() {
        let _ = write!(line, ":{}", spec.tag);
    }
    let _ = write!(line, " (os={}", if spec.os.is_empty() { "linux" } else { &spec.os });
    if spec.cap > 0 {
        let _ = write!(line, ", cap={}", spec.cap);
    }
    if spec.scanners > 0 {
        let _ = write!(line, ", scanners={}", spec.scanners);
    }
    if !spec.credential_id.is_empty() {
        let _ = write!(line, ", credential={}", spec.credential_id);
    }
    line.push(')');
    line
}

pub async fn handle(
    client: &Client,
    args: RegistryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegistryCommand::Get => {
            let settings = client.registry_settings().await?;
            let out = output::render_single(global.format(), &settings, format_settings, |s| {
                s.specifications
                    .iter()
                    .map(|spec| spec.repository.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RegistryCommand::Update { from_file } => {
            let settings: RegistrySettings = util::read_json_file(&from_file)?;
            client.update_registry_settings(&settings).await?;
            output::status(
                &format!(
                    "Registry settings updated ({} specifications)",
                    settings.specifications.len()
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
