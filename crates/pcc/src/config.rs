//! CLI configuration: thin layer over `pcc_config`.
//!
//! Applies `GlobalOpts` flag overrides (--console, --username, --password,
//! --insecure, --timeout) on top of the selected profile.

use clap::ValueEnum;
use secrecy::SecretString;

use pcc_api::{Credentials, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use pcc_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_password,
};

/// Everything needed to open a console session.
#[derive(Debug)]
pub struct Session {
    pub profile: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Output format: flag, then config default, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Merge the profile (if any) with flag overrides into a session.
pub fn resolve_session(global: &GlobalOpts, config: &Config) -> Result<Session, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        // An explicitly requested profile must exist unless the flags
        // describe the console on their own.
        None if global.profile.is_some() && global.console.is_none() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: config.profile_names().join(", "),
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);

    if profile.console.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    let credentials = match global.password {
        Some(ref pw) => {
            pcc_config::validate_console_url(&profile.console)?;
            let username = pcc_config::resolve_username(&profile, &profile_name)?;
            Credentials::new(
                profile.console.clone(),
                username,
                SecretString::from(pw.clone()),
            )
            .skip_cert_verification(pcc_config::profile_insecure(&profile, &config.defaults))
        }
        None => pcc_config::profile_to_credentials(&profile, &profile_name, &config.defaults)?,
    };
    let transport = pcc_config::profile_transport(&profile, &config.defaults);

    Ok(Session {
        profile: profile_name,
        credentials,
        transport,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref console) = global.console {
        profile.console.clone_from(console);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
