//! Shared configuration for the `pcc` CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation into `pcc_api::Credentials` / `pcc_api::TransportConfig`.
//! The CLI layers its `GlobalOpts` flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pcc_api::{Credentials, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix for environment overrides. Nested keys use `__`,
/// e.g. `PCC_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "PCC_";

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "pcc";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in configuration")]
    ProfileNotFound { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named console profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: explicit request, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names().join(", "),
            })
    }

    /// Profile names in sorted order.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds. `0` disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named console profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Console base URL (e.g., "https://console.example.com:8083").
    pub console: String,

    /// Username for console authentication.
    pub username: Option<String>,

    /// Plaintext password. Keyring or env var lookups take precedence.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "pcc", "pcc").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pcc");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still honouring environment overrides.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading configuration");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable configuration");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve the username: profile, then `PCC_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(format!("{ENV_PREFIX}USERNAME")).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. PCC_PASSWORD
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}PASSWORD")) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation into pcc-api inputs ─────────────────────────────────

/// Check that a console URL parses and can carry API paths.
pub fn validate_console_url(raw: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: "console".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Validation {
            field: "console".into(),
            reason: format!("'{raw}' is not a console URL"),
        });
    }
    Ok(())
}

/// Whether TLS verification is disabled for this profile.
pub fn profile_insecure(profile: &Profile, defaults: &Defaults) -> bool {
    profile.insecure.unwrap_or(defaults.insecure)
}

/// Build the login descriptor for a profile.
pub fn profile_to_credentials(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<Credentials, ConfigError> {
    validate_console_url(&profile.console)?;
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    Ok(Credentials::new(profile.console.clone(), username, password)
        .skip_cert_verification(profile_insecure(profile, defaults)))
}

/// Build the transport config for a profile.
pub fn profile_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile_insecure(profile, defaults) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = match profile.timeout.unwrap_or(defaults.timeout) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    TransportConfig { tls, timeout }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
        default_profile = "prod"

        [defaults]
        timeout = 45

        [profiles.prod]
        console = "https://console.example.com:8083"
        username = "admin"
        password_env = "PROD_CONSOLE_PASSWORD"

        [profiles.lab]
        console = "https://lab.internal"
        username = "tester"
        password = "plain-pw"
        insecure = true
        timeout = 0
    "#;

    fn load_sample(jail: &mut Jail) -> Config {
        jail.create_file("config.toml", SAMPLE).unwrap();
        load_config_from(Path::new("config.toml")).unwrap()
    }

    #[test]
    fn parses_profiles_and_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_sample(jail);
            assert_eq!(cfg.active_profile_name(None), "prod");
            assert_eq!(cfg.active_profile_name(Some("lab")), "lab");
            assert_eq!(cfg.defaults.timeout, 45);
            assert_eq!(cfg.defaults.output, "table");
            assert_eq!(cfg.profile_names(), vec!["lab".to_owned(), "prod".to_owned()]);
            assert_eq!(cfg.profile("prod").unwrap().username.as_deref(), Some("admin"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("does-not-exist.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert!(cfg.profiles.is_empty());
            assert_eq!(cfg.defaults.timeout, 30);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.set_env("PCC_DEFAULTS__TIMEOUT", "5");
            jail.set_env("PCC_DEFAULT_PROFILE", "lab");
            let cfg = load_sample(jail);
            assert_eq!(cfg.defaults.timeout, 5);
            assert_eq!(cfg.active_profile_name(None), "lab");
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_lists_available() {
        Jail::expect_with(|jail| {
            let cfg = load_sample(jail);
            match cfg.profile("staging") {
                Err(ConfigError::ProfileNotFound { name, available }) => {
                    assert_eq!(name, "staging");
                    assert_eq!(available, "lab, prod");
                }
                other => panic!("expected ProfileNotFound, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("PROD_CONSOLE_PASSWORD", "from-env");
            let profile = Profile {
                console: "https://console.example.com".into(),
                username: Some("admin".into()),
                password: Some("from-file".into()),
                password_env: Some("PROD_CONSOLE_PASSWORD".into()),
                ..Profile::default()
            };
            let pw = resolve_password(&profile, "prod").unwrap();
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn credentials_and_transport_from_profile() {
        Jail::expect_with(|jail| {
            jail.set_env("PCC_PASSWORD", "env-pw");
            let cfg = load_sample(jail);

            let prod = cfg.profile("prod").unwrap();
            let creds = profile_to_credentials(prod, "prod", &cfg.defaults).unwrap();
            assert_eq!(creds.console_url, "https://console.example.com:8083");
            assert_eq!(creds.username, "admin");
            assert_eq!(creds.password.expose_secret(), "env-pw");
            assert!(!creds.skip_cert_verification);

            let transport = profile_transport(prod, &cfg.defaults);
            assert_eq!(transport.tls, TlsMode::System);
            assert_eq!(transport.timeout, Some(Duration::from_secs(45)));

            let lab = cfg.profile("lab").unwrap();
            let creds = profile_to_credentials(lab, "lab", &cfg.defaults).unwrap();
            assert!(creds.skip_cert_verification);

            let transport = profile_transport(lab, &cfg.defaults);
            assert_eq!(transport.tls, TlsMode::DangerAcceptInvalid);
            assert_eq!(transport.timeout, None);
            Ok(())
        });
    }

    #[test]
    fn custom_ca_is_used_when_verifying() {
        let profile = Profile {
            console: "https://console.example.com".into(),
            ca_cert: Some(PathBuf::from("/etc/pcc/ca.pem")),
            ..Profile::default()
        };
        let transport = profile_transport(&profile, &Defaults::default());
        assert_eq!(transport.tls, TlsMode::CustomCa(PathBuf::from("/etc/pcc/ca.pem")));
    }

    #[test]
    fn invalid_console_url_is_rejected() {
        let profile = Profile {
            console: "console.example.com".into(),
            username: Some("admin".into()),
            password: Some("pw".into()),
            ..Profile::default()
        };
        let err = profile_to_credentials(&profile, "bad", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "console"));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                console: "https://console.example.com".into(),
                username: Some("admin".into()),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.console, "https://console.example.com");
        assert_eq!(profile.username.as_deref(), Some("admin"));
        assert_eq!(profile.insecure, Some(true));
        assert!(profile.password.is_none());
    }
}
