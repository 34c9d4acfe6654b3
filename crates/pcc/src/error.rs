//! CLI error types with miette diagnostics.
//!
//! Maps `pcc_api::Error` and `pcc_config::ConfigError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pcc_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to console at {url}")]
    #[diagnostic(
        code(pcc::connection_failed),
        help(
            "Check that the console is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: pcc_api::Error,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(pcc::tls_error),
        help(
            "Check the ca_cert path in your profile.\n\
             For self-signed consoles use --insecure (-k)."
        )
    )]
    TlsError { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed for profile '{profile}': {reason}")]
    #[diagnostic(
        code(pcc::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: pcc config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, reason: String },

    #[error("Console rejected the request: {reason}")]
    #[diagnostic(
        code(pcc::unauthorized),
        help(
            "The session's user lacks permission, or the token is no longer valid.\n\
             Check the account's role, then retry."
        )
    )]
    Unauthorized { reason: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(pcc::no_credentials),
        help(
            "Configure credentials with: pcc config init\n\
             Or set PCC_USERNAME and PCC_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pcc::not_found),
        help("Run: pcc {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Console returned HTTP {status}")]
    #[diagnostic(code(pcc::api_error))]
    ApiError {
        status: u16,
        /// Response body, shown as help when the console sent one.
        #[help]
        body: Option<String>,
    },

    #[error("Request failed: {0}")]
    #[diagnostic(code(pcc::request_failed))]
    Request(#[source] pcc_api::Error),

    #[error("Request timed out")]
    #[diagnostic(
        code(pcc::timeout),
        help("Increase the timeout with --timeout or check console responsiveness.")
    )]
    Timeout,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pcc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pcc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: pcc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No console configured")]
    #[diagnostic(
        code(pcc::no_config),
        help(
            "Create a profile with: pcc config init\n\
             Or pass --console and credentials directly.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(pcc::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(pcc::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::Unauthorized { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Map a failed login into an error naming the profile.
    pub fn from_login(err: pcc_api::Error, profile: &str) -> Self {
        if err.is_auth_failure() && !err.is_connect() && !err.is_timeout() {
            return Self::AuthFailed {
                profile: profile.into(),
                reason: error_chain(&err),
            };
        }
        err.into()
    }
}

/// Join an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

// ── pcc_api::Error → CliError ────────────────────────────────────────

impl From<pcc_api::Error> for CliError {
    fn from(err: pcc_api::Error) -> Self {
        if err.is_connect() {
            let url = transport_url(&err).unwrap_or_else(|| "(unknown)".into());
            return Self::ConnectionFailed { url, source: err };
        }
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            pcc_api::Error::Tls(reason) => Self::TlsError { reason },
            pcc_api::Error::NonOkStatus { status: 401 | 403, .. }
            | pcc_api::Error::Authentication { .. } => Self::Unauthorized {
                reason: error_chain(&err),
            },
            pcc_api::Error::NonOkStatus { status, body } => Self::ApiError {
                status,
                body: Some(body).filter(|b| !b.trim().is_empty()),
            },
            other => Self::Request(other),
        }
    }
}

fn transport_url(err: &pcc_api::Error) -> Option<String> {
    match err {
        pcc_api::Error::Transport(e) => e.url().map(ToString::to_string),
        pcc_api::Error::Authentication {
            source: Some(inner),
            ..
        } => transport_url(inner),
        _ => None,
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_map_to_exit_codes() {
        let not_found: CliError = pcc_api::Error::NonOkStatus {
            status: 404,
            body: String::new(),
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let forbidden: CliError = pcc_api::Error::NonOkStatus {
            status: 403,
            body: String::new(),
        }
        .into();
        assert_eq!(forbidden.exit_code(), exit_code::AUTH);

        let server: CliError = pcc_api::Error::NonOkStatus {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn config_errors_keep_their_category() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "lab".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err: CliError = ConfigError::Validation {
            field: "console".into(),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn login_failure_names_profile() {
        let err = CliError::from_login(
            pcc_api::Error::NonOkStatus {
                status: 401,
                body: String::new(),
            },
            "prod",
        );
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "prod"));
    }

    #[test]
    fn rejected_request_help_names_no_profile() {
        let err: CliError = pcc_api::Error::NonOkStatus {
            status: 403,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, CliError::Unauthorized { .. }), "got: {err:?}");
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let help = err.help().unwrap().to_string();
        assert!(!help.contains("current"), "help: {help}");
        assert!(!help.contains("--profile"), "help: {help}");
    }

    #[test]
    fn api_error_help_only_when_body_present() {
        let empty: CliError = pcc_api::Error::NonOkStatus {
            status: 500,
            body: String::new(),
        }
        .into();
        assert!(empty.help().is_none());

        let blank: CliError = pcc_api::Error::NonOkStatus {
            status: 500,
            body: "  \n".into(),
        }
        .into();
        assert!(blank.help().is_none());

        let with_body: CliError = pcc_api::Error::NonOkStatus {
            status: 500,
            body: "database locked".into(),
        }
        .into();
        assert_eq!(
            with_body.help().as_ref().map(ToString::to_string).as_deref(),
            Some("database locked")
        );
    }
}
