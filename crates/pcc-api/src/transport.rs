// Transport configuration for building the console's reqwest::Client.
//
// TLS trust, timeout, and user agent live here so the session code only
// deals with URLs, tokens, and payloads.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("pcc/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed consoles).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Map the console's skip-certificate-verification flag onto a TLS mode.
    pub fn from_skip_verification(skip: bool) -> Self {
        Self {
            tls: if skip {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
