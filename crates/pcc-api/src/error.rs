use thiserror::Error;

/// Top-level error type for the `pcc-api` crate.
///
/// Covers every failure mode of the console client: URL handling, request
/// encoding, transport, authentication, status checks, and response decoding.
/// The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed: missing credentials, rejected credentials, or a
    /// malformed token response. The underlying failure, if any, is kept
    /// as the source.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint resolved to a URL that cannot carry path segments.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The caller cancelled the request before a response arrived.
    #[error("Request cancelled")]
    Cancelled,

    // ── Status ──────────────────────────────────────────────────────
    /// The console answered with anything other than `200 OK`.
    ///
    /// The message carries the code only. The raw response body is kept
    /// in `body` for callers that want to inspect it.
    #[error("Non-OK status: {status}")]
    NonOkStatus { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Request body could not be encoded as JSON.
    #[error("Request encoding error: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn authentication_caused_by(message: impl Into<String>, cause: Error) -> Self {
        Self::Authentication {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NonOkStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Authentication {
                source: Some(inner),
                ..
            } => inner.status(),
            _ => None,
        }
    }

    /// Returns `true` if the console reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the failure is an authentication problem, either a
    /// failed login or a request rejected with 401/403.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::NonOkStatus { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// Returns `true` if the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Authentication {
                source: Some(inner),
                ..
            } => inner.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the console could not be reached at all.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect(),
            Self::Authentication {
                source: Some(inner),
                ..
            } => inner.is_connect(),
            _ => false,
        }
    }
}
