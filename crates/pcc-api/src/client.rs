// Console session
//
// Holds the normalized console URL, the login credentials, the bearer token,
// and the reqwest client built from the transport config. Authentication lives
// in `auth.rs`, request dispatch in `request.rs`, and resource endpoints in
// their own modules, all as inherent methods on `Client`.

use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig};

/// An authenticated connection to a Prisma Cloud Compute console.
///
/// `Client` is `Send + Sync`; share it behind an `Arc` to issue concurrent
/// requests. Each request reads the token once when it starts, so a
/// re-authentication running alongside never tears an in-flight call.
#[derive(Debug)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    token: RwLock<Option<SecretString>>,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a credentials descriptor and authenticate.
    ///
    /// The transport honours the descriptor's skip-certificate-verification
    /// flag. No client is returned if authentication fails.
    pub async fn connect(credentials: Credentials) -> Result<Self, Error> {
        let transport = credentials.transport();
        Self::connect_with_transport(credentials, &transport).await
    }

    /// Like [`connect`](Self::connect) with an explicit transport config
    /// (custom CA, timeout).
    pub async fn connect_with_transport(
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let client = Self::new(credentials, transport)?;
        client.authenticate().await?;
        Ok(client)
    }

    /// Build an unauthenticated client. Call
    /// [`authenticate`](Self::authenticate) before issuing requests.
    ///
    /// A set skip-certificate-verification flag on the descriptor overrides
    /// the transport's TLS mode.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        let mut transport = transport.clone();
        if credentials.skip_cert_verification {
            transport.tls = TlsMode::DangerAcceptInvalid;
        }
        let http = transport.build_client()?;
        Self::with_client(
            http,
            &credentials.console_url,
            credentials.username,
            credentials.password,
        )
    }

    /// Wrap an existing `reqwest::Client` (caller manages TLS and timeouts).
    pub fn with_client(
        http: reqwest::Client,
        console_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(console_url)?,
            username: username.into(),
            password,
            token: RwLock::new(None),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The console base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// A snapshot of the current bearer token.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the bearer token, e.g. with one obtained out of band.
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }
}

/// Parse a console URL and make sure its path ends with `/`, so relative
/// endpoints append to it instead of replacing its last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "console URL '{raw}' cannot be used as a base"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn client(url: &str) -> Client {
        Client::with_client(
            reqwest::Client::new(),
            url,
            "admin",
            SecretString::from("hunter2".to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_separator() {
        assert_eq!(
            normalize_base_url("https://console.example.com:8083").unwrap().as_str(),
            "https://console.example.com:8083/"
        );
        assert_eq!(
            normalize_base_url("https://example.com/compute").unwrap().as_str(),
            "https://example.com/compute/"
        );
        assert_eq!(
            normalize_base_url("https://example.com/compute/").unwrap().as_str(),
            "https://example.com/compute/"
        );
    }

    #[test]
    fn invalid_console_url_is_rejected() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("mailto:admin@example.com"),
            Err(Error::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn new_client_has_no_token() {
        let c = client("https://console.example.com");
        assert!(!c.is_authenticated());
        assert!(c.token().is_none());
        assert_eq!(c.username(), "admin");
    }

    #[test]
    fn set_token_replaces_previous_value() {
        let c = client("https://console.example.com");
        c.set_token(SecretString::from("first".to_owned()));
        c.set_token(SecretString::from("second".to_owned()));
        assert_eq!(c.token().unwrap().expose_secret(), "second");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let c = client("https://console.example.com");
        c.set_token(SecretString::from("tok-123".to_owned()));
        let rendered = format!("{c:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok-123"));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
