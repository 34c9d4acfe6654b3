// Console authentication
//
// Username/password login against the fixed authenticate endpoint. The
// returned bearer token is stored on the client and attached to every
// subsequent request by the dispatcher.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::request::ApiRequest;
use crate::transport::TransportConfig;

/// Login endpoint. Absolute, so it ignores any path prefix on the console URL.
pub const AUTHENTICATE_ENDPOINT: &str = "/api/v1/authenticate";

/// Everything needed to reach and log in to a console.
///
/// Deserializes from `{console_url, username, password, skip_cert_verification}`.
/// The password is held as a [`SecretString`] and is redacted from `Debug`.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawCredentials")]
pub struct Credentials {
    pub console_url: String,
    pub username: String,
    pub password: SecretString,
    pub skip_cert_verification: bool,
}

impl Credentials {
    pub fn new(
        console_url: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            console_url: console_url.into(),
            username: username.into(),
            password,
            skip_cert_verification: false,
        }
    }

    pub fn skip_cert_verification(mut self, skip: bool) -> Self {
        self.skip_cert_verification = skip;
        self
    }

    /// Transport config implied by the descriptor alone.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::from_skip_verification(self.skip_cert_verification)
    }
}

#[derive(Deserialize)]
struct RawCredentials {
    console_url: String,
    username: String,
    password: String,
    #[serde(default)]
    skip_cert_verification: bool,
}

impl From<RawCredentials> for Credentials {
    fn from(raw: RawCredentials) -> Self {
        Self {
            console_url: raw.console_url,
            username: raw.username,
            password: SecretString::from(raw.password),
            skip_cert_verification: raw.skip_cert_verification,
        }
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: String,
}

impl Client {
    /// Exchange the stored username/password for a bearer token.
    ///
    /// `POST /api/v1/authenticate` with `{"username", "password"}`, expecting
    /// `{"token": "..."}`. On failure the previously stored token is kept.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let password = self.password().expose_secret();
        if self.username().is_empty() || password.is_empty() {
            return Err(Error::authentication("username and/or password missing"));
        }

        debug!(username = %self.username(), "authenticating with console");

        let request = ApiRequest::post(AUTHENTICATE_ENDPOINT)
            .json(&AuthRequest {
                username: self.username(),
                password,
            })
            .map_err(|e| Error::authentication_caused_by("could not encode login request", e))?;

        let response: Option<AuthResponse> = self
            .send(request)
            .await
            .map_err(|e| Error::authentication_caused_by("login request failed", e))?;

        let token = response
            .map(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::authentication("login response did not contain a token"))?;

        self.set_token(SecretString::from(token));
        debug!("authentication successful");
        Ok(())
    }
}
