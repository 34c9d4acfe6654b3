// Request dispatch
//
// Every console call goes through `Client::dispatch`: resolve the endpoint,
// attach the bearer token and JSON body, send, and insist on `200 OK`. The
// public `send*` methods differ only in what they do with the response body.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Error;

const BODY_PREVIEW_CHARS: usize = 200;

/// A single console call: method, endpoint, query parameters, and an optional
/// JSON body, encoded when the request is built.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: Endpoint,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<Endpoint>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Encode `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(body).map_err(Error::Encode)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl Client {
    /// Send a request and decode a non-empty response body.
    ///
    /// Returns `Ok(None)` when the console answers `200 OK` with an empty body.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>, Error> {
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// Send a request and decode the response into `target`.
    ///
    /// `target` is only written when the console returns a non-empty body; on
    /// any error or an empty body it is left untouched.
    pub async fn send_into<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        target: &mut T,
    ) -> Result<(), Error> {
        if let Some(value) = self.send(request).await? {
            *target = value;
        }
        Ok(())
    }

    /// Send a request whose response body is irrelevant.
    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), Error> {
        self.dispatch(request).await.map(drop)
    }

    /// [`send`](Self::send), abandoned with [`Error::Cancelled`] as soon as
    /// `cancel` fires.
    pub async fn send_cancellable<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("request cancelled by caller");
                Err(Error::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    /// Perform exactly one HTTP call and return the raw body of a `200 OK`.
    async fn dispatch(&self, request: ApiRequest) -> Result<String, Error> {
        let ApiRequest {
            method,
            endpoint,
            query,
            body,
        } = request;

        let url = endpoint.resolve(self.base_url())?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);

        if !query.is_empty() {
            trace!(?query, "query parameters");
            builder = builder.query(&query);
        }

        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "console returned non-OK status");
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "could not read error response body");
                    String::new()
                }
            };
            return Err(Error::NonOkStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.text().await?)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<Option<T>, Error> {
    if body.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(body).map(Some).map_err(|e| {
        let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}
