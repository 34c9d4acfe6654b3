// pcc-api: async Rust client for the Prisma Cloud Compute console API

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod groups;
pub mod request;
pub mod settings;
pub mod transport;

mod serde_util;

pub use auth::Credentials;
pub use client::Client;
pub use endpoint::Endpoint;
pub use error::Error;
pub use request::ApiRequest;
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;
pub use transport::{TlsMode, TransportConfig};
