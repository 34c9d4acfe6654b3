// Registry scan settings
//
// The console scans container registries according to a list of
// specifications. The whole list is read and replaced as one document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::request::ApiRequest;
use crate::serde_util::{is_false, is_zero};

pub const SETTINGS_REGISTRY_ENDPOINT: &str = "api/v1/settings/registry";

/// The registry scanning configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySettings {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub harbor_scanner_url_suffix: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<RegistrySpecification>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub webhook_url_suffix: String,
}

/// One registry (or registry/repository pair) to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySpecification {
    /// Maximum number of most recent images to scan. Zero scans all.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cap: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credential: Vec<RegistryCredential>,
    #[serde(rename = "credentialID", default, skip_serializing_if = "String::is_empty")]
    pub credential_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_repositories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub harbor_deployment_security: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jfrog_repo_types: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub scanners: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_pattern: String,
}

/// A stored credential referenced by a registry specification.
///
/// `external`, `skipVerify`, and `useAWSRole` are always sent, even when false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCredential {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "accountGUID", default, skip_serializing_if = "String::is_empty")]
    pub account_guid: String,
    #[serde(rename = "accountID", default, skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "StringResult::is_empty")]
    pub api_token: StringResult,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_cert: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub external: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role_arn: String,
    #[serde(default, skip_serializing_if = "StringResult::is_empty")]
    pub secret: StringResult,
    #[serde(default)]
    pub skip_verify: bool,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "useAWSRole", default)]
    pub use_aws_role: bool,
}

/// A secret value as the console exchanges it: plain on the way in,
/// encrypted on the way out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringResult {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encrypted: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plain: String,
}

impl StringResult {
    pub fn is_empty(&self) -> bool {
        self.encrypted.is_empty() && self.plain.is_empty()
    }
}

impl Client {
    /// Get the current registry scan settings.
    ///
    /// `GET api/v1/settings/registry`
    pub async fn registry_settings(&self) -> Result<RegistrySettings, Error> {
        debug!("fetching registry settings");
        let settings: Option<RegistrySettings> = self
            .send(ApiRequest::get(SETTINGS_REGISTRY_ENDPOINT))
            .await?;
        Ok(settings.unwrap_or_default())
    }

    /// Replace the registry scan settings.
    ///
    /// `PUT api/v1/settings/registry`
    pub async fn update_registry_settings(&self, settings: &RegistrySettings) -> Result<(), Error> {
        debug!(
            specifications = settings.specifications.len(),
            "updating registry settings"
        );
        self.send_unit(ApiRequest::put(SETTINGS_REGISTRY_ENDPOINT).json(settings)?)
            .await
    }
}
