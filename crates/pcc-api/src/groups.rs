// Access group endpoints
//
// Groups map identity-provider groups (LDAP, SAML, OAuth, OIDC) onto console
// roles and collection permissions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::request::ApiRequest;
use crate::serde_util::is_false;

pub const GROUPS_ENDPOINT: &str = "api/v1/groups";

/// A console access group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group identifier in the Azure SAML identification process.
    #[serde(rename = "groupId", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ldap_group: bool,
    #[serde(rename = "groupName", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub oauth_group: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub oidc_group: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<GroupPermission>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub saml_group: bool,
    #[serde(rename = "user", default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<GroupUser>,
}

/// Collections a group may access, optionally scoped to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermission {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUser {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

impl Client {
    /// List all groups.
    ///
    /// `GET api/v1/groups`
    pub async fn list_groups(&self) -> Result<Vec<Group>, Error> {
        debug!("listing groups");
        let groups: Option<Vec<Group>> = self.send(ApiRequest::get(GROUPS_ENDPOINT)).await?;
        Ok(groups.unwrap_or_default())
    }

    /// Create a new group.
    ///
    /// `POST api/v1/groups`
    pub async fn create_group(&self, group: &Group) -> Result<(), Error> {
        debug!(group = %group.name, "creating group");
        self.send_unit(ApiRequest::post(GROUPS_ENDPOINT).json(group)?)
            .await
    }

    /// Update an existing group, addressed by its name.
    ///
    /// `PUT api/v1/groups/{name}`
    pub async fn update_group(&self, group: &Group) -> Result<(), Error> {
        debug!(group = %group.name, "updating group");
        self.send_unit(ApiRequest::put(group_endpoint(&group.name)).json(group)?)
            .await
    }

    /// Delete a group by name.
    ///
    /// `DELETE api/v1/groups/{name}`
    pub async fn delete_group(&self, name: &str) -> Result<(), Error> {
        debug!(group = %name, "deleting group");
        self.send_unit(ApiRequest::delete(group_endpoint(name))).await
    }
}

fn group_endpoint(name: &str) -> Endpoint {
    Endpoint::new(GROUPS_ENDPOINT).segment(name)
}
