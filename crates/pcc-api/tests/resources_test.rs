#![allow(clippy::unwrap_used)]
// Integration tests for the group and registry-settings endpoints.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pcc_api::groups::{Group, GroupPermission};
use pcc_api::settings::{RegistrySettings, RegistrySpecification};
use pcc_api::{Client, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "admin",
        SecretString::from("pw".to_owned()),
    )
    .unwrap();
    client.set_token(SecretString::from("abc".to_owned()));
    (server, client)
}

// ── Groups ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_groups() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/groups"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "groupName": "admins",
                "role": "admin",
                "samlGroup": true,
                "permissions": [{ "collections": ["All"], "project": "Central Console" }]
            },
            { "groupName": "auditors", "role": "auditor", "user": [{ "username": "bob" }] }
        ])))
        .mount(&server)
        .await;

    let groups = client.list_groups().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "admins");
    assert!(groups[0].saml_group);
    assert_eq!(groups[0].permissions[0].project, "Central Console");
    assert_eq!(groups[1].users[0].username, "bob");
}

#[tokio::test]
async fn test_list_groups_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client.list_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_group() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/groups"))
        .and(body_json(json!({
            "groupName": "devs",
            "role": "devOps",
            "permissions": [{ "collections": ["dev"] }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let group = Group {
        name: "devs".into(),
        role: "devOps".into(),
        permissions: vec![GroupPermission {
            collections: vec!["dev".into()],
            project: String::new(),
        }],
        ..Group::default()
    };

    client.create_group(&group).await.unwrap();
}

#[tokio::test]
async fn test_update_group_encodes_name() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/groups/ops%2Fteam%20a"))
        .and(body_json(json!({ "groupName": "ops/team a", "role": "user" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let group = Group {
        name: "ops/team a".into(),
        role: "user".into(),
        ..Group::default()
    };

    client.update_group(&group).await.unwrap();
}

#[tokio::test]
async fn test_delete_group() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups/auditors"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_group("auditors").await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_group() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("group ghost not found"))
        .mount(&server)
        .await;

    let err = client.delete_group("ghost").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_dot_and_empty_group_names_never_reach_the_collection() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for name in ["..", ".", ""] {
        let err = client.delete_group(name).await.unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)), "{name:?}: {err:?}");
    }
}

// ── Registry settings ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_registry_settings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/settings/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "specifications": [{
                "registry": "",
                "repository": "library/ubuntu",
                "tag": "20.04",
                "os": "linux",
                "version": "2",
                "cap": 5,
                "scanners": 2,
                "credentialID": "docker-hub",
                "excludedTags": ["rc"]
            }],
            "webhookUrlSuffix": "abc123"
        })))
        .mount(&server)
        .await;

    let settings = client.registry_settings().await.unwrap();

    assert_eq!(settings.webhook_url_suffix, "abc123");
    assert_eq!(settings.specifications.len(), 1);
    let spec = &settings.specifications[0];
    assert_eq!(spec.repository, "library/ubuntu");
    assert_eq!(spec.cap, 5);
    assert_eq!(spec.credential_id, "docker-hub");
    assert_eq!(spec.excluded_tags, vec!["rc".to_owned()]);
}

#[tokio::test]
async fn test_update_registry_settings() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/settings/registry"))
        .and(body_json(json!({
            "specifications": [{
                "repository": "library/alpine",
                "tag": "3.19",
                "os": "linux",
                "version": "2",
                "scanners": 1
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let settings = RegistrySettings {
        specifications: vec![RegistrySpecification {
            repository: "library/alpine".into(),
            tag: "3.19".into(),
            os: "linux".into(),
            version: "2".into(),
            scanners: 1,
            ..RegistrySpecification::default()
        }],
        ..RegistrySettings::default()
    };

    client.update_registry_settings(&settings).await.unwrap();
}

#[tokio::test]
async fn test_registry_settings_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/settings/registry"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.registry_settings().await;

    assert!(
        matches!(result, Err(Error::NonOkStatus { status: 403, .. })),
        "expected NonOkStatus 403, got: {result:?}"
    );
}
