// Console settings endpoints (`api/v1/settings/...`).

pub mod registry;

pub use registry::{
    RegistryCredential, RegistrySettings, RegistrySpecification, SETTINGS_REGISTRY_ENDPOINT,
    StringResult,
};
