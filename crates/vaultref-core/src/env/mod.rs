//! Environment probing for address and credential defaults
//!
//! All environment access goes through the [`EnvProbe`] trait so tests can
//! inject a fake environment instead of mutating the real one.

mod probe;

pub use probe::{EnvProbe, MemoryEnvProbe, ProcessEnvProbe};

/// Well-known slot for the store address
pub const VAULT_ADDR_ENV: &str = "VAULT_ADDR";

/// Well-known slot for a pre-issued client token
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// Well-known slot for the AppRole role id
pub const VAULT_ROLE_ID_ENV: &str = "VAULT_ROLE_ID";

/// Well-known slot for the AppRole secret id
pub const VAULT_SECRET_ID_ENV: &str = "VAULT_SECRET_ID";

/// Well-known slot for the Kubernetes auth role name
pub const VAULT_K8S_ROLE_ENV: &str = "VAULT_K8S_ROLE";

/// Well-known slot for the Vault namespace
pub const VAULT_NAMESPACE_ENV: &str = "VAULT_NAMESPACE";

/// Well-known platform identity file (Kubernetes service account JWT)
pub const K8S_SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";
