//! Vaultref Core
//!
//! Secret-reference resolution for layered configuration.
//! Configuration values may embed references to secrets held in HashiCorp
//! Vault, in either of two syntaxes:
//!
//! 1. `@Hashicorp.Vault(VaultAddress=<addr>;SecretPath=<path>;SecretKey=<key>)`
//! 2. `vault://<host>[:<port>]/<path>[?version=<n>]#<key>`
//!
//! The crate detects such values, fetches the named secrets, and overlays
//! the resolved values back onto the configuration as a single
//! highest-priority layer. Raw secret identifiers are masked in every log
//! message and error.
//!
//! ```rust,ignore
//! use vaultref_core::{
//!     CancellationToken, ResolutionOrchestrator, ResolverOptions, SecretResolver,
//! };
//!
//! let options = ResolverOptions::new()
//!     .with_store_address("https://vault.example.com");
//! let orchestrator = ResolutionOrchestrator::new(SecretResolver::new(options));
//!
//! // Resolve one reference directly
//! let value = orchestrator
//!     .resolver()
//!     .resolve("vault://vault.example.com/secret/data/app#pw", &CancellationToken::new())
//!     .await?;
//!
//! // Or run a full pass over a layered configuration
//! orchestrator.resolve_and_apply(&mut config, &CancellationToken::new()).await?;
//! ```

pub mod auth;
pub mod env;
pub mod logging;
pub mod overlay;
pub mod reference;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use types::{
    CancellationToken, KvVersion, ResolverOptions, SecretReference, DEFAULT_MOUNT_PATH,
    DEFAULT_TIMEOUT,
};

pub use auth::{AppRoleAuth, AuthError, AuthMethod, KubernetesAuth, TokenAuth};

pub use env::{EnvProbe, MemoryEnvProbe, ProcessEnvProbe};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};

pub use reference::ReferenceMatcher;

pub use store::{
    SecretPayload, StoreClient, StoreClientCache, StoreError, VaultClient,
};

pub use resolver::{ResolveError, ResolveResult, SecretResolver, ValueCache};

pub use overlay::{
    ConfigLayer, LayeredConfig, OverlayError, ResolutionOrchestrator, ResolutionOverlay,
};
