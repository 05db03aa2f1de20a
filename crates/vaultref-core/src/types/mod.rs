//! Core types shared across the crate

mod reference;
mod options;
mod cancellation;

pub use reference::SecretReference;
pub use options::{KvVersion, ResolverOptions, DEFAULT_MOUNT_PATH, DEFAULT_TIMEOUT};
pub use cancellation::CancellationToken;
