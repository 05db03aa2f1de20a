//! Store clients and the per-address client cache

mod traits;
mod vault;
mod memory;
mod cache;

pub use traits::{SecretPayload, StoreClient, StoreError, StoreResult};
pub use vault::VaultClient;
pub use memory::{FailureMode, MemoryStoreClient};
pub use cache::{normalize_store_address, ClientFactory, StoreClientCache};
