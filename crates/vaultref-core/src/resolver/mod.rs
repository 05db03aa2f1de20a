//! Secret resolution

mod error;
mod path;
mod value_cache;
mod secret_resolver;

pub use error::{ResolveError, ResolveResult};
pub use path::split_secret_path;
pub use value_cache::ValueCache;
pub use secret_resolver::SecretResolver;
