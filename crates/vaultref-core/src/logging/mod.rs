//! Logging abstractions for runtime-agnostic logging
//!
//! Resolution code never logs raw references; callers are expected to pass
//! masked renderings (see [`crate::types::SecretReference`]).

mod traits;
mod noop;
mod console;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
