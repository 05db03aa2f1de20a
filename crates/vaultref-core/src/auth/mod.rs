//! Authentication method selection
//!
//! A closed set of Vault auth strategies plus a deterministic selector.
//! The set is a design-time decision; there is no plugin loading.

mod method;
mod selector;

pub use method::{AppRoleAuth, AuthError, AuthMethod, AuthResult, KubernetesAuth, TokenAuth};
pub use selector::select_auth_method;
