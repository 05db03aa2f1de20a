//! Concrete auth methods

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing or selecting auth methods
#[derive(Error, Debug)]
pub enum AuthError {
    /// Blank or missing constructor input; always a caller bug
    #[error("invalid auth argument: {0}")]
    InvalidArgument(String),

    /// No usable auth method could be determined
    #[error("no auth method resolvable: set an explicit method or populate {0}")]
    NoMethodResolvable(&'static str),
}

pub type AuthResult<T> = Result<T, AuthError>;

fn require_non_blank(value: &str, what: &str) -> AuthResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidArgument(format!("{what} must not be blank")));
    }
    Ok(value.to_string())
}

/// Pre-issued client token auth
#[derive(Clone, PartialEq, Eq)]
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    /// Create token auth; the token must be non-blank
    pub fn new(token: impl AsRef<str>) -> AuthResult<Self> {
        Ok(Self {
            token: require_non_blank(token.as_ref(), "token")?,
        })
    }

    /// The raw client token
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth").field("token", &"***").finish()
    }
}

/// AppRole auth (role-id + secret-id pair)
#[derive(Clone, PartialEq, Eq)]
pub struct AppRoleAuth {
    role_id: String,
    secret_id: String,
}

impl AppRoleAuth {
    /// Create AppRole auth; both ids must be non-blank
    pub fn new(role_id: impl AsRef<str>, secret_id: impl AsRef<str>) -> AuthResult<Self> {
        Ok(Self {
            role_id: require_non_blank(role_id.as_ref(), "role_id")?,
            secret_id: require_non_blank(secret_id.as_ref(), "secret_id")?,
        })
    }

    /// The AppRole role id
    pub fn role_id(&self) -> &str {
        &self.role_id
    }

    /// The AppRole secret id
    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }
}

impl std::fmt::Debug for AppRoleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRoleAuth")
            .field("role_id", &self.role_id)
            .field("secret_id", &"***")
            .finish()
    }
}

/// Kubernetes auth (named role + platform identity file)
///
/// The JWT is read from the identity file at login time, not at
/// construction, so a rotated service-account token is picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubernetesAuth {
    role: String,
    token_path: PathBuf,
}

impl KubernetesAuth {
    /// Create Kubernetes auth; the role must be non-blank
    pub fn new(role: impl AsRef<str>, token_path: impl Into<PathBuf>) -> AuthResult<Self> {
        let role = require_non_blank(role.as_ref(), "role")?;
        let token_path = token_path.into();
        if token_path.as_os_str().is_empty() {
            return Err(AuthError::InvalidArgument(
                "token_path must not be blank".to_string(),
            ));
        }
        Ok(Self { role, token_path })
    }

    /// The Vault role bound to the service account
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Path of the service-account JWT file
    pub fn token_path(&self) -> &std::path::Path {
        &self.token_path
    }
}

/// An authentication strategy for a store client
///
/// Closed set of variants; each produces the descriptor its login path
/// needs (see `store::vault`). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Use a pre-issued client token directly
    Token(TokenAuth),
    /// Log in with an AppRole role-id/secret-id pair
    AppRole(AppRoleAuth),
    /// Log in with a Kubernetes service-account JWT
    Kubernetes(KubernetesAuth),
}

impl AuthMethod {
    /// Short name for logging ("token", "approle", "kubernetes")
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Token(_) => "token",
            AuthMethod::AppRole(_) => "approle",
            AuthMethod::Kubernetes(_) => "kubernetes",
        }
    }
}
