//! Parsed secret reference

/// A parsed secret reference
///
/// Produced by [`crate::reference::ReferenceMatcher`] from either reference
/// syntax. Never persisted; equality is by normalized tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretReference {
    /// Network address of the secret store (e.g. `https://vault.example.com`)
    pub store_address: String,
    /// Path of the secret inside the store (mount segment included)
    pub secret_path: String,
    /// Key to extract from the fetched secret payload
    pub secret_key: String,
    /// Optional KV v2 secret version
    pub version: Option<String>,
}

impl SecretReference {
    /// Create a new reference
    pub fn new(
        store_address: impl Into<String>,
        secret_path: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            store_address: store_address.into(),
            secret_path: secret_path.into(),
            secret_key: secret_key.into(),
            version: None,
        }
    }

    /// Set the secret version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Masked rendering for diagnostics
    ///
    /// Keeps the store address visible and redacts path and key, so secret
    /// identifiers never leak into logs or error messages.
    pub fn masked(&self) -> String {
        format!("{}/***#***", self.store_address.trim_end_matches('/'))
    }
}

// Display is the masked form on purpose; there is no unmasked rendering.
impl std::fmt::Display for SecretReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_tuple() {
        let a = SecretReference::new("https://v.example.com", "secret/app", "pw");
        let b = SecretReference::new("https://v.example.com", "secret/app", "pw");
        assert_eq!(a, b);

        let c = b.clone().with_version("3");
        assert_ne!(a, c);
    }

    #[test]
    fn test_masked_redacts_path_and_key() {
        let r = SecretReference::new("https://vault.example.com", "secret/data/app", "pw");
        assert_eq!(r.masked(), "https://vault.example.com/***#***");
        assert_eq!(r.to_string(), r.masked());
    }

    #[test]
    fn test_masked_strips_trailing_slash() {
        let r = SecretReference::new("https://vault.example.com/", "secret/app", "pw");
        assert_eq!(r.masked(), "https://vault.example.com/***#***");
    }
}
