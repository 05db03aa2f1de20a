//! Dual-syntax reference matcher
//!
//! Recognizes two syntaxes, case-insensitively on literal keywords:
//!
//! 1. Attribute form:
//!    `@Hashicorp.Vault(VaultAddress=<addr>;SecretPath=<path>;SecretKey=<key>)`
//! 2. URI form: `vault://<host>[:<port>]/<path>[?version=<n>]#<key>`
//!
//! Anything not matching exactly is a non-reference; there is no partial
//! parse. The regex crate's engine is linear-time, so adversarial input
//! cannot stall matching.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::types::SecretReference;

/// Attribute form, fields in fixed order, terminated by `)`
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*@hashicorp\.vault\(\s*vaultaddress\s*=\s*([^;)]+?)\s*;\s*secretpath\s*=\s*([^;)]+?)\s*;\s*secretkey\s*=\s*([^;)]+?)\s*\)\s*$",
    )
    .expect("attribute reference pattern is valid")
});

/// Detects and parses reference strings
///
/// Stateless; both syntaxes are recognized through associated functions.
pub struct ReferenceMatcher;

impl ReferenceMatcher {
    /// Check whether a value is a secret reference
    pub fn is_reference(value: &str) -> bool {
        Self::try_parse(value).is_some()
    }

    /// Parse a value into a [`SecretReference`]
    ///
    /// Returns `None` for empty/whitespace input and for anything that does
    /// not match one of the two syntaxes exactly.
    pub fn try_parse(value: &str) -> Option<SecretReference> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::parse_attribute_form(trimmed).or_else(|| Self::parse_uri_form(trimmed))
    }

    /// Masked rendering of a raw reference for diagnostics
    ///
    /// Keeps only the store address/host visible; path and key are
    /// redacted. Unparsable input masks to `"***"` so nothing leaks.
    pub fn mask(value: &str) -> String {
        let trimmed = value.trim();
        if let Some(reference) = Self::parse_attribute_form(trimmed) {
            return format!(
                "@Hashicorp.Vault(VaultAddress={};SecretPath=***;SecretKey=***)",
                reference.store_address
            );
        }
        if let Some(authority) = Self::uri_authority(trimmed) {
            return format!("vault://{authority}/***#***");
        }
        "***".to_string()
    }

    fn parse_attribute_form(value: &str) -> Option<SecretReference> {
        let captures = ATTRIBUTE_RE.captures(value)?;
        let address = captures.get(1)?.as_str().trim();
        let path = captures.get(2)?.as_str().trim();
        let key = captures.get(3)?.as_str().trim();
        if address.is_empty() || path.is_empty() || key.is_empty() {
            return None;
        }
        Some(SecretReference::new(
            address,
            path.trim_matches('/'),
            key,
        ))
    }

    fn parse_uri_form(value: &str) -> Option<SecretReference> {
        let rest = strip_prefix_ignore_case(value, "vault://")?;

        // Key after the last '#', path between the first '/' and that '#'
        let hash = rest.rfind('#')?;
        let (before_key, key) = (&rest[..hash], &rest[hash + 1..]);
        if key.is_empty() {
            return None;
        }

        let slash = before_key.find('/')?;
        let (authority, path_and_query) = (&before_key[..slash], &before_key[slash + 1..]);
        if authority.is_empty() {
            return None;
        }

        let (path, version) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, parse_version_query(query)?),
            None => (path_and_query, None),
        };
        let path = path.trim_matches('/');
        if path.is_empty() {
            return None;
        }

        // Authority must be a valid host[:port]
        let address = format!("https://{authority}");
        let parsed = Url::parse(&address).ok()?;
        parsed.host_str()?;

        let mut reference = SecretReference::new(address, path, key);
        reference.version = version;
        Some(reference)
    }

    /// Extract `host[:port]` from a URI-form reference, for masking
    fn uri_authority(value: &str) -> Option<String> {
        let rest = strip_prefix_ignore_case(value, "vault://")?;
        let end = rest.find(['/', '#', '?']).unwrap_or(rest.len());
        let authority = &rest[..end];
        if authority.is_empty() {
            None
        } else {
            Some(authority.to_string())
        }
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

/// Parse a `version=<n>` query; any other query invalidates the reference
fn parse_version_query(query: &str) -> Option<Option<String>> {
    if query.is_empty() {
        return Some(None);
    }
    let (name, version) = query.split_once('=')?;
    if !name.eq_ignore_ascii_case("version") || version.is_empty() {
        return None;
    }
    Some(Some(version.to_string()))
}
