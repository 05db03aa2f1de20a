//! Full-configuration resolution pass

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use super::layers::{ConfigLayer, LayeredConfig};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::reference::ReferenceMatcher;
use crate::{log_info, log_warn};
use crate::resolver::{ResolveError, SecretResolver};
use crate::types::CancellationToken;

/// Name of the layer holding resolved secret values
const OVERLAY_LAYER_NAME: &str = "resolved-secrets";

/// Resolved values collected during one full-configuration pass
///
/// Insertion-ordered so the overlay layer mirrors snapshot order.
pub type ResolutionOverlay = IndexMap<String, String>;

/// Errors raised during a full-configuration pass
#[derive(Error, Debug)]
pub enum OverlayError {
    /// One reference failed and the failure policy says abort
    ///
    /// Names the configuration key and the masked reference so the
    /// offending config line can be located from the message alone.
    #[error("failed to resolve secret reference at configuration key '{key}' ({reference})")]
    ResolutionFailed {
        key: String,
        reference: String,
        #[source]
        source: ResolveError,
    },
}

pub type OverlayResult<T> = Result<T, OverlayError>;

/// Walks a configuration snapshot and resolves every secret reference
///
/// Owns its resolver for the duration of the passes it runs; build one per
/// configuration load or keep it across loads to reuse the resolver's
/// caches.
pub struct ResolutionOrchestrator {
    resolver: SecretResolver,
    logger: SharedLogger,
}

impl ResolutionOrchestrator {
    /// Create an orchestrator around a resolver
    pub fn new(resolver: SecretResolver) -> Self {
        Self {
            resolver,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Set the logger
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// The resolver this orchestrator runs
    pub fn resolver(&self) -> &SecretResolver {
        &self.resolver
    }

    /// Resolve every reference-shaped value in a snapshot
    ///
    /// Keys are processed sequentially in snapshot order. Values that are
    /// not reference-shaped pass through untouched (they are simply not
    /// staged). A failed key either aborts the whole pass or is skipped,
    /// per `throw_on_resolve_failure`; a skipped key is never staged, so
    /// its original raw value stays in effect.
    pub async fn resolve_all(
        &self,
        snapshot: &IndexMap<String, String>,
        cancel: &CancellationToken,
    ) -> OverlayResult<ResolutionOverlay> {
        let mut overlay = ResolutionOverlay::new();
        for (key, value) in snapshot {
            if !ReferenceMatcher::is_reference(value) {
                continue;
            }
            match self.resolver.resolve(value, cancel).await {
                Ok(resolved) => {
                    overlay.insert(key.clone(), resolved);
                }
                Err(source) => {
                    let reference = ReferenceMatcher::mask(value);
                    if self.resolver.options().throw_on_resolve_failure {
                        return Err(OverlayError::ResolutionFailed {
                            key: key.clone(),
                            reference,
                            source,
                        });
                    }
                    log_warn!(
                        self.logger,
                        "skipping configuration key '{key}': {source} ({reference})"
                    );
                }
            }
        }
        Ok(overlay)
    }

    /// Run a pass over a layered configuration and apply the overlay
    ///
    /// The overlay lands as a single highest-priority layer; an empty
    /// overlay pushes no layer and logs nothing.
    pub async fn resolve_and_apply(
        &self,
        config: &mut LayeredConfig,
        cancel: &CancellationToken,
    ) -> OverlayResult<()> {
        let snapshot = config.flatten();
        let overlay = self.resolve_all(&snapshot, cancel).await?;
        if overlay.is_empty() {
            return Ok(());
        }
        log_info!(self.logger, "resolved {} secret reference(s)", overlay.len());
        config.push_layer(ConfigLayer::new(OVERLAY_LAYER_NAME, overlay));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthMethod, TokenAuth};
    use crate::logging::Logger;
    use crate::store::{MemoryStoreClient, StoreClient};
    use crate::types::ResolverOptions;
    use indexmap::indexmap;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        warnings: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn debug(&self, _message: &str) {}
        fn info(&self, _message: &str) {}
        fn warn(&self, message: &str) {
            self.warnings.lock().push(message.to_string());
        }
        fn error(&self, _message: &str) {}
    }

    const MISSING_REF: &str = "vault://v.example.com/secret/data/absent#pw";
    const GOOD_REF: &str = "vault://v.example.com/secret/data/app#pw";

    fn orchestrator(throw_on_failure: bool) -> ResolutionOrchestrator {
        let client = Arc::new(
            MemoryStoreClient::new("https://v.example.com").with_secret_value(
                "secret", "app", "pw", "s3cr3t",
            ),
        );
        let options = ResolverOptions::new()
            .with_auth_method(AuthMethod::Token(TokenAuth::new("t").unwrap()))
            .with_throw_on_resolve_failure(throw_on_failure);
        let resolver = SecretResolver::new(options).with_client_factory(Arc::new(
            move |_, _, _| Ok(Arc::clone(&client) as Arc<dyn StoreClient>),
        ));
        ResolutionOrchestrator::new(resolver)
    }

    #[tokio::test]
    async fn test_resolve_all_stages_only_references() {
        let orchestrator = orchestrator(true);
        let snapshot = indexmap! {
            "database.password".to_string() => GOOD_REF.to_string(),
            "database.host".to_string() => "db.internal".to_string(),
        };

        let overlay = orchestrator
            .resolve_all(&snapshot, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(overlay.len(), 1);
        assert_eq!(
            overlay.get("database.password").map(String::as_str),
            Some("s3cr3t")
        );
    }

    #[tokio::test]
    async fn test_skip_policy_leaves_failed_key_raw() {
        let orchestrator = orchestrator(false);
        let snapshot = indexmap! {
            "A".to_string() => MISSING_REF.to_string(),
            "B".to_string() => "plain".to_string(),
        };

        let mut config = LayeredConfig::new();
        config.push_layer(ConfigLayer::new("base", snapshot));
        orchestrator
            .resolve_and_apply(&mut config, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(config.get("A"), Some(MISSING_REF));
        assert_eq!(config.get("B"), Some("plain"));
        // Nothing resolved, so no overlay layer was pushed
        assert_eq!(config.layer_count(), 1);
    }

    #[tokio::test]
    async fn test_skip_policy_warns_with_masked_reference() {
        let logger = Arc::new(RecordingLogger::default());
        let shared: SharedLogger = logger.clone();
        let orchestrator = orchestrator(false).with_logger(shared);
        let snapshot = indexmap! { "A".to_string() => MISSING_REF.to_string() };

        orchestrator
            .resolve_all(&snapshot, &CancellationToken::new())
            .await
            .unwrap();

        let warnings = logger.warnings.lock();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'A'"));
        assert!(warnings[0].contains("vault://v.example.com/***#***"));
        assert!(!warnings[0].contains("absent"));
        assert!(!warnings[0].contains("#pw"));
    }

    #[tokio::test]
    async fn test_abort_policy_names_the_offending_key() {
        let orchestrator = orchestrator(true);
        let snapshot = indexmap! {
            "A".to_string() => MISSING_REF.to_string(),
            "B".to_string() => "plain".to_string(),
        };

        let err = orchestrator
            .resolve_all(&snapshot, &CancellationToken::new())
            .await
            .unwrap_err();
        let OverlayError::ResolutionFailed {
            key,
            reference,
            source,
        } = err;
        assert_eq!(key, "A");
        assert_eq!(reference, "vault://v.example.com/***#***");
        assert!(matches!(source, ResolveError::Store { .. }));
    }

    #[tokio::test]
    async fn test_abort_message_masks_the_reference() {
        let orchestrator = orchestrator(true);
        let snapshot = indexmap! { "A".to_string() => MISSING_REF.to_string() };

        let err = orchestrator
            .resolve_all(&snapshot, &CancellationToken::new())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'A'"));
        assert!(message.contains("***"));
        assert!(!message.contains("absent"));
        assert!(!message.contains("#pw"));
    }

    #[tokio::test]
    async fn test_apply_pushes_one_override_layer() {
        let orchestrator = orchestrator(true);
        let mut config = LayeredConfig::new();
        config.push_layer(ConfigLayer::new(
            "base",
            indexmap! {
                "secret".to_string() => GOOD_REF.to_string(),
                "plain".to_string() => "value".to_string(),
            },
        ));

        orchestrator
            .resolve_and_apply(&mut config, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(config.layer_count(), 2);
        assert_eq!(config.get("secret"), Some("s3cr3t"));
        assert_eq!(config.get("plain"), Some("value"));
    }

    #[tokio::test]
    async fn test_empty_overlay_is_a_no_op() {
        let orchestrator = orchestrator(true);
        let mut config = LayeredConfig::new();
        config.push_layer(ConfigLayer::new(
            "base",
            indexmap! { "plain".to_string() => "value".to_string() },
        ));

        orchestrator
            .resolve_and_apply(&mut config, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(config.layer_count(), 1);
    }

    #[tokio::test]
    async fn test_later_snapshot_value_wins_after_apply() {
        let orchestrator = orchestrator(true);
        let mut config = LayeredConfig::new();
        config.push_layer(ConfigLayer::new(
            "base",
            indexmap! { "secret".to_string() => "placeholder".to_string() },
        ));
        config.push_layer(ConfigLayer::new(
            "env",
            indexmap! { "secret".to_string() => GOOD_REF.to_string() },
        ));

        orchestrator
            .resolve_and_apply(&mut config, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(config.get("secret"), Some("s3cr3t"));
    }
}
