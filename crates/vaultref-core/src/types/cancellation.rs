//! Cancellation token for resolution calls

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Token for cancelling async operations
///
/// A resolution call suspends at the store-fetch step only; the resolver
/// races the fetch against this token. Child tokens observe ancestor
/// cancellation, but cancelling a child never cancels its parent.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
    parent: Option<Arc<TokenInner>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Create a new root token
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
                parent: None,
            }),
        }
    }

    /// Check whether this token or any of its ancestors is cancelled
    pub fn is_cancelled(&self) -> bool {
        let mut node = Some(&self.inner);
        while let Some(n) = node {
            if n.cancelled.load(Ordering::SeqCst) {
                return true;
            }
            node = n.parent.as_ref();
        }
        false
    }

    /// Request cancellation of this token (and all tokens derived from it)
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait until this token or an ancestor is cancelled
    pub async fn cancelled(&self) {
        // Register interest on every node in the chain before checking the
        // flags, so a cancel between check and await cannot be missed.
        let mut waiters = Vec::new();
        let mut node = Some(&self.inner);
        while let Some(n) = node {
            let mut notified = Box::pin(n.notify.notified());
            notified.as_mut().enable();
            waiters.push(notified);
            node = n.parent.as_ref();
        }

        if self.is_cancelled() {
            return;
        }

        futures::future::select_all(waiters).await;
    }

    /// Create a child token cancelled when this token is cancelled
    ///
    /// Cancellation propagates downward only: cancelling the child leaves
    /// this token untouched.
    pub fn child_token(&self) -> CancellationToken {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
                parent: Some(Arc::clone(&self.inner)),
            }),
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());

        // Multiple cancels are idempotent
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cloned_token_shares_state() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();

        token1.cancel();

        assert!(token1.is_cancelled());
        assert!(token2.is_cancelled());
    }

    #[test]
    fn test_child_observes_parent_cancel() {
        let parent = CancellationToken::new();
        let child = parent.child_token();

        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_propagate_up() {
        let parent = CancellationToken::new();
        let child = parent.child_token();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        let handle = tokio::spawn(async move {
            token_clone.cancelled().await;
            "cancelled"
        });

        token.cancel();

        let result = handle.await.unwrap();
        assert_eq!(result, "cancelled");
    }

    #[tokio::test]
    async fn test_child_cancelled_future_wakes_on_parent() {
        let parent = CancellationToken::new();
        let child = parent.child_token();

        let handle = tokio::spawn(async move {
            child.cancelled().await;
            "done"
        });

        parent.cancel();
        assert_eq!(handle.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
