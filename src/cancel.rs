//! Cooperative cancellation shared between a caller and an in-progress request.
use tokio_util::sync::{CancellationToken, DropGuard};

/// A clonable handle that cancels the request it was handed to.
#[derive(Debug, Clone, Default)]
pub struct CancellableToken {
    inner: CancellationToken,
}

impl CancellableToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled and wakes every waiter. Repeated calls are no-ops.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Resolves once [`CancellableToken::cancel`] has been called.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Cancels the token when the returned guard is dropped.
    #[must_use]
    pub fn drop_guard(&self) -> DropGuard {
        self.inner.clone().drop_guard()
    }
}
