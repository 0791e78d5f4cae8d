//! command::context
//!
//! Cancellable context handed to actions.
//!
//! The resolver never checks cancellation itself; it only carries the
//! context through to the selected action.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Cancellation scope for a single run.
///
/// Clones share the same cancellation state. Use [`Context::child`] for a
/// scope that is cancelled with its parent but can also be cancelled alone.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// Create a context that is never cancelled unless [`Context::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context driven by an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Create a child context.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
