//! Cooperative cancellation tokens for output operations.
//!
//! A token applies only to the call it is passed into. It is unrelated to
//! the stream-wide abort signal: the token is the caller's local
//! cancellation, the abort is the connection telling the stream to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag shared between the party that cancels and
/// the write call that observes it.
///
/// Cloning is cheap and preserves shared state: cancelling via any clone is
/// visible to all others. A token built with [`CancellationToken::none`]
/// carries no flag at all and can never become cancelled; callers passing it
/// declare that they do not observe cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Option<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// A token that can later be cancelled with [`cancel`](Self::cancel).
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// A token that can never be cancelled.
    pub fn none() -> Self {
        Self { flag: None }
    }

    /// Request cancellation. Idempotent; a no-op on a `none` token.
    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Whether this token is capable of being cancelled at all.
    pub fn can_be_cancelled(&self) -> bool {
        self.flag.is_some()
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        match &self.flag {
            Some(flag) => flag.load(Ordering::SeqCst),
            None => false,
        }
    }
}
