//! # Execution Context
//!
//! A cancellation-carrying handle passed explicitly to every unit of work.
//!
//! A [`Context`] is cheap to clone and forms a tree: cancelling a parent
//! cancels all of its descendants, while cancelling a child never reaches the
//! parent. A context may also carry a deadline, which a child inherits unless
//! it sets an earlier one of its own.
//!
//! ```rust
//! use std::time::Duration;
//! use tasker_batch::execution::{CancelReason, Context};
//!
//! let root = Context::background();
//! let (child, cancel) = Context::with_timeout(&root, Duration::from_secs(30));
//! assert!(child.err().is_none());
//!
//! cancel.cancel();
//! assert_eq!(child.err(), Some(CancelReason::Canceled));
//! assert!(root.err().is_none());
//! ```

use crate::constants::reasons;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context stopped being live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    /// Cancelled explicitly, by this context's handle or an ancestor's
    Canceled,
    /// The context's deadline passed
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Canceled => f.write_str(reasons::CANCELED),
            CancelReason::DeadlineExceeded => f.write_str(reasons::DEADLINE_EXCEEDED),
        }
    }
}

impl std::error::Error for CancelReason {}

/// Cancellation scope handed to units of work
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    token: CancellationToken,
    deadline: Option<Instant>,
    /// Set once, before `token` is cancelled
    reason: OnceLock<CancelReason>,
    parent: Option<Context>,
}

impl Context {
    /// Root context: never cancelled, no deadline
    pub fn background() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                token: CancellationToken::new(),
                deadline: None,
                reason: OnceLock::new(),
                parent: None,
            }),
        }
    }

    /// Derive a child that can be cancelled through the returned handle
    pub fn with_cancel(parent: &Context) -> (Context, CancelHandle) {
        Self::derive(parent, None)
    }

    /// Derive a child that expires after `timeout`
    pub fn with_timeout(parent: &Context, timeout: Duration) -> (Context, CancelHandle) {
        Self::derive(parent, Some(Instant::now() + timeout))
    }

    /// Derive a child that expires at `deadline`
    pub fn with_deadline(parent: &Context, deadline: Instant) -> (Context, CancelHandle) {
        Self::derive(parent, Some(deadline))
    }

    fn derive(parent: &Context, deadline: Option<Instant>) -> (Context, CancelHandle) {
        let deadline = match (parent.deadline(), deadline) {
            (Some(inherited), Some(own)) => Some(inherited.min(own)),
            (inherited, own) => inherited.or(own),
        };

        let child = Context {
            inner: Arc::new(ContextInner {
                token: parent.inner.token.child_token(),
                deadline,
                reason: OnceLock::new(),
                parent: Some(parent.clone()),
            }),
        };
        let handle = CancelHandle {
            context: child.clone(),
        };
        (child, handle)
    }

    /// `None` while live, otherwise the reason this context stopped
    pub fn err(&self) -> Option<CancelReason> {
        if let Some(reason) = self.inner.reason.get() {
            return Some(*reason);
        }
        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                return Some(CancelReason::DeadlineExceeded);
            }
        }
        self.inner.parent.as_ref().and_then(Context::err)
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Resolves once this context is cancelled or its deadline passes
    pub async fn done(&self) -> CancelReason {
        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.inner.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.inner.token.cancelled().await,
        }
        self.err().unwrap_or(CancelReason::Canceled)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .finish()
    }
}

/// Cancels the context it was created with, and every descendant of it
#[derive(Debug, Clone)]
pub struct CancelHandle {
    context: Context,
}

impl CancelHandle {
    /// Idempotent; the first observed reason sticks
    pub fn cancel(&self) {
        let reason = self.context.err().unwrap_or(CancelReason::Canceled);
        let _ = self.context.inner.reason.set(reason);
        self.context.inner.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.context.inner.token.is_cancelled()
    }
}
