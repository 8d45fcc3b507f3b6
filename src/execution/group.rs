//! # Task Group
//!
//! A cancel-on-first-failure group of concurrently running units with an
//! optional cap on how many run at once.
//!
//! The group derives its own cancellable [`Context`] from the caller's and
//! keeps it private. Units receive it as their only argument; the caller's
//! context is never replaced, so it stays usable after [`Group::wait`] even
//! though the group cancels its internal context on the way out.
//!
//! ```rust,no_run
//! use tasker_batch::execution::{Context, Group};
//!
//! #[derive(Debug, Clone, thiserror::Error)]
//! #[error("lookup failed: {0}")]
//! struct LookupError(String);
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Context::background();
//! let mut group = Group::<LookupError>::new(&ctx);
//! group.set_limit(4)?;
//!
//! for id in 0..16u32 {
//!     group
//!         .go(move |ctx| async move {
//!             if ctx.is_done() {
//!                 return Err(LookupError(format!("skipped {id}")));
//!             }
//!             Ok(())
//!         })
//!         .await;
//! }
//!
//! group.wait().await?;
//! assert!(ctx.err().is_none());
//! # Ok(())
//! # }
//! ```

use crate::config::BatchConfig;
use crate::constraint::ErrorType;
use crate::error::{Result, TaskerError};
use crate::execution::context::{CancelHandle, Context};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Cancel-on-first-failure group of units sharing one private context
pub struct Group<E: ErrorType> {
    units: JoinSet<()>,

    /// Handed to units only, never returned to the caller
    context: Context,
    cancel: CancelHandle,

    /// Concurrency cap and the semaphore enforcing it
    limit: Option<(usize, Arc<Semaphore>)>,

    /// First failure observed, first writer wins
    first_err: Arc<Mutex<Option<E>>>,

    spawned: usize,
}

impl<E: ErrorType> Group<E> {
    /// Create a group whose internal context is a child of `parent`
    pub fn new(parent: &Context) -> Self {
        let (context, cancel) = Context::with_cancel(parent);
        Self {
            units: JoinSet::new(),
            context,
            cancel,
            limit: None,
            first_err: Arc::new(Mutex::new(None)),
            spawned: 0,
        }
    }

    /// Create a group and apply the configured concurrency limit
    pub fn from_config(parent: &Context, config: &BatchConfig) -> Result<Self> {
        let mut group = Self::new(parent);
        if let Some(limit) = config.max_concurrency {
            group.set_limit(limit)?;
        }
        Ok(group)
    }

    /// Cap the number of units running at once.
    ///
    /// Only allowed before the first unit is spawned.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(TaskerError::InvalidLimit { limit });
        }
        if self.spawned > 0 {
            warn!(
                limit = limit,
                spawned = self.spawned,
                "Ignoring concurrency limit change after units were spawned"
            );
            return Err(TaskerError::LimitAfterSpawn {
                spawned: self.spawned,
            });
        }
        self.limit = Some((limit, Arc::new(Semaphore::new(limit))));
        debug!(limit = limit, "Group concurrency limit set");
        Ok(())
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit.as_ref().map(|(limit, _)| *limit)
    }

    /// Units spawned so far
    pub fn len(&self) -> usize {
        self.spawned
    }

    pub fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// Spawn `unit`, first waiting for a free slot when a limit is set.
    ///
    /// Slots are granted in call order, so units start in the order they
    /// were passed to `go`.
    pub async fn go<F, Fut>(&mut self, unit: F)
    where
        F: FnOnce(Context) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
    {
        let permit = match &self.limit {
            // The semaphore is private to the group and never closed
            Some((_, semaphore)) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };
        self.spawn(unit, permit);
    }

    /// Spawn `unit` only if a slot is free right now.
    ///
    /// Returns false, dropping `unit` unstarted, when the limit is saturated.
    pub fn try_go<F, Fut>(&mut self, unit: F) -> bool
    where
        F: FnOnce(Context) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
    {
        let permit = match &self.limit {
            Some((_, semaphore)) => match Arc::clone(semaphore).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    trace!(spawned = self.spawned, "Group saturated, unit not started");
                    return false;
                }
            },
            None => None,
        };
        self.spawn(unit, permit);
        true
    }

    fn spawn<F, Fut>(&mut self, unit: F, permit: Option<OwnedSemaphorePermit>)
    where
        F: FnOnce(Context) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
    {
        let context = self.context.clone();
        let cancel = self.cancel.clone();
        let first_err = Arc::clone(&self.first_err);
        let unit_index = self.spawned;
        self.spawned += 1;

        self.units.spawn(async move {
            let _permit = permit;
            if let Err(erx) = unit(context).await {
                {
                    let mut slot = first_err.lock();
                    if slot.is_none() {
                        debug!(
                            unit_index = unit_index,
                            error = %erx,
                            "First unit failure recorded, cancelling group"
                        );
                        *slot = Some(erx);
                    }
                }
                cancel.cancel();
            }
        });
    }

    /// Wait for every unit, then return the first recorded failure.
    ///
    /// The internal context is cancelled once all units have finished.
    /// A unit that panicked has broken the worker contract; its panic is
    /// resumed here.
    pub async fn wait(mut self) -> std::result::Result<(), E> {
        let mut panicked = None;
        while let Some(joined) = self.units.join_next().await {
            if let Err(join_err) = joined {
                if join_err.is_panic() && panicked.is_none() {
                    panicked = Some(join_err.into_panic());
                }
            }
        }
        self.cancel.cancel();

        if let Some(payload) = panicked {
            std::panic::resume_unwind(payload);
        }

        let first_err = self.first_err.lock().take();
        match first_err {
            Some(erx) => Err(erx),
            None => Ok(()),
        }
    }
}

impl<E: ErrorType> fmt::Debug for Group<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("limit", &self.limit())
            .field("spawned", &self.spawned)
            .field("running", &self.units.len())
            .finish()
    }
}
