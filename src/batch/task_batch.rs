//! # Task Batch
//!
//! Maps N input arguments onto a [`Group`], one unit per argument, and
//! records a typed outcome per argument.
//!
//! ## Glide vs fail-fast
//!
//! - **Fail-fast** (default): a failing task stores its error and also
//!   surfaces it to the group, which cancels the context every sibling sees.
//! - **Glide**: a failing task stores its error and reports success to the
//!   group, so siblings keep running and [`Group::wait`] returns `Ok(())`.
//!
//! ## Context translation
//!
//! With a translator registered through [`TaskBatch::set_wa_ctx`], a unit that
//! starts after the group's context is already done skips the work function
//! and records the translated cancellation reason instead. Without one, the
//! work function always runs and is expected to check the context itself.
//!
//! ## Ownership
//!
//! Task records live in an index-aligned arena shared with the runnables.
//! Slot `i` is written only by the runnable built for index `i`; read the
//! batch after the group has been waited on.

use crate::batch::task::{Task, Tasks};
use crate::config::BatchConfig;
use crate::constraint::ErrorType;
use crate::error::{Result, TaskerError};
use crate::execution::{CancelReason, Context, Group};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

type WaCtxFn<E> = dyn Fn(CancelReason) -> E + Send + Sync;

/// Batch of per-argument tasks with a glide policy
pub struct TaskBatch<A, R, E: ErrorType> {
    slots: Arc<Vec<Mutex<Task<A, R, E>>>>,
    glide: bool,
    wa_ctx: Option<Arc<WaCtxFn<E>>>,
}

impl<A, R, E> TaskBatch<A, R, E>
where
    A: Clone + Send + 'static,
    R: Send + 'static,
    E: ErrorType,
{
    /// One pending task per argument, in input order, fail-fast
    pub fn new(args: impl IntoIterator<Item = A>) -> Self {
        let slots = args
            .into_iter()
            .map(|arg| Mutex::new(Task::new(arg)))
            .collect::<Vec<_>>();
        Self {
            slots: Arc::new(slots),
            glide: false,
            wa_ctx: None,
        }
    }

    pub fn from_config(args: impl IntoIterator<Item = A>, config: &BatchConfig) -> Self {
        let mut batch = Self::new(args);
        batch.set_glide(config.glide);
        batch
    }

    /// `true`: failures are recorded without cancelling siblings
    pub fn set_glide(&mut self, glide: bool) {
        self.glide = glide;
    }

    pub fn glide(&self) -> bool {
        self.glide
    }

    /// Register the conversion from a cancellation reason to a task error
    pub fn set_wa_ctx<F>(&mut self, wa_ctx: F)
    where
        F: Fn(CancelReason) -> E + Send + Sync + 'static,
    {
        self.wa_ctx = Some(Arc::new(wa_ctx));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Build the unit that processes task `idx`, ready for [`Group::go`].
    ///
    /// Glide mode and the translator are captured when this is called.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range; the caller controls the iteration.
    pub fn get_run<W, Fut>(
        &self,
        idx: usize,
        work: W,
    ) -> impl FnOnce(Context) -> BoxFuture<'static, std::result::Result<(), E>> + Send + 'static
    where
        W: FnOnce(Context, A) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        assert!(
            idx < self.slots.len(),
            "task index {idx} out of range for a batch of {} tasks",
            self.slots.len()
        );
        let slots = Arc::clone(&self.slots);
        let glide = self.glide;
        let wa_ctx = self.wa_ctx.clone();

        move |ctx: Context| {
            async move {
                let slot = &slots[idx];

                if let (Some(wa_ctx), Some(reason)) = (wa_ctx.as_ref(), ctx.err()) {
                    debug!(
                        task_index = idx,
                        reason = %reason,
                        glide = glide,
                        "Context done before task start, recording translated error"
                    );
                    return record_failure(slot, idx, wa_ctx(reason), glide);
                }

                let arg = slot.lock().arg.clone();
                match work(ctx, arg).await {
                    Ok(res) => {
                        settle(slot, idx, Ok(res));
                        Ok(())
                    }
                    Err(erx) => {
                        debug!(
                            task_index = idx,
                            error = %erx,
                            glide = glide,
                            "Task failed"
                        );
                        record_failure(slot, idx, erx, glide)
                    }
                }
            }
            .boxed()
        }
    }

    /// Spawn a unit for every task into `group`, in index order
    pub async fn ego_run<W, Fut>(&self, group: &mut Group<E>, work: W)
    where
        W: Fn(Context, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        info!(
            tasks = self.slots.len(),
            glide = self.glide,
            limit = ?group.limit(),
            translate_ctx = self.wa_ctx.is_some(),
            "Scheduling batch onto group"
        );

        let work = Arc::new(work);
        for idx in 0..self.slots.len() {
            let work = Arc::clone(&work);
            group
                .go(self.get_run(idx, move |ctx, arg| work(ctx, arg)))
                .await;
        }
    }

    /// Snapshot of every task record
    pub fn tasks(&self) -> Tasks<A, R, E>
    where
        R: Clone,
    {
        self.slots.iter().map(|slot| slot.lock().clone()).collect()
    }

    /// Take the task records without cloning.
    ///
    /// Fails while runnables built by [`TaskBatch::get_run`] are still alive.
    pub fn into_tasks(self) -> Result<Tasks<A, R, E>> {
        match Arc::try_unwrap(self.slots) {
            Ok(slots) => Ok(slots.into_iter().map(Mutex::into_inner).collect()),
            Err(slots) => Err(TaskerError::BatchInFlight {
                outstanding: Arc::strong_count(&slots) - 1,
            }),
        }
    }
}

/// Store `erx` on the task; glide absorbs it, fail-fast passes it upward
fn record_failure<A, R, E: ErrorType>(
    slot: &Mutex<Task<A, R, E>>,
    idx: usize,
    erx: E,
    glide: bool,
) -> std::result::Result<(), E> {
    if glide {
        settle(slot, idx, Err(erx));
        Ok(())
    } else {
        settle(slot, idx, Err(erx.clone()));
        Err(erx)
    }
}

/// Write a task outcome once; later writes are dropped
fn settle<A, R, E: ErrorType>(
    slot: &Mutex<Task<A, R, E>>,
    idx: usize,
    outcome: std::result::Result<R, E>,
) {
    let mut task = slot.lock();
    if !task.is_pending() {
        warn!(
            task_index = idx,
            "Task already has an outcome, keeping the first one"
        );
        return;
    }
    match outcome {
        Ok(res) => task.res = Some(res),
        Err(erx) => task.erx = Some(erx),
    }
}

impl<A, R, E: ErrorType> fmt::Debug for TaskBatch<A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBatch")
            .field("tasks", &self.slots.len())
            .field("glide", &self.glide)
            .field("translate_ctx", &self.wa_ctx.is_some())
            .finish()
    }
}
