#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Batch
//!
//! Concurrent batch task runner with typed per-task errors.
//!
//! ## Overview
//!
//! Given a list of input arguments, a [`TaskBatch`] runs an async work
//! function over each argument on a bounded [`Group`] of concurrent units,
//! collects a typed result or typed error per argument, and exposes aggregate
//! views (successes, failures, flattened results) without losing which
//! argument produced what.
//!
//! ## Architecture
//!
//! - **Group**: cancel-on-first-failure task group with an optional
//!   concurrency limit. Its cancellation [`Context`] is private and is only
//!   ever handed to spawned units, so the caller's own context is never
//!   replaced by one the group later cancels.
//! - **TaskBatch**: one task record per argument plus the glide policy.
//!   Fail-fast (default) surfaces the first failure and cancels siblings;
//!   glide records failures and lets siblings run on.
//! - **Tasks / TaskOutputList**: filtering, counting and flattening over
//!   outcomes, all defined by the single zero-check in [`constraint`].
//!
//! ## Module Organization
//!
//! - [`batch`] - Task records, the batch scheduler and outcome lists
//! - [`execution`] - Contexts and the task group
//! - [`constraint`] - Error type capability and zero-check
//! - [`config`] - Batch configuration
//! - [`error`] - Crate-level errors
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use tasker_batch::{Context, Group, TaskBatch};
//!
//! #[derive(Debug, Clone, thiserror::Error)]
//! #[error("odd number: {0}")]
//! struct OddNumber(i32);
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut batch = TaskBatch::<i32, String, OddNumber>::new(vec![1, 2, 3, 4, 5]);
//! batch.set_glide(true);
//!
//! let ctx = Context::background();
//! let mut group = Group::new(&ctx);
//! group.set_limit(2).unwrap();
//!
//! batch
//!     .ego_run(&mut group, |_ctx, num| async move {
//!         if num % 2 == 0 {
//!             Ok(format!("even-{num}"))
//!         } else {
//!             Err(OddNumber(num))
//!         }
//!     })
//!     .await;
//!
//! // Glide mode keeps failures on the tasks instead of surfacing them
//! assert!(group.wait().await.is_ok());
//!
//! let tasks = batch.into_tasks().unwrap();
//! assert_eq!(tasks.ok_tasks().len(), 2);
//! assert_eq!(tasks.wa_tasks().len(), 3);
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod constants;
pub mod constraint;
pub mod error;
pub mod execution;
pub mod logging;

pub use batch::{BatchSummary, Task, TaskBatch, TaskOutput, TaskOutputList, Tasks};
pub use config::BatchConfig;
pub use constraint::{is_zero, pass, ErrorType};
pub use error::{Result, TaskerError};
pub use execution::{CancelHandle, CancelReason, Context, Group};
