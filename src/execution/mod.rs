//! # Execution
//!
//! Cancellation contexts and the bounded, cancel-on-first-failure task group
//! that batches are scheduled onto.

pub mod context;
pub mod group;

pub use context::{CancelHandle, CancelReason, Context};
pub use group::Group;
