//! Batch Processing
//!
//! Per-argument task records, the batch scheduler with its glide policy, and
//! the flat outcome lists used to nest one batch inside another's results.

mod task;
mod task_batch;
mod task_output;

pub use task::{BatchSummary, Task, Tasks};
pub use task_batch::TaskBatch;
pub use task_output::{TaskOutput, TaskOutputList};
