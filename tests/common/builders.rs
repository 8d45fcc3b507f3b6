//! Argument builders and test setup helpers.

use std::time::Duration;

pub fn sequential_args(count: u64) -> Vec<u64> {
    (0..count).collect()
}

/// Deterministic per-argument delay spread over `0..max_ms`
pub fn scattered_delay(arg: u64, max_ms: u64) -> Duration {
    Duration::from_millis(arg.wrapping_mul(37) % max_ms.max(1))
}

pub fn init_test_logging() {
    tasker_batch::logging::init_structured_logging();
}
