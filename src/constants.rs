//! # System Constants
//!
//! Environment variable names, defaults and fixed strings shared across the
//! runner.

/// Environment variable names consulted at startup
pub mod env {
    /// Deployment environment, drives the default log level
    pub const TASKER_ENV: &str = "TASKER_ENV";
    /// `json` switches console output to JSON lines
    pub const LOG_FORMAT: &str = "TASKER_LOG_FORMAT";
    /// Prefix for [`crate::config::BatchConfig`] environment overrides
    pub const BATCH_PREFIX: &str = "TASKER_BATCH";
}

/// Default values
pub mod defaults {
    pub const ENVIRONMENT: &str = "development";
    pub const GLIDE: bool = false;
}

/// Human-readable cancellation reasons, matching the usual context wording
pub mod reasons {
    pub const CANCELED: &str = "context canceled";
    pub const DEADLINE_EXCEEDED: &str = "context deadline exceeded";
}
