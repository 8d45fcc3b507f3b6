//! Crate-level errors.
//!
//! Task failures are never represented here: those travel as the caller's own
//! typed error (see [`crate::constraint::ErrorType`]). `TaskerError` covers
//! recoverable misuse of the runner itself and configuration problems.

/// Errors raised by the batch runner's own API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskerError {
    /// A concurrency limit of zero would block every unit forever
    #[error("Invalid concurrency limit: {limit} (must be at least 1)")]
    InvalidLimit { limit: usize },

    /// The limit is frozen once the first unit has been spawned
    #[error("Concurrency limit cannot change after {spawned} unit(s) were spawned")]
    LimitAfterSpawn { spawned: usize },

    /// Task records are still shared with runnables that have not finished
    #[error("Batch still in flight: {outstanding} runnable(s) hold the task arena")]
    BatchInFlight { outstanding: usize },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<config::ConfigError> for TaskerError {
    fn from(err: config::ConfigError) -> Self {
        TaskerError::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TaskerError::InvalidLimit { limit: 0 }.to_string(),
            "Invalid concurrency limit: 0 (must be at least 1)"
        );
        assert_eq!(
            TaskerError::LimitAfterSpawn { spawned: 3 }.to_string(),
            "Concurrency limit cannot change after 3 unit(s) were spawned"
        );
        assert_eq!(
            TaskerError::ConfigurationError("bad glide".to_string()).to_string(),
            "Configuration error: bad glide"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TaskerError = config::ConfigError::Message("boom".to_string()).into();
        assert!(matches!(err, TaskerError::ConfigurationError(msg) if msg.contains("boom")));
    }
}
