//! Demo error type shared by the integration tests.

use serde::{Deserialize, Serialize};
use tasker_batch::CancelReason;

/// Coded error, comparable and cheap to clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DemoError {
    #[error("[SERVICE_ERROR] {0}")]
    ServiceError(String),
    #[error("[CONTEXT_ERROR] {0}")]
    WrongContext(String),
}

impl DemoError {
    pub fn service(desc: impl Into<String>) -> Self {
        DemoError::ServiceError(desc.into())
    }

    pub fn wrong_context(reason: CancelReason) -> Self {
        DemoError::WrongContext(format!("wrong-ctx. reason={reason}"))
    }

    pub fn code(&self) -> &'static str {
        match self {
            DemoError::ServiceError(_) => "SERVICE_ERROR",
            DemoError::WrongContext(_) => "CONTEXT_ERROR",
        }
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, DemoError::ServiceError(_))
    }

    pub fn is_wrong_context(&self) -> bool {
        matches!(self, DemoError::WrongContext(_))
    }
}
