//! # Error Type Constraint
//!
//! Task errors are user-defined types. The runner needs three things from them:
//! a description (`std::error::Error`), a way to hand the same failure both to
//! the task record and to the group (`Clone`), and the ability to cross worker
//! threads (`Send + Sync + 'static`).
//!
//! Absence of an error is an explicit tag (`None`), never a sentinel value of
//! the error type, so checking for success never dispatches into `E`.

/// Capability required of every task error type.
pub trait ErrorType: std::error::Error + Clone + Send + Sync + 'static {}

impl<T> ErrorType for T where T: std::error::Error + Clone + Send + Sync + 'static {}

/// Returns true when no error is present.
#[inline]
pub fn is_zero<E: ErrorType>(erx: Option<&E>) -> bool {
    erx.is_none()
}

/// Success check used by every filter and aggregate in the crate.
#[inline]
pub fn pass<E: ErrorType>(erx: Option<&E>) -> bool {
    is_zero(erx)
}
