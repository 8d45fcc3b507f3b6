//! Per-argument task records and collection helpers.

use crate::constraint::{pass, ErrorType};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Outcome record for one input argument
///
/// Starts with neither `res` nor `erx` set; the unit processing the task sets
/// exactly one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task<A, R, E> {
    /// Input argument
    pub arg: A,
    /// Result, set on success
    pub res: Option<R>,
    /// Error, set on failure
    pub erx: Option<E>,
}

impl<A, R, E: ErrorType> Task<A, R, E> {
    pub fn new(arg: A) -> Self {
        Self {
            arg,
            res: None,
            erx: None,
        }
    }

    /// True unless an error was recorded
    pub fn is_ok(&self) -> bool {
        pass(self.erx.as_ref())
    }

    pub fn is_wa(&self) -> bool {
        !self.is_ok()
    }

    /// Never executed: no result and no error
    pub fn is_pending(&self) -> bool {
        self.res.is_none() && self.erx.is_none()
    }
}

/// Outcome counts over a task or output collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub wa: usize,
}

/// Ordered task collection, index-aligned with the batch's input arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tasks<A, R, E>(Vec<Task<A, R, E>>);

impl<A, R, E: ErrorType> Tasks<A, R, E> {
    pub fn new(tasks: Vec<Task<A, R, E>>) -> Self {
        Self(tasks)
    }

    /// Tasks without an error, in original order
    pub fn ok_tasks(&self) -> Vec<&Task<A, R, E>> {
        self.0.iter().filter(|task| task.is_ok()).collect()
    }

    /// Tasks with an error, in original order
    pub fn wa_tasks(&self) -> Vec<&Task<A, R, E>> {
        self.0.iter().filter(|task| task.is_wa()).collect()
    }

    /// Split into (ok, wa), each keeping original relative order
    pub fn into_partition(self) -> (Tasks<A, R, E>, Tasks<A, R, E>) {
        let (ok, wa): (Vec<_>, Vec<_>) = self.0.into_iter().partition(Task::is_ok);
        (Tasks(ok), Tasks(wa))
    }

    /// One value per task, in order: the stored result for successes,
    /// `new_wa(arg, erx)` for failures.
    ///
    /// A task that never ran carries no error, so it passes like every other
    /// view sees it and yields `R::default()`. This happens when
    /// [`Group::try_go`](crate::Group::try_go) turned its runnable away.
    pub fn flatten<F>(self, mut new_wa: F) -> Vec<R>
    where
        R: Default,
        F: FnMut(A, E) -> R,
    {
        self.0
            .into_iter()
            .map(|task| match (task.res, task.erx) {
                (_, Some(erx)) => new_wa(task.arg, erx),
                (res, None) => res.unwrap_or_default(),
            })
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let ok = self.0.iter().filter(|task| task.is_ok()).count();
        BatchSummary {
            total: self.0.len(),
            ok,
            wa: self.0.len() - ok,
        }
    }

    pub fn into_inner(self) -> Vec<Task<A, R, E>> {
        self.0
    }
}

impl<A, R, E> Deref for Tasks<A, R, E> {
    type Target = [Task<A, R, E>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<A, R, E> IntoIterator for Tasks<A, R, E> {
    type Item = Task<A, R, E>;
    type IntoIter = std::vec::IntoIter<Task<A, R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, A, R, E> IntoIterator for &'a Tasks<A, R, E> {
    type Item = &'a Task<A, R, E>;
    type IntoIter = std::slice::Iter<'a, Task<A, R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<A, R, E> FromIterator<Task<A, R, E>> for Tasks<A, R, E> {
    fn from_iter<I: IntoIterator<Item = Task<A, R, E>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
