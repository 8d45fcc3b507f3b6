//! Plain outcome records for multi-stage pipelines.
//!
//! When a stage's work function runs an inner batch, it returns a
//! [`TaskOutput`] as its result. The outer batch then flattens its tasks with
//! [`TaskOutput::new_wa`] and collects a [`TaskOutputList`], so nesting never
//! goes deeper than one generic container per stage.

use crate::batch::task::BatchSummary;
use crate::constraint::{pass, ErrorType};
use serde::Serialize;
use std::ops::Deref;

/// Outcome of one stage argument; exactly one of result and error is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutput<A, R, E> {
    arg: A,
    res: Option<R>,
    erx: Option<E>,
}

impl<A, R, E: ErrorType> TaskOutput<A, R, E> {
    pub fn new_ok(arg: A, res: R) -> Self {
        Self {
            arg,
            res: Some(res),
            erx: None,
        }
    }

    pub fn new_wa(arg: A, erx: E) -> Self {
        Self {
            arg,
            res: None,
            erx: Some(erx),
        }
    }

    pub fn is_ok(&self) -> bool {
        pass(self.erx.as_ref())
    }

    pub fn arg(&self) -> &A {
        &self.arg
    }

    pub fn res(&self) -> Option<&R> {
        self.res.as_ref()
    }

    pub fn erx(&self) -> Option<&E> {
        self.erx.as_ref()
    }
}

/// A successful output over default values
impl<A: Default, R: Default, E: ErrorType> Default for TaskOutput<A, R, E> {
    fn default() -> Self {
        Self::new_ok(A::default(), R::default())
    }
}

/// Append-only collection of stage outcomes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaskOutputList<A, R, E>(Vec<TaskOutput<A, R, E>>);

impl<A, R, E: ErrorType> TaskOutputList<A, R, E> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, output: TaskOutput<A, R, E>) {
        self.0.push(output);
    }

    pub fn ok_list(&self) -> Vec<&TaskOutput<A, R, E>> {
        self.0.iter().filter(|one| one.is_ok()).collect()
    }

    pub fn wa_list(&self) -> Vec<&TaskOutput<A, R, E>> {
        self.0.iter().filter(|one| !one.is_ok()).collect()
    }

    pub fn ok_count(&self) -> usize {
        self.0.iter().filter(|one| one.is_ok()).count()
    }

    pub fn wa_count(&self) -> usize {
        self.0.iter().filter(|one| !one.is_ok()).count()
    }

    /// Results of successful outputs, in order; one per `ok_count`
    pub fn ok_results(&self) -> Vec<&R> {
        self.0.iter().filter_map(TaskOutput::res).collect()
    }

    /// Errors of failed outputs, in order
    pub fn wa_reasons(&self) -> Vec<&E> {
        self.0.iter().filter_map(TaskOutput::erx).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let ok = self.ok_count();
        BatchSummary {
            total: self.0.len(),
            ok,
            wa: self.0.len() - ok,
        }
    }

    pub fn into_inner(self) -> Vec<TaskOutput<A, R, E>> {
        self.0
    }
}

impl<A, R, E: ErrorType> Default for TaskOutputList<A, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R, E> Deref for TaskOutputList<A, R, E> {
    type Target = [TaskOutput<A, R, E>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<A, R, E> IntoIterator for TaskOutputList<A, R, E> {
    type Item = TaskOutput<A, R, E>;
    type IntoIter = std::vec::IntoIter<TaskOutput<A, R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<A, R, E> FromIterator<TaskOutput<A, R, E>> for TaskOutputList<A, R, E> {
    fn from_iter<I: IntoIterator<Item = TaskOutput<A, R, E>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
