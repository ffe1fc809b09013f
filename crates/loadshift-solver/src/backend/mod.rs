// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

pub mod highs;

pub use highs::{HighsSolver, HighsSolverConfig};

use crate::program::{prog::Program, var::VariableId};
use loadshift_model::prelude::SolverStatus;
use std::collections::BTreeMap;

/// What a backend reports after attempting a [`Program`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    status: SolverStatus,
    values: BTreeMap<VariableId, f64>,
    objective: Option<f64>,
    rounds: usize,
    message: Option<String>,
}

impl SolveOutcome {
    #[inline]
    pub fn optimal(values: BTreeMap<VariableId, f64>, objective: f64, rounds: usize) -> Self {
        Self {
            status: SolverStatus::Optimal,
            values,
            objective: Some(objective),
            rounds,
            message: None,
        }
    }

    #[inline]
    pub fn failed(status: SolverStatus, rounds: usize) -> Self {
        Self {
            status,
            values: BTreeMap::new(),
            objective: None,
            rounds,
            message: None,
        }
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[inline]
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// `None` when the backend did not report the variable.
    #[inline]
    pub fn value(&self, var: VariableId) -> Option<f64> {
        self.values.get(&var).copied()
    }

    #[inline]
    pub fn values(&self) -> &BTreeMap<VariableId, f64> {
        &self.values
    }

    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// A backend able to minimise a [`Program`], including its convex quadratic bounds.
pub trait ConvexSolver: Send + Sync {
    fn name(&self) -> &str;

    fn solve(&self, program: &Program) -> SolveOutcome;
}

impl<S: ConvexSolver + ?Sized> ConvexSolver for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, program: &Program) -> SolveOutcome {
        (**self).solve(program)
    }
}
