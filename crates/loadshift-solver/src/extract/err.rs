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

use loadshift_core::prelude::HourPoint;
use loadshift_model::prelude::{ScheduleValidationError, SolverStatus};

/// The backend did not prove optimality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolverError {
    status: SolverStatus,
}

impl SolverError {
    #[inline]
    pub fn new(status: SolverStatus) -> Self {
        Self { status }
    }

    #[inline]
    pub fn status(&self) -> SolverStatus {
        self.status
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solver finished without an optimal solution: {}", self.status)
    }
}

impl std::error::Error for SolverError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMismatchError {
    recomputed: f64,
    reported: f64,
}

impl CostMismatchError {
    #[inline]
    pub fn new(recomputed: f64, reported: f64) -> Self {
        Self {
            recomputed,
            reported,
        }
    }

    #[inline]
    pub fn recomputed(&self) -> f64 {
        self.recomputed
    }

    #[inline]
    pub fn reported(&self) -> f64 {
        self.reported
    }
}

impl std::fmt::Display for CostMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Recomputed cost {} differs from the reported objective {}",
            self.recomputed, self.reported
        )
    }
}

impl std::error::Error for CostMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurrogateGapError {
    hour: HourPoint,
    surrogate: f64,
    cost: f64,
}

impl SurrogateGapError {
    #[inline]
    pub fn new(hour: HourPoint, surrogate: f64, cost: f64) -> Self {
        Self {
            hour,
            surrogate,
            cost,
        }
    }

    #[inline]
    pub fn hour(&self) -> HourPoint {
        self.hour
    }

    #[inline]
    pub fn surrogate(&self) -> f64 {
        self.surrogate
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl std::fmt::Display for SurrogateGapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cost surrogate at {} is {} but the load costs {}",
            self.hour, self.surrogate, self.cost
        )
    }
}

impl std::error::Error for SurrogateGapError {}

/// The solver claimed optimality but its values do not hold up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultInconsistencyError {
    CostMismatch(CostMismatchError),
    SurrogateGap(SurrogateGapError),
    Violation(ScheduleValidationError),
}

impl std::fmt::Display for ResultInconsistencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultInconsistencyError::CostMismatch(e) => write!(f, "{}", e),
            ResultInconsistencyError::SurrogateGap(e) => write!(f, "{}", e),
            ResultInconsistencyError::Violation(e) => write!(f, "Schedule violates {}", e),
        }
    }
}

impl std::error::Error for ResultInconsistencyError {}

impl From<CostMismatchError> for ResultInconsistencyError {
    fn from(err: CostMismatchError) -> Self {
        ResultInconsistencyError::CostMismatch(err)
    }
}

impl From<SurrogateGapError> for ResultInconsistencyError {
    fn from(err: SurrogateGapError) -> Self {
        ResultInconsistencyError::SurrogateGap(err)
    }
}

impl From<ScheduleValidationError> for ResultInconsistencyError {
    fn from(err: ScheduleValidationError) -> Self {
        ResultInconsistencyError::Violation(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractError {
    Solver(SolverError),
    Inconsistent(ResultInconsistencyError),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Solver(e) => write!(f, "Solver error: {}", e),
            ExtractError::Inconsistent(e) => write!(f, "Inconsistent result: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<SolverError> for ExtractError {
    fn from(err: SolverError) -> Self {
        ExtractError::Solver(err)
    }
}

impl From<ResultInconsistencyError> for ExtractError {
    fn from(err: ResultInconsistencyError) -> Self {
        ExtractError::Inconsistent(err)
    }
}

impl From<CostMismatchError> for ExtractError {
    fn from(err: CostMismatchError) -> Self {
        ExtractError::Inconsistent(err.into())
    }
}

impl From<SurrogateGapError> for ExtractError {
    fn from(err: SurrogateGapError) -> Self {
        ExtractError::Inconsistent(err.into())
    }
}

impl From<ScheduleValidationError> for ExtractError {
    fn from(err: ScheduleValidationError) -> Self {
        ExtractError::Inconsistent(err.into())
    }
}
