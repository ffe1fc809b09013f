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

use serde::Serialize;

/// Terminal status reported by a solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Timeout,
    IterationLimit,
    Error,
}

impl SolverStatus {
    #[inline]
    pub fn is_optimal(self) -> bool {
        matches!(self, SolverStatus::Optimal)
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::Timeout => "time limit reached",
            SolverStatus::IterationLimit => "iteration limit reached",
            SolverStatus::Error => "solver error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_optimal_is_optimal() {
        assert!(SolverStatus::Optimal.is_optimal());
        for s in [
            SolverStatus::Infeasible,
            SolverStatus::Unbounded,
            SolverStatus::Timeout,
            SolverStatus::IterationLimit,
            SolverStatus::Error,
        ] {
            assert!(!s.is_optimal(), "{s}");
        }
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&SolverStatus::IterationLimit).unwrap();
        assert_eq!(json, "\"iteration_limit\"");
    }
}
