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
use loadshift_model::prelude::TaskKey;

/// Dense index of a variable inside one [`crate::program::Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[inline]
pub(crate) fn hour_tag(hour: HourPoint) -> String {
    format!("h{:02}", hour.value())
}

/// What a variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Energy given to one task in one hour of its window.
    Allocation(TaskKey, HourPoint),
    /// Aggregate load of all tasks in one hour.
    HourlyTotal(HourPoint),
    /// Upper estimate of the non-linear cost of one hour.
    CostSurrogate(HourPoint),
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Allocation(key, h) => write!(f, "x[{}@{}]", key, hour_tag(*h)),
            VariableKind::HourlyTotal(h) => write!(f, "total[{}]", hour_tag(*h)),
            VariableKind::CostSurrogate(h) => write!(f, "cost[{}]", hour_tag(*h)),
        }
    }
}

/// Continuous variable with box bounds. `upper` may be `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    kind: VariableKind,
    lower: f64,
    upper: f64,
}

impl Variable {
    #[inline]
    pub fn new(kind: VariableKind, lower: f64, upper: f64) -> Self {
        Self { kind, lower, upper }
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `true` unless the bounds pin the variable to a single value.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.lower != self.upper
    }
}
