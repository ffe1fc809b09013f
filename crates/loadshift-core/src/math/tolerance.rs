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

use num_traits::Float;
use std::fmt::Debug;

/// Scaled comparison of floating point quantities coming back from a solver.
///
/// Two values `a` and `b` match when `|a - b| <= tol * max(1, |b|)`, i.e. the
/// tolerance is absolute for small magnitudes and relative for large ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<F> {
    tol: F,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidToleranceError<F> {
    value: F,
}

impl<F: Float + Debug> InvalidToleranceError<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }
    pub fn value(&self) -> F {
        self.value
    }
}

impl<F: Float + Debug> std::fmt::Display for InvalidToleranceError<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid tolerance {:?}. Tolerances must be finite and positive.",
            self.value
        )
    }
}

impl<F: Float + Debug> std::error::Error for InvalidToleranceError<F> {}

impl<F: Float + Debug> Tolerance<F> {
    #[inline]
    pub fn new(tol: F) -> Result<Self, InvalidToleranceError<F>> {
        if !tol.is_finite() || tol <= F::zero() {
            return Err(InvalidToleranceError::new(tol));
        }
        Ok(Self { tol })
    }

    #[inline]
    pub fn value(&self) -> F {
        self.tol
    }

    /// Scaled difference `|actual - expected| / max(1, |expected|)`.
    #[inline]
    pub fn scaled_gap(&self, actual: F, expected: F) -> F {
        (actual - expected).abs() / expected.abs().max(F::one())
    }

    #[inline]
    pub fn matches(&self, actual: F, expected: F) -> bool {
        self.scaled_gap(actual, expected) <= self.tol
    }

    /// `true` if `value <= limit` up to the tolerance.
    #[inline]
    pub fn at_most(&self, value: F, limit: F) -> bool {
        value <= limit + self.tol * limit.abs().max(F::one())
    }

    /// `true` if `value >= limit` up to the tolerance.
    #[inline]
    pub fn at_least(&self, value: F, limit: F) -> bool {
        value >= limit - self.tol * limit.abs().max(F::one())
    }

    /// Lifts negative round-off in `[-tol, 0)` to zero. Positive values and
    /// genuinely negative ones are returned untouched.
    #[inline]
    pub fn clamp_negative(&self, value: F) -> F {
        if value < F::zero() && value >= -self.tol {
            F::zero()
        } else {
            value
        }
    }
}

impl Tolerance<f64> {
    /// Slack for products of user supplied decimals, e.g. `0.3 * 3.0`.
    pub const ROUND_OFF: Self = Self { tol: 1e-9 };
}

impl Default for Tolerance<f64> {
    fn default() -> Self {
        Self { tol: 1e-6 }
    }
}
