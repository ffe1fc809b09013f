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

use crate::program::var::VariableId;
use std::ops::{Add, AddAssign};

/// `constant + Σ coefficient * variable`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl LinearExpr {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    #[inline]
    pub fn term(var: VariableId, coefficient: f64) -> Self {
        Self {
            terms: vec![(var, coefficient)],
            constant: 0.0,
        }
    }

    /// Unit-coefficient sum of the given variables.
    #[inline]
    pub fn sum<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = VariableId>,
    {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    #[inline]
    pub fn add_term(&mut self, var: VariableId, coefficient: f64) -> &mut Self {
        self.terms.push((var, coefficient));
        self
    }

    #[inline]
    pub fn with_term(mut self, var: VariableId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    #[inline]
    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    #[inline]
    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression; variables without a value count as zero.
    pub fn evaluate(&self, value_of: impl Fn(VariableId) -> Option<f64>) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(v, c)| acc + c * value_of(v).unwrap_or(0.0))
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self += rhs;
        self
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl std::iter::Sum for LinearExpr {
    fn sum<I: Iterator<Item = LinearExpr>>(iter: I) -> Self {
        iter.fold(LinearExpr::new(), |acc, e| acc + e)
    }
}

impl std::fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (v, c) in &self.terms {
            if first {
                write!(f, "{c} {v}")?;
                first = false;
            } else {
                write!(f, " + {c} {v}")?;
            }
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

impl std::fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintSense::Equal => write!(f, "=="),
            ConstraintSense::LessOrEqual => write!(f, "<="),
            ConstraintSense::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// `expr (==|<=|>=) rhs`, named for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    expr: LinearExpr,
    sense: ConstraintSense,
    rhs: f64,
}

impl Constraint {
    #[inline]
    pub fn new(name: impl Into<String>, expr: LinearExpr, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    #[inline]
    pub fn equal(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::Equal, rhs)
    }

    #[inline]
    pub fn at_most(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::LessOrEqual, rhs)
    }

    #[inline]
    pub fn at_least(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::GreaterOrEqual, rhs)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    #[inline]
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Amount by which `expr` misses the constraint; zero when satisfied.
    pub fn violation(&self, value_of: impl Fn(VariableId) -> Option<f64>) -> f64 {
        let lhs = self.expr.evaluate(value_of);
        match self.sense {
            ConstraintSense::Equal => (lhs - self.rhs).abs(),
            ConstraintSense::LessOrEqual => (lhs - self.rhs).max(0.0),
            ConstraintSense::GreaterOrEqual => (self.rhs - lhs).max(0.0),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {} {}", self.name, self.expr, self.sense, self.rhs)
    }
}

/// Convex bound `surrogate >= coefficient * argument^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticBound {
    name: String,
    surrogate: VariableId,
    argument: VariableId,
    coefficient: f64,
}

impl QuadraticBound {
    #[inline]
    pub fn new(
        name: impl Into<String>,
        surrogate: VariableId,
        argument: VariableId,
        coefficient: f64,
    ) -> Self {
        Self {
            name: name.into(),
            surrogate,
            argument,
            coefficient,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn surrogate(&self) -> VariableId {
        self.surrogate
    }

    #[inline]
    pub fn argument(&self) -> VariableId {
        self.argument
    }

    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    #[inline]
    pub fn value_at(&self, argument: f64) -> f64 {
        self.coefficient * argument * argument
    }

    /// Tangent of the parabola at `point`, as `(slope, intercept)`:
    /// `surrogate >= slope * argument + intercept`.
    #[inline]
    pub fn tangent_at(&self, point: f64) -> (f64, f64) {
        (
            2.0 * self.coefficient * point,
            -self.coefficient * point * point,
        )
    }

    /// How far the surrogate sits below the parabola.
    #[inline]
    pub fn gap(&self, surrogate: f64, argument: f64) -> f64 {
        self.value_at(argument) - surrogate
    }
}

impl std::fmt::Display for QuadraticBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} >= {} * {}^2",
            self.name, self.surrogate, self.coefficient, self.argument
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VariableId {
        VariableId::new(i)
    }

    #[test]
    fn test_evaluate_treats_missing_as_zero() {
        let e = LinearExpr::constant(1.0)
            .with_term(v(0), 2.0)
            .with_term(v(1), 3.0);
        let val = e.evaluate(|id| (id == v(0)).then_some(4.0));
        assert_eq!(val, 9.0);
    }

    #[test]
    fn test_sum_and_add() {
        let a = LinearExpr::sum([v(0), v(1)]);
        let b = LinearExpr::term(v(2), -1.0);
        let c = a + b;
        assert_eq!(c.terms().len(), 3);
        assert_eq!(c.evaluate(|_| Some(1.0)), 1.0);
        let total: LinearExpr = (0..4).map(|i| LinearExpr::term(v(i), 1.0)).sum();
        assert_eq!(total.evaluate(|_| Some(2.0)), 8.0);
    }

    #[test]
    fn test_constraint_violation_by_sense() {
        let e = LinearExpr::term(v(0), 1.0);
        let at = |x: f64| move |_: VariableId| Some(x);
        assert_eq!(Constraint::equal("e", e.clone(), 2.0).violation(at(1.5)), 0.5);
        assert_eq!(Constraint::at_most("l", e.clone(), 2.0).violation(at(1.5)), 0.0);
        assert_eq!(Constraint::at_most("l", e.clone(), 2.0).violation(at(3.0)), 1.0);
        assert_eq!(Constraint::at_least("g", e, 2.0).violation(at(1.0)), 1.0);
    }

    #[test]
    fn test_tangent_touches_and_underestimates() {
        let q = QuadraticBound::new("q", v(1), v(0), 0.5);
        let (slope, intercept) = q.tangent_at(2.0);
        assert_eq!(slope * 2.0 + intercept, q.value_at(2.0));
        for x in [0.0, 1.0, 3.0, 5.0] {
            assert!(slope * x + intercept <= q.value_at(x));
        }
        assert_eq!(q.gap(1.0, 2.0), 1.0);
    }

    #[test]
    fn test_display_names_constraint() {
        let c = Constraint::equal("demand[x]", LinearExpr::sum([v(0), v(3)]), 2.0);
        assert_eq!(c.to_string(), "demand[x]: 1 v0 + 1 v3 == 2");
    }
}
