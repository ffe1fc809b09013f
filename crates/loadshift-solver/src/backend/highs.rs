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

use crate::{
    backend::{ConvexSolver, SolveOutcome},
    program::{
        expr::{ConstraintSense, LinearExpr},
        prog::Program,
        var::VariableId,
    },
};
use good_lp::solvers::highs::highs;
use good_lp::{Expression, ResolutionError, Solution, SolverModel, variable, variables};
use loadshift_model::prelude::SolverStatus;
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighsSolverConfig {
    /// Wall-clock budget for the whole solve, all cut rounds included.
    pub time_limit: Option<Duration>,
    pub max_cut_rounds: usize,
    /// Accepted `coefficient * x^2 - surrogate`, relative to `max(1, coefficient * x^2)`.
    pub cut_tolerance: f64,
    /// Tangents placed evenly over `[0, upper(x)]` before the first round.
    pub initial_tangents: usize,
}

impl Default for HighsSolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            max_cut_rounds: 500,
            cut_tolerance: 1e-8,
            initial_tangents: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cut {
    bound: usize,
    point: f64,
}

/// HiGHS through `good_lp`.
///
/// HiGHS only sees linear programs, so every quadratic bound is replaced by
/// tangent cuts (an outer approximation of the parabola). After each round the
/// bounds the solution still violates get a new tangent at the current point
/// and the LP is solved again, until no bound is violated.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: HighsSolverConfig,
}

impl HighsSolver {
    #[inline]
    pub fn new(config: HighsSolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &HighsSolverConfig {
        &self.config
    }

    fn initial_cuts(&self, program: &Program) -> Vec<Cut> {
        let n = self.config.initial_tangents.max(1);
        let mut cuts = Vec::with_capacity(n * program.quadratic_bounds().len());
        for (i, b) in program.quadratic_bounds().iter().enumerate() {
            let upper = program
                .variable(b.argument())
                .map(|v| v.upper())
                .filter(|u| u.is_finite())
                .unwrap_or(1.0);
            if n == 1 || upper <= 0.0 {
                cuts.push(Cut {
                    bound: i,
                    point: 0.0,
                });
                continue;
            }
            for j in 0..n {
                cuts.push(Cut {
                    bound: i,
                    point: upper * j as f64 / (n - 1) as f64,
                });
            }
        }
        cuts
    }

    /// `None` if the budget is used up.
    fn remaining(&self, start: Instant) -> Option<Option<Duration>> {
        match self.config.time_limit {
            None => Some(None),
            Some(limit) => match limit.checked_sub(start.elapsed()) {
                Some(left) if !left.is_zero() => Some(Some(left)),
                _ => None,
            },
        }
    }

    fn solve_round(
        &self,
        program: &Program,
        cuts: &[Cut],
        time_limit: Option<Duration>,
    ) -> Result<BTreeMap<VariableId, f64>, (SolverStatus, String)> {
        let mut vars = variables!();
        let xs: Vec<good_lp::Variable> = program
            .variables()
            .map(|(_, v)| {
                let mut def = variable().name(v.kind().to_string());
                if v.lower().is_finite() {
                    def = def.min(v.lower());
                }
                if v.upper().is_finite() {
                    def = def.max(v.upper());
                }
                vars.add(def)
            })
            .collect();

        let lower = |e: &LinearExpr| -> Expression {
            e.terms()
                .iter()
                .fold(Expression::from(e.constant_term()), |acc, &(v, c)| {
                    acc + c * xs[v.index()]
                })
        };

        let prob = vars.minimise(lower(program.objective())).using(highs);
        let mut prob = match time_limit {
            Some(limit) => prob.with_time_limit(limit.as_secs_f64()),
            None => prob,
        };

        for c in program.constraints() {
            let lhs = lower(c.expr());
            prob.add_constraint(match c.sense() {
                ConstraintSense::Equal => lhs.eq(c.rhs()),
                ConstraintSense::LessOrEqual => lhs.leq(c.rhs()),
                ConstraintSense::GreaterOrEqual => lhs.geq(c.rhs()),
            });
        }

        // surrogate - slope * argument >= intercept
        let bounds = program.quadratic_bounds();
        for cut in cuts {
            let b = &bounds[cut.bound];
            let (slope, intercept) = b.tangent_at(cut.point);
            let lhs =
                Expression::from(xs[b.surrogate().index()]) - slope * xs[b.argument().index()];
            prob.add_constraint(lhs.geq(intercept));
        }

        match prob.solve() {
            Ok(sol) => Ok(program
                .variables()
                .map(|(id, _)| (id, sol.value(xs[id.index()])))
                .collect()),
            Err(ResolutionError::Infeasible) => {
                Err((SolverStatus::Infeasible, "HiGHS: infeasible".to_owned()))
            }
            Err(ResolutionError::Unbounded) => {
                Err((SolverStatus::Unbounded, "HiGHS: unbounded".to_owned()))
            }
            Err(e) => Err((SolverStatus::Error, format!("HiGHS: {e}"))),
        }
    }
}

impl ConvexSolver for HighsSolver {
    fn name(&self) -> &str {
        "HiGHS (good_lp, Kelley cuts)"
    }

    fn solve(&self, program: &Program) -> SolveOutcome {
        let start = Instant::now();
        let tol = self.config.cut_tolerance;
        let bounds = program.quadratic_bounds();
        let mut cuts = self.initial_cuts(program);
        let max_rounds = if program.is_linear() {
            1
        } else {
            self.config.max_cut_rounds.max(1)
        };

        for round in 1..=max_rounds {
            let Some(budget) = self.remaining(start) else {
                tracing::warn!("HiGHS: time limit reached before round {}", round);
                return SolveOutcome::failed(SolverStatus::Timeout, round - 1);
            };

            let values = match self.solve_round(program, &cuts, budget) {
                Ok(values) => values,
                Err((status, message)) => {
                    if status == SolverStatus::Error {
                        tracing::warn!("{}", message);
                    } else {
                        tracing::debug!("{}", message);
                    }
                    return SolveOutcome::failed(status, round).with_message(message);
                }
            };

            // A solve cut short by the time limit still returns a point.
            if self
                .config
                .time_limit
                .is_some_and(|limit| start.elapsed() >= limit)
            {
                tracing::warn!("HiGHS: time limit reached in round {}", round);
                return SolveOutcome::failed(SolverStatus::Timeout, round);
            }

            let value_of = |v: VariableId| values.get(&v).copied().unwrap_or(0.0);
            let mut violated = 0usize;
            let mut added = 0usize;
            for (i, b) in bounds.iter().enumerate() {
                let x = value_of(b.argument());
                let gap = b.gap(value_of(b.surrogate()), x);
                if gap <= tol * b.value_at(x).max(1.0) {
                    continue;
                }
                violated += 1;
                let known = cuts.iter().any(|c| {
                    c.bound == i && (c.point - x).abs() <= f64::EPSILON * x.abs().max(1.0)
                });
                if !known {
                    cuts.push(Cut { bound: i, point: x });
                    added += 1;
                }
            }

            let objective = program.objective().evaluate(|v| values.get(&v).copied());
            tracing::debug!(
                "HiGHS round {}: objective {:.9}, {} violated bound(s), {} cut(s) total",
                round,
                objective,
                violated,
                cuts.len()
            );

            if violated == 0 || added == 0 {
                if violated > 0 {
                    tracing::debug!(
                        "HiGHS: {} bound(s) above tolerance but already cut; stopping",
                        violated
                    );
                }
                return SolveOutcome::optimal(values, objective, round);
            }
        }

        tracing::warn!(
            "HiGHS: cut rounds exhausted after {} round(s) with bounds still violated",
            max_rounds
        );
        SolveOutcome::failed(SolverStatus::IterationLimit, max_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{
        expr::{Constraint, QuadraticBound},
        var::VariableKind,
    };
    use loadshift_core::prelude::HourPoint;
    use loadshift_model::prelude::PricingMode;

    // min c0 + c1, c_i >= 0.5 t_i^2, t0 + t1 == 2, t_i in [0, 2]
    fn split_program() -> Program {
        let mut p = Program::new(PricingMode::Quadratic);
        let h0 = HourPoint::new(0);
        let h1 = HourPoint::new(1);
        let t0 = p.add_variable(VariableKind::HourlyTotal(h0), 0.0, 2.0);
        let t1 = p.add_variable(VariableKind::HourlyTotal(h1), 0.0, 2.0);
        let c0 = p.add_variable(VariableKind::CostSurrogate(h0), 0.0, 2.0);
        let c1 = p.add_variable(VariableKind::CostSurrogate(h1), 0.0, 2.0);
        p.add_constraint(Constraint::equal("sum", LinearExpr::sum([t0, t1]), 2.0));
        p.add_quadratic_bound(QuadraticBound::new("q0", c0, t0, 0.5));
        p.add_quadratic_bound(QuadraticBound::new("q1", c1, t1, 0.5));
        p.set_objective(LinearExpr::sum([c0, c1]));
        p
    }

    #[test]
    fn test_initial_grid_spans_upper_bound() {
        let solver = HighsSolver::new(HighsSolverConfig {
            initial_tangents: 3,
            ..Default::default()
        });
        let cuts = solver.initial_cuts(&split_program());
        let points: Vec<f64> = cuts.iter().filter(|c| c.bound == 0).map(|c| c.point).collect();
        assert_eq!(points, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_remaining_without_limit_is_unbounded() {
        let solver = HighsSolver::default();
        assert_eq!(solver.remaining(Instant::now()), Some(None));
        let zero = HighsSolver::new(HighsSolverConfig {
            time_limit: Some(Duration::ZERO),
            ..Default::default()
        });
        assert_eq!(zero.remaining(Instant::now()), None);
    }

    #[test]
    fn test_zero_time_budget_is_timeout() {
        let solver = HighsSolver::new(HighsSolverConfig {
            time_limit: Some(Duration::ZERO),
            ..Default::default()
        });
        let out = solver.solve(&split_program());
        assert_eq!(out.status(), SolverStatus::Timeout);
        assert!(out.values().is_empty());
    }

    #[test]
    fn test_cut_loop_converges_on_even_split() {
        let out = HighsSolver::default().solve(&split_program());
        assert_eq!(out.status(), SolverStatus::Optimal);
        let t0 = out.value(VariableId::new(0)).unwrap();
        let t1 = out.value(VariableId::new(1)).unwrap();
        // the objective is flat to first order around the optimum
        assert!((t0 - 1.0).abs() < 1e-3, "t0 = {t0}");
        assert!((t0 + t1 - 2.0).abs() < 1e-9);
        assert!((out.objective().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_tangent_needs_cut_rounds() {
        // starting from the tangent at 0 only, the first LP is far from the parabola
        let solver = HighsSolver::new(HighsSolverConfig {
            initial_tangents: 1,
            ..Default::default()
        });
        let out = solver.solve(&split_program());
        assert_eq!(out.status(), SolverStatus::Optimal);
        assert!(out.rounds() > 1);
        assert!((out.objective().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_limit_reports_iteration_limit() {
        let solver = HighsSolver::new(HighsSolverConfig {
            initial_tangents: 1,
            max_cut_rounds: 1,
            ..Default::default()
        });
        let out = solver.solve(&split_program());
        assert_eq!(out.status(), SolverStatus::IterationLimit);
    }

    #[test]
    fn test_infeasible_program_maps_status() {
        let mut p = Program::new(PricingMode::Linear);
        let x = p.add_variable(VariableKind::HourlyTotal(HourPoint::new(0)), 0.0, 1.0);
        p.add_constraint(Constraint::equal("too_much", LinearExpr::term(x, 1.0), 5.0));
        p.set_objective(LinearExpr::term(x, 1.0));
        let out = HighsSolver::default().solve(&p);
        assert_eq!(out.status(), SolverStatus::Infeasible);
        assert!(out.message().is_some());
    }
}
