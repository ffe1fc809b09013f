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
    backend::{ConvexSolver, HighsSolver},
    engine::{
        err::PlannerError,
        scenario::{Scenario, ScenarioResult},
    },
    extract::SolutionExtractor,
    pricing::PricingStrategy,
    program::ProgramBuilder,
};
use loadshift_model::prelude::{CapPolicy, Schedule, TaskCatalog};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::time::Instant;

/// Build, solve and extract in one call.
#[derive(Debug, Clone)]
pub struct EnergyPlanner<S> {
    solver: S,
    extractor: SolutionExtractor,
}

impl Default for EnergyPlanner<HighsSolver> {
    fn default() -> Self {
        Self::new(HighsSolver::default())
    }
}

impl<S: ConvexSolver> EnergyPlanner<S> {
    #[inline]
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            extractor: SolutionExtractor::default(),
        }
    }

    #[inline]
    pub fn with_extractor(mut self, extractor: SolutionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    #[inline]
    pub fn extractor(&self) -> &SolutionExtractor {
        &self.extractor
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(pricing = %pricing.name(), solver = %self.solver.name(), caps = %caps)
    )]
    pub fn plan(
        &self,
        catalog: &TaskCatalog,
        pricing: &dyn PricingStrategy,
        caps: &CapPolicy,
    ) -> Result<Schedule, PlannerError> {
        let t0 = Instant::now();
        let program = ProgramBuilder::build(catalog, pricing, caps)?;
        let outcome = self.solver.solve(&program);
        if let Some(message) = outcome.message() {
            tracing::debug!("{} reported: {}", self.solver.name(), message);
        }
        let schedule = self
            .extractor
            .extract(catalog, &program, &outcome, pricing, caps)?;

        tracing::info!(
            "{}: {} task(s) of {} user(s) planned at cost {:.6} in {} round(s), {} ms",
            pricing.name(),
            catalog.task_count(),
            catalog.user_count(),
            schedule.total_cost(),
            schedule.cut_rounds(),
            t0.elapsed().as_millis()
        );
        Ok(schedule)
    }

    /// Plans every scenario independently, in parallel. Results keep the
    /// order of `scenarios`.
    pub fn solve_scenarios(
        &self,
        catalog: &TaskCatalog,
        scenarios: &[Scenario],
    ) -> Vec<ScenarioResult> {
        scenarios
            .par_iter()
            .map(|s| {
                let result = self.plan(catalog, s.pricing(), s.caps());
                if let Err(e) = &result {
                    tracing::warn!("Scenario {} failed: {}", s.name(), e);
                }
                ScenarioResult::new(s.name(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::SolveOutcome,
        extract::{ExtractError, SolverError},
        pricing::LinearPricing,
        program::{BuildError, prog::Program},
    };
    use loadshift_core::prelude::HOURS_PER_DAY;
    use loadshift_model::prelude::{CatalogBuilder, SolverStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Never solves anything, only counts how often it was asked to.
    #[derive(Debug, Default)]
    struct RefusingSolver {
        calls: AtomicUsize,
    }

    impl ConvexSolver for RefusingSolver {
        fn name(&self) -> &str {
            "refusing"
        }

        fn solve(&self, _program: &Program) -> SolveOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SolveOutcome::failed(SolverStatus::Error, 0).with_message("refused")
        }
    }

    fn flat() -> LinearPricing {
        LinearPricing::from_slice(&[1.0; HOURS_PER_DAY]).unwrap()
    }

    #[test]
    fn test_solver_failure_surfaces_as_solver_error() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 0, 1.0, 1.0)]).unwrap();
        let catalog = b.build().unwrap();

        let planner = EnergyPlanner::new(RefusingSolver::default());
        let err = planner
            .plan(&catalog, &flat(), &CapPolicy::none())
            .unwrap_err();
        assert_eq!(
            err,
            PlannerError::Extract(ExtractError::Solver(SolverError::new(SolverStatus::Error)))
        );
        assert_eq!(planner.solver().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_infeasible_catalog_never_reaches_the_solver() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 0, 1.0, 2.0)]).unwrap();
        let catalog = b.build().unwrap();

        let planner = EnergyPlanner::new(RefusingSolver::default());
        let err = planner
            .plan(&catalog, &flat(), &CapPolicy::none())
            .unwrap_err();
        assert!(matches!(err, PlannerError::Build(BuildError::Infeasible(_))));
        assert_eq!(planner.solver().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scenarios_keep_their_order() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 1, 1.0, 1.0)]).unwrap();
        let catalog = b.build().unwrap();

        let scenarios: Vec<Scenario> = (0..4)
            .map(|i| Scenario::new(format!("s{i}"), flat(), CapPolicy::none()))
            .collect();
        let planner = EnergyPlanner::new(RefusingSolver::default());
        let results = planner.solve_scenarios(&catalog, &scenarios);

        let names: Vec<&str> = results.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["s0", "s1", "s2", "s3"]);
        assert!(results.iter().all(|r| !r.is_ok()));
        assert_eq!(planner.solver().calls.load(Ordering::SeqCst), 4);
    }
}
