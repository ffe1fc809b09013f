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

pub mod err;

pub use err::{
    CostMismatchError, ExtractError, ResultInconsistencyError, SolverError, SurrogateGapError,
};

use crate::{
    backend::SolveOutcome,
    pricing::PricingStrategy,
    program::{prog::Program, var::VariableId},
};
use loadshift_core::prelude::{HourPoint, HourlySeries, Tolerance};
use loadshift_model::prelude::{
    CapPolicy, Schedule, ScheduleBuilder, ScheduleValidator, TaskAllocation, TaskCatalog,
};

/// Turns the raw values of a [`SolveOutcome`] into a checked [`Schedule`].
///
/// Negative round-off within the tolerance is lifted to zero; every other
/// value is kept as reported, however small. The resulting
/// schedule is re-validated against the catalog and caps, its cost is
/// recomputed from the hourly totals and compared with the objective the
/// backend reported, and in quadratic mode every cost surrogate must match
/// the cost of its hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionExtractor {
    tol: Tolerance<f64>,
}

impl SolutionExtractor {
    #[inline]
    pub fn new(tol: Tolerance<f64>) -> Self {
        Self { tol }
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance<f64> {
        self.tol
    }

    fn read(&self, program: &Program, outcome: &SolveOutcome, var: VariableId) -> f64 {
        match outcome.value(var) {
            Some(v) => self.tol.clamp_negative(v),
            None => {
                if program.variable(var).is_some_and(|v| v.is_free()) {
                    tracing::warn!("No value reported for {}, assuming 0", var);
                }
                0.0
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(mode = %program.mode()))]
    pub fn extract(
        &self,
        catalog: &TaskCatalog,
        program: &Program,
        outcome: &SolveOutcome,
        pricing: &dyn PricingStrategy,
        caps: &CapPolicy,
    ) -> Result<Schedule, ExtractError> {
        if !outcome.status().is_optimal() {
            return Err(SolverError::new(outcome.status()))?;
        }

        let reported = outcome
            .objective()
            .unwrap_or_else(|| program.objective().evaluate(|v| outcome.value(v)));

        let mut builder = ScheduleBuilder::new(program.mode(), outcome.status())
            .with_reported_objective(reported)
            .with_cut_rounds(outcome.rounds());

        if !program.cost_surrogates().is_empty() {
            let surrogates = HourlySeries::from_fn(|h| {
                program
                    .cost_surrogate(h)
                    .map_or(0.0, |c| self.read(program, outcome, c))
            });
            builder = builder.with_cost_surrogates(surrogates);
        }

        for (key, slots) in program.allocations() {
            let mut allocation = TaskAllocation::new(key, slots.window());
            for (h, x) in slots.iter() {
                allocation.set(h, self.read(program, outcome, x));
            }
            builder.add_allocation(allocation);
        }

        let schedule = builder.build(
            catalog,
            |h, load| pricing.hourly_cost(h, load),
            |h, load| pricing.marginal_price(h, load),
        );

        ScheduleValidator::validate(catalog, caps, &schedule, self.tol)?;

        if !self.tol.matches(schedule.total_cost(), reported) {
            return Err(CostMismatchError::new(schedule.total_cost(), reported))?;
        }

        if let Some(surrogates) = schedule.cost_surrogates() {
            for h in HourPoint::all() {
                let cost = schedule.hourly_cost()[h];
                if !self.tol.matches(surrogates[h], cost) {
                    return Err(SurrogateGapError::new(h, surrogates[h], cost))?;
                }
            }
        }

        tracing::debug!(
            "Extracted {} allocation(s), total cost {:.6}, peak {:.6} at {}",
            schedule.allocation_count(),
            schedule.total_cost(),
            schedule.peak().1,
            schedule.peak().0
        );
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pricing::{LinearPricing, QuadraticPricing},
        program::ProgramBuilder,
    };
    use loadshift_core::prelude::HOURS_PER_DAY;
    use loadshift_model::prelude::{
        CatalogBuilder, ScheduleValidationError, SolverStatus, TaskIdentifier, TaskKey,
        UserIdentifier,
    };
    use std::collections::BTreeMap;

    fn hp(h: u8) -> HourPoint {
        HourPoint::new(h)
    }

    fn key(u: u32, t: u32) -> TaskKey {
        TaskKey::new(UserIdentifier::new(u), TaskIdentifier::new(t))
    }

    fn catalog() -> TaskCatalog {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 1, 1.0, 2.0)]).unwrap();
        b.build().unwrap()
    }

    fn linear() -> LinearPricing {
        let mut prices = [1.0; HOURS_PER_DAY];
        prices[1] = 3.0;
        LinearPricing::from_slice(&prices).unwrap()
    }

    /// Assigns `x` to the allocation slots of task (0, 0) and fills in the totals.
    fn values_for(program: &Program, x: &[(u8, f64)]) -> BTreeMap<VariableId, f64> {
        let slots = program.allocation_slots(key(0, 0)).unwrap();
        let mut values = BTreeMap::new();
        let mut totals = [0.0; HOURS_PER_DAY];
        for &(h, v) in x {
            values.insert(slots.var_at(hp(h)).unwrap(), v);
            totals[h as usize] += v;
        }
        for h in HourPoint::all() {
            values.insert(program.hourly_total(h).unwrap(), totals[h.index()]);
        }
        values
    }

    #[test]
    fn test_extracts_allocation_and_cost() {
        let c = catalog();
        let pricing = linear();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        let outcome = SolveOutcome::optimal(values_for(&program, &[(0, 1.0), (1, 1.0)]), 4.0, 1);

        let s = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap();
        assert_eq!(s.status(), SolverStatus::Optimal);
        assert_eq!(s.allocation(key(0, 0)).unwrap().at(hp(0)), 1.0);
        assert_eq!(s.allocation(key(0, 0)).unwrap().at(hp(1)), 1.0);
        assert_eq!(s.total_cost(), 4.0);
        assert_eq!(s.reported_objective(), 4.0);
        assert!(s.cost_surrogates().is_none());
    }

    #[test]
    fn test_negative_round_off_is_clamped() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 2, 1.0, 1.0)]).unwrap();
        let c = b.build().unwrap();
        let pricing = linear();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        let values = values_for(&program, &[(0, 1.0000000004), (1, -3e-9), (2, 2e-9)]);
        let outcome = SolveOutcome::optimal(values, 1.0, 1);

        let s = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap();
        let a = s.allocation(key(0, 0)).unwrap();
        assert_eq!(a.at(hp(1)), 0.0);
        assert_eq!(a.at(hp(2)), 2e-9);
        assert!((a.delivered() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_tiny_demands_are_kept() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", (0..10).map(|_| (0, 0, 1.0, 9e-7))).unwrap();
        let c = b.build().unwrap();
        let pricing = LinearPricing::from_slice(&[1.0; HOURS_PER_DAY]).unwrap();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();

        let mut values = BTreeMap::new();
        for t in 0..10 {
            let slots = program.allocation_slots(key(0, t)).unwrap();
            values.insert(slots.var_at(hp(0)).unwrap(), 9e-7);
        }
        for h in HourPoint::all() {
            let total = if h.value() == 0 { 9e-6 } else { 0.0 };
            values.insert(program.hourly_total(h).unwrap(), total);
        }
        let outcome = SolveOutcome::optimal(values, 9e-6, 1);

        let s = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap();
        for t in 0..10 {
            assert_eq!(s.allocation(key(0, t)).unwrap().at(hp(0)), 9e-7);
        }
        assert!((s.total_cost() - 9e-6).abs() < 1e-15);
    }

    #[test]
    fn test_non_optimal_status_is_a_solver_error() {
        let c = catalog();
        let pricing = linear();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        for status in [
            SolverStatus::Infeasible,
            SolverStatus::Timeout,
            SolverStatus::IterationLimit,
            SolverStatus::Error,
        ] {
            let outcome = SolveOutcome::failed(status, 1);
            let err = SolutionExtractor::default()
                .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
                .unwrap_err();
            assert_eq!(err, ExtractError::Solver(SolverError::new(status)));
        }
    }

    #[test]
    fn test_wrong_objective_is_inconsistent() {
        let c = catalog();
        let pricing = linear();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        let outcome = SolveOutcome::optimal(values_for(&program, &[(0, 1.0), (1, 1.0)]), 2.0, 1);
        let err = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap_err();
        match err {
            ExtractError::Inconsistent(ResultInconsistencyError::CostMismatch(e)) => {
                assert_eq!(e.recomputed(), 4.0);
                assert_eq!(e.reported(), 2.0);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_unmet_demand_is_a_violation() {
        let c = catalog();
        let pricing = linear();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        let outcome = SolveOutcome::optimal(values_for(&program, &[(0, 1.0)]), 1.0, 1);
        let err = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Inconsistent(ResultInconsistencyError::Violation(
                ScheduleValidationError::DemandMismatch(_)
            ))
        ));
    }

    #[test]
    fn test_quadratic_surrogates_must_match_cost() {
        let c = catalog();
        let pricing = QuadraticPricing::new();
        let program = ProgramBuilder::build(&c, &pricing, &CapPolicy::none()).unwrap();
        let mut values = values_for(&program, &[(0, 1.0), (1, 1.0)]);
        for h in HourPoint::all() {
            let surrogate = program.cost_surrogate(h).unwrap();
            values.insert(surrogate, if h.value() <= 1 { 0.5 } else { 0.0 });
        }
        let outcome = SolveOutcome::optimal(values.clone(), 1.0, 3);
        let s = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap();
        assert_eq!(s.total_cost(), 1.0);
        assert_eq!(s.cut_rounds(), 3);
        assert_eq!(s.cost_surrogates().unwrap()[hp(0)], 0.5);

        // Shifting surrogate weight between hours leaves the objective intact.
        values.insert(program.cost_surrogate(hp(0)).unwrap(), 0.25);
        values.insert(program.cost_surrogate(hp(1)).unwrap(), 0.75);
        let outcome = SolveOutcome::optimal(values, 1.0, 3);
        let err = SolutionExtractor::default()
            .extract(&c, &program, &outcome, &pricing, &CapPolicy::none())
            .unwrap_err();
        match err {
            ExtractError::Inconsistent(ResultInconsistencyError::SurrogateGap(e)) => {
                assert_eq!(e.hour(), hp(0));
                assert_eq!(e.surrogate(), 0.25);
                assert_eq!(e.cost(), 0.5);
            }
            other => panic!("unexpected {other}"),
        }
    }
}
