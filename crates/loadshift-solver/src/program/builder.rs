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
    pricing::PricingStrategy,
    program::{
        err::BuildError,
        expr::{Constraint, LinearExpr},
        prog::{AllocationSlots, Program},
        var::{VariableId, VariableKind, hour_tag},
    },
};
use loadshift_core::prelude::{HOURS_PER_DAY, HourPoint};
use loadshift_model::prelude::{CapPolicy, TaskCatalog, UserIdentifier};
use std::collections::BTreeMap;

/// Formulates the allocation problem of a catalog as a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramBuilder;

impl ProgramBuilder {
    /// Fails before creating anything if a task cannot fit its window.
    pub fn build(
        catalog: &TaskCatalog,
        pricing: &dyn PricingStrategy,
        caps: &CapPolicy,
    ) -> Result<Program, BuildError> {
        catalog.check_feasible()?;

        let mut program = Program::new(pricing.mode());
        let mut active: Vec<Vec<VariableId>> = vec![Vec::new(); HOURS_PER_DAY];
        let mut reach = [0.0_f64; HOURS_PER_DAY];
        let mut capped: BTreeMap<(UserIdentifier, HourPoint), Vec<VariableId>> = BTreeMap::new();

        for (key, task) in catalog.iter_tasks() {
            let rate = task.max_hourly_rate();
            let mut slots = AllocationSlots::new(task.window());
            for h in task.window().iter() {
                let x = program.add_variable(VariableKind::Allocation(key, h), 0.0, rate);
                slots.push(h, x);
                active[h.index()].push(x);
                reach[h.index()] += rate;
                if caps.is_restricted(h) {
                    capped.entry((key.user(), h)).or_default().push(x);
                }
            }
            program.add_constraint(Constraint::equal(
                format!("demand[{}]", key),
                LinearExpr::sum(slots.iter().map(|(_, x)| x)),
                task.total_demand(),
            ));
            program.insert_allocation(key, slots);
        }

        let mut totals = Vec::with_capacity(HOURS_PER_DAY);
        for h in HourPoint::all() {
            let i = h.index();
            let total = program.add_variable(VariableKind::HourlyTotal(h), 0.0, reach[i]);
            let balance = active[i]
                .iter()
                .fold(LinearExpr::term(total, 1.0), |acc, &x| acc.with_term(x, -1.0));
            program.add_constraint(Constraint::equal(
                format!("total[{}]", hour_tag(h)),
                balance,
                0.0,
            ));
            totals.push(total);
        }

        for ((user, h), xs) in capped {
            program.add_constraint(Constraint::at_most(
                format!("cap[{}@{}]", user, hour_tag(h)),
                LinearExpr::sum(xs),
                caps.ceiling(),
            ));
        }

        let objective = pricing.encode(&totals, &mut program)?;
        program.set_hourly_totals(totals);
        program.set_objective(objective);

        tracing::debug!(
            "Built {} program: {} variables, {} constraints, {} quadratic bounds",
            program.mode(),
            program.variable_count(),
            program.constraints().len(),
            program.quadratic_bounds().len()
        );
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{LinearPricing, QuadraticPricing};
    use loadshift_model::prelude::{CatalogBuilder, TaskIdentifier, TaskKey};

    fn key(u: u32, t: u32) -> TaskKey {
        TaskKey::new(UserIdentifier::new(u), TaskIdentifier::new(t))
    }

    fn catalog() -> TaskCatalog {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(10, 13, 1.0, 2.0), (11, 11, 2.0, 1.0)])
            .unwrap();
        b.add_user_tuples("B", [(0, 1, 1.0, 1.0)]).unwrap();
        b.build().unwrap()
    }

    fn linear() -> LinearPricing {
        LinearPricing::from_slice(&[1.0; HOURS_PER_DAY]).unwrap()
    }

    #[test]
    fn test_one_variable_per_window_hour() {
        let p = ProgramBuilder::build(&catalog(), &linear(), &CapPolicy::none()).unwrap();
        // 4 + 1 + 2 allocation slots, 24 hourly totals
        assert_eq!(p.variable_count(), 7 + HOURS_PER_DAY);
        let slots = p.allocation_slots(key(0, 0)).unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.var_at(HourPoint::new(9)).is_none());
        assert!(slots.var_at(HourPoint::new(13)).is_some());
        let x = slots.var_at(HourPoint::new(12)).unwrap();
        assert_eq!(p.variable(x).unwrap().upper(), 1.0);
    }

    #[test]
    fn test_demand_constraints_are_named_equalities() {
        let p = ProgramBuilder::build(&catalog(), &linear(), &CapPolicy::none()).unwrap();
        let c = p.constraint("demand[User(0)/Task(0)]").unwrap();
        assert_eq!(c.sense(), crate::program::expr::ConstraintSense::Equal);
        assert_eq!(c.rhs(), 2.0);
        assert_eq!(c.expr().terms().len(), 4);
    }

    #[test]
    fn test_hourly_totals_bound_by_reachable_rate() {
        let p = ProgramBuilder::build(&catalog(), &linear(), &CapPolicy::none()).unwrap();
        let t11 = p.hourly_total(HourPoint::new(11)).unwrap();
        assert_eq!(p.variable(t11).unwrap().upper(), 3.0);
        let t5 = p.hourly_total(HourPoint::new(5)).unwrap();
        assert_eq!(p.variable(t5).unwrap().upper(), 0.0);
        assert_eq!(p.constraint("total[h11]").unwrap().expr().terms().len(), 3);
        assert_eq!(p.constraint("total[h05]").unwrap().expr().terms().len(), 1);
    }

    #[test]
    fn test_caps_only_where_user_is_active() {
        let p = ProgramBuilder::build(&catalog(), &linear(), &CapPolicy::default()).unwrap();
        let cap = p.constraint("cap[User(0)@h11]").unwrap();
        assert_eq!(cap.rhs(), 2.0);
        assert_eq!(cap.expr().terms().len(), 2);
        assert!(p.constraint("cap[User(0)@h13]").is_some());
        assert!(p.constraint("cap[User(0)@h21]").is_none());
        assert!(p.constraint("cap[User(1)@h11]").is_none());
    }

    #[test]
    fn test_quadratic_program_carries_surrogates() {
        let p = ProgramBuilder::build(&catalog(), &QuadraticPricing::new(), &CapPolicy::none())
            .unwrap();
        assert_eq!(p.cost_surrogates().len(), HOURS_PER_DAY);
        assert_eq!(p.quadratic_bounds().len(), HOURS_PER_DAY);
        assert_eq!(p.objective().terms().len(), HOURS_PER_DAY);
        assert!(!p.is_linear());
    }

    #[test]
    fn test_infeasible_task_fails_before_building() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 0, 1.0, 2.0)]).unwrap();
        let err = ProgramBuilder::build(&b.build().unwrap(), &linear(), &CapPolicy::none())
            .unwrap_err();
        match err {
            BuildError::Infeasible(e) => {
                assert_eq!(e.task(), key(0, 0));
                assert_eq!(e.demand(), 2.0);
                assert_eq!(e.capacity(), 1.0);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_empty_catalog_yields_trivial_program() {
        let p = ProgramBuilder::build(&TaskCatalog::default(), &linear(), &CapPolicy::default())
            .unwrap();
        assert_eq!(p.variable_count(), HOURS_PER_DAY);
        assert_eq!(p.constraints().len(), HOURS_PER_DAY);
    }
}
