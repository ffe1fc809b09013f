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

use crate::program::{
    expr::{Constraint, LinearExpr, QuadraticBound},
    var::{Variable, VariableId, VariableKind},
};
use loadshift_core::prelude::{HourPoint, HourWindow};
use loadshift_model::prelude::{PricingMode, TaskKey};
use std::collections::BTreeMap;

/// The allocation variables of one task, one per hour of its window.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlots {
    window: HourWindow,
    vars: Vec<(HourPoint, VariableId)>,
}

impl AllocationSlots {
    #[inline]
    pub fn new(window: HourWindow) -> Self {
        Self {
            window,
            vars: Vec::with_capacity(window.len()),
        }
    }

    #[inline]
    pub fn push(&mut self, hour: HourPoint, var: VariableId) {
        self.vars.push((hour, var));
    }

    #[inline]
    pub fn window(&self) -> HourWindow {
        self.window
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (HourPoint, VariableId)> + '_ {
        self.vars.iter().copied()
    }

    #[inline]
    pub fn var_at(&self, hour: HourPoint) -> Option<VariableId> {
        self.vars.iter().find(|(h, _)| *h == hour).map(|(_, v)| *v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Solver-independent linear program with optional convex quadratic bounds.
/// The objective is always minimised.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    mode: PricingMode,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    quadratic_bounds: Vec<QuadraticBound>,
    objective: LinearExpr,
    allocations: BTreeMap<TaskKey, AllocationSlots>,
    hourly_totals: Vec<VariableId>,
    cost_surrogates: Vec<VariableId>,
}

impl Program {
    #[inline]
    pub fn new(mode: PricingMode) -> Self {
        Self {
            mode,
            variables: Vec::new(),
            constraints: Vec::new(),
            quadratic_bounds: Vec::new(),
            objective: LinearExpr::new(),
            allocations: BTreeMap::new(),
            hourly_totals: Vec::new(),
            cost_surrogates: Vec::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    #[inline]
    pub fn add_variable(&mut self, kind: VariableKind, lower: f64, upper: f64) -> VariableId {
        let id = VariableId::new(self.variables.len());
        self.variables.push(Variable::new(kind, lower, upper));
        id
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    #[inline]
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId::new(i), v))
    }

    #[inline]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[inline]
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    #[inline]
    pub fn add_quadratic_bound(&mut self, bound: QuadraticBound) -> &mut Self {
        self.quadratic_bounds.push(bound);
        self
    }

    #[inline]
    pub fn quadratic_bounds(&self) -> &[QuadraticBound] {
        &self.quadratic_bounds
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.quadratic_bounds.is_empty()
    }

    #[inline]
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    #[inline]
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    #[inline]
    pub(crate) fn insert_allocation(&mut self, key: TaskKey, slots: AllocationSlots) {
        self.allocations.insert(key, slots);
    }

    #[inline]
    pub fn allocations(&self) -> impl Iterator<Item = (TaskKey, &AllocationSlots)> {
        self.allocations.iter().map(|(k, s)| (*k, s))
    }

    #[inline]
    pub fn allocation_slots(&self, key: TaskKey) -> Option<&AllocationSlots> {
        self.allocations.get(&key)
    }

    #[inline]
    pub(crate) fn set_hourly_totals(&mut self, totals: Vec<VariableId>) {
        self.hourly_totals = totals;
    }

    #[inline]
    pub fn hourly_totals(&self) -> &[VariableId] {
        &self.hourly_totals
    }

    #[inline]
    pub fn hourly_total(&self, hour: HourPoint) -> Option<VariableId> {
        self.hourly_totals.get(hour.index()).copied()
    }

    #[inline]
    pub fn set_cost_surrogates(&mut self, surrogates: Vec<VariableId>) {
        self.cost_surrogates = surrogates;
    }

    /// Empty unless the pricing introduced per-hour cost surrogates.
    #[inline]
    pub fn cost_surrogates(&self) -> &[VariableId] {
        &self.cost_surrogates
    }

    #[inline]
    pub fn cost_surrogate(&self, hour: HourPoint) -> Option<VariableId> {
        self.cost_surrogates.get(hour.index()).copied()
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Program({} pricing, {} variables, {} constraints, {} quadratic bounds)",
            self.mode,
            self.variables.len(),
            self.constraints.len(),
            self.quadratic_bounds.len()
        )
    }
}
