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
    pricing::PricingMode,
    problem::{
        catalog::TaskCatalog,
        task::{TaskIdentifier, TaskKey},
        user::UserIdentifier,
    },
    solution::status::SolverStatus,
};
use loadshift_core::prelude::{HourPoint, HourWindow, HourlySeries};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Energy assigned to one task, hour by hour. Hours outside the window are
/// kept at zero by construction of the program, not by this type.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAllocation {
    key: TaskKey,
    window: HourWindow,
    profile: HourlySeries,
}

impl TaskAllocation {
    #[inline]
    pub fn new(key: TaskKey, window: HourWindow) -> Self {
        Self {
            key,
            window,
            profile: HourlySeries::zeros(),
        }
    }

    #[inline]
    pub fn with_profile(key: TaskKey, window: HourWindow, profile: HourlySeries) -> Self {
        Self {
            key,
            window,
            profile,
        }
    }

    #[inline]
    pub fn set(&mut self, hour: HourPoint, value: f64) {
        self.profile[hour] = value;
    }

    #[inline]
    pub fn key(&self) -> TaskKey {
        self.key
    }

    #[inline]
    pub fn user(&self) -> UserIdentifier {
        self.key.user()
    }

    #[inline]
    pub fn window(&self) -> HourWindow {
        self.window
    }

    #[inline]
    pub fn profile(&self) -> &HourlySeries {
        &self.profile
    }

    #[inline]
    pub fn at(&self, hour: HourPoint) -> f64 {
        self.profile.get(hour)
    }

    /// Energy actually delivered across the whole day.
    #[inline]
    pub fn delivered(&self) -> f64 {
        self.profile.total()
    }

    #[inline]
    pub fn iter_window(&self) -> impl Iterator<Item = (HourPoint, f64)> + '_ {
        self.window.iter().map(move |h| (h, self.profile.get(h)))
    }
}

/// An optimal plan for one catalog under one pricing mode.
///
/// Per-user and per-hour aggregates as well as the cost figures are derived
/// once, when the schedule is assembled, and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    mode: PricingMode,
    status: SolverStatus,
    allocations: BTreeMap<TaskKey, TaskAllocation>,
    user_names: BTreeMap<UserIdentifier, String>,
    user_hourly: BTreeMap<UserIdentifier, HourlySeries>,
    hourly_totals: HourlySeries,
    hourly_cost: HourlySeries,
    marginal_prices: HourlySeries,
    cost_surrogates: Option<HourlySeries>,
    total_cost: f64,
    reported_objective: f64,
    cut_rounds: usize,
}

impl Schedule {
    #[inline]
    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    #[inline]
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    #[inline]
    pub fn allocations(&self) -> impl Iterator<Item = &TaskAllocation> {
        self.allocations.values()
    }

    #[inline]
    pub fn allocation(&self, key: TaskKey) -> Option<&TaskAllocation> {
        self.allocations.get(&key)
    }

    #[inline]
    pub fn allocation_of(&self, user: u32, task: u32) -> Option<&TaskAllocation> {
        self.allocation(TaskKey::new(
            UserIdentifier::new(user),
            TaskIdentifier::new(task),
        ))
    }

    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    #[inline]
    pub fn user_name(&self, user: UserIdentifier) -> Option<&str> {
        self.user_names.get(&user).map(String::as_str)
    }

    #[inline]
    pub fn user_hourly(&self, user: UserIdentifier) -> Option<&HourlySeries> {
        self.user_hourly.get(&user)
    }

    #[inline]
    pub fn iter_user_hourly(&self) -> impl Iterator<Item = (UserIdentifier, &HourlySeries)> {
        self.user_hourly.iter().map(|(u, s)| (*u, s))
    }

    #[inline]
    pub fn hourly_totals(&self) -> &HourlySeries {
        &self.hourly_totals
    }

    #[inline]
    pub fn hourly_cost(&self) -> &HourlySeries {
        &self.hourly_cost
    }

    #[inline]
    pub fn marginal_prices(&self) -> &HourlySeries {
        &self.marginal_prices
    }

    /// Solver values of the per-hour cost surrogates, quadratic mode only.
    #[inline]
    pub fn cost_surrogates(&self) -> Option<&HourlySeries> {
        self.cost_surrogates.as_ref()
    }

    /// Cost recomputed from the allocations, independent of the solver.
    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    #[inline]
    pub fn reported_objective(&self) -> f64 {
        self.reported_objective
    }

    #[inline]
    pub fn cut_rounds(&self) -> usize {
        self.cut_rounds
    }

    #[inline]
    pub fn total_energy(&self) -> f64 {
        self.hourly_totals.total()
    }

    #[inline]
    pub fn peak(&self) -> (HourPoint, f64) {
        self.hourly_totals.peak()
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    mode: PricingMode,
    status: SolverStatus,
    allocations: BTreeMap<TaskKey, TaskAllocation>,
    reported_objective: f64,
    cost_surrogates: Option<HourlySeries>,
    cut_rounds: usize,
}

impl ScheduleBuilder {
    #[inline]
    pub fn new(mode: PricingMode, status: SolverStatus) -> Self {
        Self {
            mode,
            status,
            allocations: BTreeMap::new(),
            reported_objective: 0.0,
            cost_surrogates: None,
            cut_rounds: 0,
        }
    }

    #[inline]
    pub fn with_reported_objective(mut self, objective: f64) -> Self {
        self.reported_objective = objective;
        self
    }

    #[inline]
    pub fn with_cost_surrogates(mut self, surrogates: HourlySeries) -> Self {
        self.cost_surrogates = Some(surrogates);
        self
    }

    #[inline]
    pub fn with_cut_rounds(mut self, rounds: usize) -> Self {
        self.cut_rounds = rounds;
        self
    }

    /// Adds an allocation, replacing any earlier one for the same task.
    #[inline]
    pub fn add_allocation(&mut self, allocation: TaskAllocation) -> &mut Self {
        self.allocations.insert(allocation.key(), allocation);
        self
    }

    #[inline]
    pub fn extend_allocations<I>(&mut self, allocations: I) -> &mut Self
    where
        I: IntoIterator<Item = TaskAllocation>,
    {
        for a in allocations {
            self.add_allocation(a);
        }
        self
    }

    /// Derives the aggregates. `hourly_cost` and `marginal_price` receive the
    /// hour and the aggregate load of that hour.
    pub fn build<C, M>(self, catalog: &TaskCatalog, hourly_cost: C, marginal_price: M) -> Schedule
    where
        C: Fn(HourPoint, f64) -> f64,
        M: Fn(HourPoint, f64) -> f64,
    {
        let user_names: BTreeMap<UserIdentifier, String> = catalog
            .iter_users()
            .map(|u| (u.id(), u.name().to_owned()))
            .collect();

        let mut user_hourly: BTreeMap<UserIdentifier, HourlySeries> = user_names
            .keys()
            .map(|&u| (u, HourlySeries::zeros()))
            .collect();
        let mut hourly_totals = HourlySeries::zeros();
        for a in self.allocations.values() {
            *user_hourly.entry(a.user()).or_default() += *a.profile();
            hourly_totals += *a.profile();
        }

        let cost = hourly_totals.map(&hourly_cost);
        let marginal = hourly_totals.map(&marginal_price);

        Schedule {
            mode: self.mode,
            status: self.status,
            allocations: self.allocations,
            user_names,
            user_hourly,
            hourly_totals,
            total_cost: cost.total(),
            hourly_cost: cost,
            marginal_prices: marginal,
            cost_surrogates: self.cost_surrogates,
            reported_objective: self.reported_objective,
            cut_rounds: self.cut_rounds,
        }
    }
}

#[derive(Serialize)]
struct AllocationRecord<'a> {
    user: UserIdentifier,
    task: TaskIdentifier,
    ready: HourPoint,
    deadline: HourPoint,
    delivered: f64,
    profile: &'a HourlySeries,
}

#[derive(Serialize)]
struct UserRecord<'a> {
    id: UserIdentifier,
    name: &'a str,
    total: f64,
    hourly: &'a HourlySeries,
}

#[derive(Serialize)]
struct ScheduleRecord<'a> {
    mode: PricingMode,
    status: SolverStatus,
    total_cost: f64,
    reported_objective: f64,
    cut_rounds: usize,
    total_energy: f64,
    peak_hour: HourPoint,
    peak_load: f64,
    hourly_totals: &'a HourlySeries,
    hourly_cost: &'a HourlySeries,
    marginal_prices: &'a HourlySeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_surrogates: Option<&'a HourlySeries>,
    users: Vec<UserRecord<'a>>,
    allocations: Vec<AllocationRecord<'a>>,
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (peak_hour, peak_load) = self.peak();
        let users = self
            .user_hourly
            .iter()
            .map(|(&id, hourly)| UserRecord {
                id,
                name: self.user_name(id).unwrap_or_default(),
                total: hourly.total(),
                hourly,
            })
            .collect();
        let allocations = self
            .allocations
            .values()
            .map(|a| AllocationRecord {
                user: a.key().user(),
                task: a.key().task(),
                ready: a.window().ready(),
                deadline: a.window().deadline(),
                delivered: a.delivered(),
                profile: a.profile(),
            })
            .collect();

        ScheduleRecord {
            mode: self.mode,
            status: self.status,
            total_cost: self.total_cost,
            reported_objective: self.reported_objective,
            cut_rounds: self.cut_rounds,
            total_energy: self.total_energy(),
            peak_hour,
            peak_load,
            hourly_totals: &self.hourly_totals,
            hourly_cost: &self.hourly_cost,
            marginal_prices: &self.marginal_prices,
            cost_surrogates: self.cost_surrogates.as_ref(),
            users,
            allocations,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::builder::CatalogBuilder;

    fn hp(h: u8) -> HourPoint {
        HourPoint::new(h)
    }

    fn key(u: u32, t: u32) -> TaskKey {
        TaskKey::new(UserIdentifier::new(u), TaskIdentifier::new(t))
    }

    fn catalog() -> TaskCatalog {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("A", [(0, 1, 1.0, 2.0)]).unwrap();
        b.add_user_tuples("B", [(1, 2, 1.0, 1.0)]).unwrap();
        b.build().unwrap()
    }

    fn schedule() -> Schedule {
        let mut a = TaskAllocation::new(key(0, 0), HourWindow::new(0, 1).unwrap());
        a.set(hp(0), 1.0);
        a.set(hp(1), 1.0);
        let mut b = TaskAllocation::new(key(1, 0), HourWindow::new(1, 2).unwrap());
        b.set(hp(1), 1.0);

        let mut builder = ScheduleBuilder::new(PricingMode::Linear, SolverStatus::Optimal)
            .with_reported_objective(5.0)
            .with_cut_rounds(1);
        builder.extend_allocations([a, b]);
        builder.build(&catalog(), |h, load| (h.index() as f64 + 1.0) * load, |h, _| {
            h.index() as f64 + 1.0
        })
    }

    #[test]
    fn test_aggregates_are_derived() {
        let s = schedule();
        assert_eq!(s.hourly_totals().get(hp(0)), 1.0);
        assert_eq!(s.hourly_totals().get(hp(1)), 2.0);
        assert_eq!(s.hourly_totals().get(hp(2)), 0.0);
        assert_eq!(s.user_hourly(UserIdentifier::new(1)).unwrap().get(hp(1)), 1.0);
        assert_eq!(s.total_energy(), 3.0);
        assert_eq!(s.total_cost(), 1.0 + 2.0 * 2.0);
        assert_eq!(s.marginal_prices().get(hp(23)), 24.0);
        assert_eq!(s.peak(), (hp(1), 2.0));
        assert_eq!(s.allocation_of(0, 0).unwrap().delivered(), 2.0);
        assert_eq!(s.user_name(UserIdentifier::new(1)), Some("B"));
    }

    #[test]
    fn test_users_without_allocations_still_report_zero_usage() {
        let mut b = CatalogBuilder::new();
        b.add_user_tuples("idle", std::iter::empty()).unwrap();
        let s = ScheduleBuilder::new(PricingMode::Quadratic, SolverStatus::Optimal)
            .build(&b.build().unwrap(), |_, l| 0.5 * l * l, |_, l| l);
        assert_eq!(s.user_hourly(UserIdentifier::new(0)).unwrap().total(), 0.0);
        assert_eq!(s.total_cost(), 0.0);
        assert!(s.cost_surrogates().is_none());
    }

    #[test]
    fn test_iter_window_stays_inside_window() {
        let s = schedule();
        let hours: Vec<u8> = s
            .allocation_of(1, 0)
            .unwrap()
            .iter_window()
            .map(|(h, _)| h.value())
            .collect();
        assert_eq!(hours, vec![1, 2]);
    }

    #[test]
    fn test_json_shape() {
        let v = serde_json::to_value(schedule()).unwrap();
        assert_eq!(v["mode"], "linear");
        assert_eq!(v["status"], "optimal");
        assert_eq!(v["total_cost"], 5.0);
        assert_eq!(v["users"][1]["name"], "B");
        assert_eq!(v["allocations"][0]["ready"], 0);
        assert_eq!(v["allocations"][1]["profile"][1], 1.0);
        assert_eq!(v["hourly_totals"].as_array().unwrap().len(), 24);
        assert!(v.get("cost_surrogates").is_none());
    }
}
