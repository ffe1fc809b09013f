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

use crate::{
    problem::{cap::CapPolicy, catalog::TaskCatalog},
    solution::sol::{Schedule, TaskAllocation},
    validation::err::{
        CapExceededError, DemandMismatchError, MissingTaskError, NegativeAllocationError,
        OutsideWindowError, RateExceededError, ScheduleValidationError, UnknownTaskError,
    },
};
use loadshift_core::prelude::{HourPoint, Tolerance};

/// Checks a schedule against the catalog it was planned for.
#[derive(Debug, Clone)]
pub struct ScheduleValidator;

impl ScheduleValidator {
    #[inline]
    pub fn validate_all_tasks_present(
        catalog: &TaskCatalog,
        schedule: &Schedule,
    ) -> Result<(), MissingTaskError> {
        for (key, _) in catalog.iter_tasks() {
            if schedule.allocation(key).is_none() {
                return Err(MissingTaskError::new(key));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn validate_no_unknown_tasks(
        catalog: &TaskCatalog,
        schedule: &Schedule,
    ) -> Result<(), UnknownTaskError> {
        for a in schedule.allocations() {
            if catalog.task(a.key()).is_none() {
                return Err(UnknownTaskError::new(a.key()));
            }
        }
        Ok(())
    }

    /// Every hourly value lies in `[0, max_hourly_rate]` inside the window and
    /// is zero outside of it.
    pub fn validate_allocation_bounds(
        catalog: &TaskCatalog,
        allocation: &TaskAllocation,
        tol: Tolerance<f64>,
    ) -> Result<(), ScheduleValidationError> {
        let key = allocation.key();
        let task = catalog.task(key).ok_or(UnknownTaskError::new(key))?;
        for h in HourPoint::all() {
            let v = allocation.at(h);
            if !task.is_active_at(h) {
                if v.abs() > tol.value() {
                    return Err(OutsideWindowError::new(key, h, v))?;
                }
                continue;
            }
            if v < -tol.value() {
                return Err(NegativeAllocationError::new(key, h, v))?;
            }
            if !tol.at_most(v, task.max_hourly_rate()) {
                return Err(RateExceededError::new(key, h, v, task.max_hourly_rate()))?;
            }
        }
        Ok(())
    }

    pub fn validate_demand_met(
        catalog: &TaskCatalog,
        allocation: &TaskAllocation,
        tol: Tolerance<f64>,
    ) -> Result<(), ScheduleValidationError> {
        let key = allocation.key();
        let task = catalog.task(key).ok_or(UnknownTaskError::new(key))?;
        let delivered: f64 = allocation.iter_window().map(|(_, v)| v).sum();
        if !tol.matches(delivered, task.total_demand()) {
            return Err(DemandMismatchError::new(key, task.total_demand(), delivered))?;
        }
        Ok(())
    }

    pub fn validate_caps(
        caps: &CapPolicy,
        schedule: &Schedule,
        tol: Tolerance<f64>,
    ) -> Result<(), CapExceededError> {
        for (user, usage) in schedule.iter_user_hourly() {
            for h in caps.restricted_hours() {
                let load = usage.get(h);
                if !tol.at_most(load, caps.ceiling()) {
                    return Err(CapExceededError::new(user, h, load, caps.ceiling()));
                }
            }
        }
        Ok(())
    }

    /// Runs every check and reports the first violation found.
    pub fn validate(
        catalog: &TaskCatalog,
        caps: &CapPolicy,
        schedule: &Schedule,
        tol: Tolerance<f64>,
    ) -> Result<(), ScheduleValidationError> {
        Self::validate_no_unknown_tasks(catalog, schedule)?;
        Self::validate_all_tasks_present(catalog, schedule)?;
        for a in schedule.allocations() {
            Self::validate_allocation_bounds(catalog, a, tol)?;
            Self::validate_demand_met(catalog, a, tol)?;
        }
        Self::validate_caps(caps, schedule, tol)?;
        Ok(())
    }
}
