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
    common::{Identifier, IdentifierMarkerName},
    problem::{
        err::{InfeasibleSpecError, InvalidDemandError, InvalidRateError, TaskError},
        user::UserIdentifier,
    },
};
use loadshift_core::prelude::{HourPoint, HourWindow, Tolerance};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskIdentifierMarker;

impl IdentifierMarkerName for TaskIdentifierMarker {
    const NAME: &'static str = "Task";
}

/// Position of a task within its owner's task list.
pub type TaskIdentifier = Identifier<u32, TaskIdentifierMarker>;

/// Globally unique name of a task: owner plus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskKey {
    user: UserIdentifier,
    task: TaskIdentifier,
}

impl TaskKey {
    #[inline]
    pub fn new(user: UserIdentifier, task: TaskIdentifier) -> Self {
        Self { user, task }
    }

    #[inline]
    pub fn user(&self) -> UserIdentifier {
        self.user
    }

    #[inline]
    pub fn task(&self) -> TaskIdentifier {
        self.task
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user, self.task)
    }
}

/// A deferrable energy demand: `total_demand` units must be delivered inside
/// `window`, at most `max_hourly_rate` units per hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    id: TaskIdentifier,
    window: HourWindow,
    max_hourly_rate: f64,
    total_demand: f64,
}

impl Task {
    /// Validates the record itself. Whether the demand fits the window is a
    /// property of the program and is checked by [`Task::check_feasible`].
    #[inline]
    pub fn new(
        id: TaskIdentifier,
        window: HourWindow,
        max_hourly_rate: f64,
        total_demand: f64,
    ) -> Result<Self, TaskError> {
        if !max_hourly_rate.is_finite() || max_hourly_rate <= 0.0 {
            return Err(InvalidRateError::new(max_hourly_rate))?;
        }
        if !total_demand.is_finite() || total_demand < 0.0 {
            return Err(InvalidDemandError::new(total_demand))?;
        }
        Ok(Self {
            id,
            window,
            max_hourly_rate,
            total_demand,
        })
    }

    /// Builds a task from the `(ready, deadline, max_rate, demand)` tuple form.
    #[inline]
    pub fn from_tuple(id: TaskIdentifier, spec: (u8, u8, f64, f64)) -> Result<Self, TaskError> {
        let (ready, deadline, rate, demand) = spec;
        Task::new(id, HourWindow::new(ready, deadline)?, rate, demand)
    }

    #[inline]
    pub fn id(&self) -> TaskIdentifier {
        self.id
    }

    #[inline]
    pub fn window(&self) -> HourWindow {
        self.window
    }

    #[inline]
    pub fn ready_hour(&self) -> HourPoint {
        self.window.ready()
    }

    #[inline]
    pub fn deadline_hour(&self) -> HourPoint {
        self.window.deadline()
    }

    #[inline]
    pub fn max_hourly_rate(&self) -> f64 {
        self.max_hourly_rate
    }

    #[inline]
    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    #[inline]
    pub fn is_active_at(&self, hour: HourPoint) -> bool {
        self.window.contains(hour)
    }

    /// Most energy the window can deliver at full rate.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.max_hourly_rate * self.window.len() as f64
    }

    /// Demand fits the window up to floating point round-off in `rate * len`.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        Tolerance::ROUND_OFF.at_most(self.total_demand, self.capacity())
    }

    #[inline]
    pub fn check_feasible(&self, key: TaskKey) -> Result<(), InfeasibleSpecError> {
        if self.is_feasible() {
            Ok(())
        } else {
            Err(InfeasibleSpecError::new(
                key,
                self.total_demand,
                self.capacity(),
            ))
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: window {}, rate <= {}, demand {}",
            self.id, self.window, self.max_hourly_rate, self.total_demand
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadshift_core::prelude::HourWindowError;

    fn tid(n: u32) -> TaskIdentifier {
        TaskIdentifier::new(n)
    }

    fn uid(n: u32) -> UserIdentifier {
        UserIdentifier::new(n)
    }

    #[test]
    fn test_from_tuple_and_accessors() {
        let t = Task::from_tuple(tid(3), (20, 23, 1.0, 2.0)).unwrap();
        assert_eq!(t.id(), tid(3));
        assert_eq!(t.ready_hour(), HourPoint::new(20));
        assert_eq!(t.deadline_hour(), HourPoint::new(23));
        assert_eq!(t.max_hourly_rate(), 1.0);
        assert_eq!(t.total_demand(), 2.0);
        assert_eq!(t.capacity(), 4.0);
        assert!(t.is_active_at(HourPoint::new(21)));
        assert!(!t.is_active_at(HourPoint::new(19)));
    }

    #[test]
    fn test_rejects_bad_rate_and_demand() {
        let w = HourWindow::new(0, 3).unwrap();
        assert_eq!(
            Task::new(tid(0), w, 0.0, 1.0),
            Err(TaskError::InvalidRate(InvalidRateError::new(0.0)))
        );
        assert!(matches!(
            Task::new(tid(0), w, f64::INFINITY, 1.0),
            Err(TaskError::InvalidRate(_))
        ));
        assert_eq!(
            Task::new(tid(0), w, 1.0, -0.5),
            Err(TaskError::InvalidDemand(InvalidDemandError::new(-0.5)))
        );
    }

    #[test]
    fn test_rejects_bad_window() {
        assert_eq!(
            Task::from_tuple(tid(0), (5, 2, 1.0, 1.0)),
            Err(TaskError::Window(HourWindowError::Reversed {
                ready: 5,
                deadline: 2
            }))
        );
    }

    #[test]
    fn test_exactly_saturated_window_is_feasible() {
        let t = Task::from_tuple(tid(0), (0, 1, 1.0, 2.0)).unwrap();
        assert!(t.is_feasible());
        assert!(t.check_feasible(TaskKey::new(uid(0), tid(0))).is_ok());
    }

    #[test]
    fn test_decimal_window_filled_exactly_is_feasible() {
        let t = Task::from_tuple(tid(0), (0, 2, 0.3, 0.9)).unwrap();
        assert!(t.capacity() < 0.9);
        assert!(t.check_feasible(TaskKey::new(uid(0), tid(0))).is_ok());

        let over = Task::from_tuple(tid(0), (0, 2, 0.3, 0.9001)).unwrap();
        assert!(!over.is_feasible());
    }

    #[test]
    fn test_overfull_window_reports_task_and_capacity() {
        let t = Task::from_tuple(tid(4), (0, 0, 1.0, 2.0)).unwrap();
        let key = TaskKey::new(uid(7), tid(4));
        let err = t.check_feasible(key).unwrap_err();
        assert_eq!(err.task(), key);
        assert_eq!(err.demand(), 2.0);
        assert_eq!(err.capacity(), 1.0);
        assert_eq!(
            err.to_string(),
            "Task User(7)/Task(4) demands 2 but its window can deliver at most 1"
        );
    }

    #[test]
    fn test_zero_demand_is_valid() {
        let t = Task::from_tuple(tid(0), (3, 3, 0.5, 0.0)).unwrap();
        assert!(t.is_feasible());
    }
}
