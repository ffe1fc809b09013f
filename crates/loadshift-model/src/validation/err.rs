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

use crate::problem::{task::TaskKey, user::UserIdentifier};
use loadshift_core::prelude::HourPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingTaskError {
    task: TaskKey,
}

impl MissingTaskError {
    #[inline]
    pub fn new(task: TaskKey) -> Self {
        Self { task }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
}

impl std::fmt::Display for MissingTaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing allocation for task {}", self.task)
    }
}

impl std::error::Error for MissingTaskError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownTaskError {
    task: TaskKey,
}

impl UnknownTaskError {
    #[inline]
    pub fn new(task: TaskKey) -> Self {
        Self { task }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
}

impl std::fmt::Display for UnknownTaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Allocation for task {} which is not in the catalog", self.task)
    }
}

impl std::error::Error for UnknownTaskError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandMismatchError {
    task: TaskKey,
    expected: f64,
    delivered: f64,
}

impl DemandMismatchError {
    #[inline]
    pub fn new(task: TaskKey, expected: f64, delivered: f64) -> Self {
        Self {
            task,
            expected,
            delivered,
        }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
    #[inline]
    pub fn expected(&self) -> f64 {
        self.expected
    }
    #[inline]
    pub fn delivered(&self) -> f64 {
        self.delivered
    }
}

impl std::fmt::Display for DemandMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} demands {} but received {}",
            self.task, self.expected, self.delivered
        )
    }
}

impl std::error::Error for DemandMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateExceededError {
    task: TaskKey,
    hour: HourPoint,
    value: f64,
    limit: f64,
}

impl RateExceededError {
    #[inline]
    pub fn new(task: TaskKey, hour: HourPoint, value: f64, limit: f64) -> Self {
        Self {
            task,
            hour,
            value,
            limit,
        }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
    #[inline]
    pub fn hour(&self) -> HourPoint {
        self.hour
    }
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
    #[inline]
    pub fn limit(&self) -> f64 {
        self.limit
    }
}

impl std::fmt::Display for RateExceededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} draws {} at {}, above its rate limit {}",
            self.task, self.value, self.hour, self.limit
        )
    }
}

impl std::error::Error for RateExceededError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeAllocationError {
    task: TaskKey,
    hour: HourPoint,
    value: f64,
}

impl NegativeAllocationError {
    #[inline]
    pub fn new(task: TaskKey, hour: HourPoint, value: f64) -> Self {
        Self { task, hour, value }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
    #[inline]
    pub fn hour(&self) -> HourPoint {
        self.hour
    }
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for NegativeAllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} has negative allocation {} at {}",
            self.task, self.value, self.hour
        )
    }
}

impl std::error::Error for NegativeAllocationError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutsideWindowError {
    task: TaskKey,
    hour: HourPoint,
    value: f64,
}

impl OutsideWindowError {
    #[inline]
    pub fn new(task: TaskKey, hour: HourPoint, value: f64) -> Self {
        Self { task, hour, value }
    }
    #[inline]
    pub fn task(&self) -> TaskKey {
        self.task
    }
    #[inline]
    pub fn hour(&self) -> HourPoint {
        self.hour
    }
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for OutsideWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} receives {} at {}, outside of its window",
            self.task, self.value, self.hour
        )
    }
}

impl std::error::Error for OutsideWindowError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapExceededError {
    user: UserIdentifier,
    hour: HourPoint,
    load: f64,
    ceiling: f64,
}

impl CapExceededError {
    #[inline]
    pub fn new(user: UserIdentifier, hour: HourPoint, load: f64, ceiling: f64) -> Self {
        Self {
            user,
            hour,
            load,
            ceiling,
        }
    }
    #[inline]
    pub fn user(&self) -> UserIdentifier {
        self.user
    }
    #[inline]
    pub fn hour(&self) -> HourPoint {
        self.hour
    }
    #[inline]
    pub fn load(&self) -> f64 {
        self.load
    }
    #[inline]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl std::fmt::Display for CapExceededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} draws {} at {}, above the hourly ceiling {}",
            self.user, self.load, self.hour, self.ceiling
        )
    }
}

impl std::error::Error for CapExceededError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleValidationError {
    MissingTask(MissingTaskError),
    UnknownTask(UnknownTaskError),
    DemandMismatch(DemandMismatchError),
    RateExceeded(RateExceededError),
    NegativeAllocation(NegativeAllocationError),
    OutsideWindow(OutsideWindowError),
    CapExceeded(CapExceededError),
}

impl std::fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleValidationError::MissingTask(e) => write!(f, "{}", e),
            ScheduleValidationError::UnknownTask(e) => write!(f, "{}", e),
            ScheduleValidationError::DemandMismatch(e) => write!(f, "{}", e),
            ScheduleValidationError::RateExceeded(e) => write!(f, "{}", e),
            ScheduleValidationError::NegativeAllocation(e) => write!(f, "{}", e),
            ScheduleValidationError::OutsideWindow(e) => write!(f, "{}", e),
            ScheduleValidationError::CapExceeded(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ScheduleValidationError {}

impl From<MissingTaskError> for ScheduleValidationError {
    fn from(err: MissingTaskError) -> Self {
        ScheduleValidationError::MissingTask(err)
    }
}

impl From<UnknownTaskError> for ScheduleValidationError {
    fn from(err: UnknownTaskError) -> Self {
        ScheduleValidationError::UnknownTask(err)
    }
}

impl From<DemandMismatchError> for ScheduleValidationError {
    fn from(err: DemandMismatchError) -> Self {
        ScheduleValidationError::DemandMismatch(err)
    }
}

impl From<RateExceededError> for ScheduleValidationError {
    fn from(err: RateExceededError) -> Self {
        ScheduleValidationError::RateExceeded(err)
    }
}

impl From<NegativeAllocationError> for ScheduleValidationError {
    fn from(err: NegativeAllocationError) -> Self {
        ScheduleValidationError::NegativeAllocation(err)
    }
}

impl From<OutsideWindowError> for ScheduleValidationError {
    fn from(err: OutsideWindowError) -> Self {
        ScheduleValidationError::OutsideWindow(err)
    }
}

impl From<CapExceededError> for ScheduleValidationError {
    fn from(err: CapExceededError) -> Self {
        ScheduleValidationError::CapExceeded(err)
    }
}
