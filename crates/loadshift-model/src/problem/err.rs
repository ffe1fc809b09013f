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
use loadshift_core::prelude::HourWindowError;
use std::num::{ParseFloatError, ParseIntError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidRateError {
    rate: f64,
}

impl InvalidRateError {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl std::fmt::Display for InvalidRateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Maximum hourly rate must be finite and positive, got {}",
            self.rate
        )
    }
}

impl std::error::Error for InvalidRateError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidDemandError {
    demand: f64,
}

impl InvalidDemandError {
    pub fn new(demand: f64) -> Self {
        Self { demand }
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }
}

impl std::fmt::Display for InvalidDemandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total demand must be finite and non-negative, got {}",
            self.demand
        )
    }
}

impl std::error::Error for InvalidDemandError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    Window(HourWindowError),
    InvalidRate(InvalidRateError),
    InvalidDemand(InvalidDemandError),
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Window(e) => write!(f, "{}", e),
            TaskError::InvalidRate(e) => write!(f, "{}", e),
            TaskError::InvalidDemand(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TaskError {}

impl From<HourWindowError> for TaskError {
    fn from(err: HourWindowError) -> Self {
        TaskError::Window(err)
    }
}

impl From<InvalidRateError> for TaskError {
    fn from(err: InvalidRateError) -> Self {
        TaskError::InvalidRate(err)
    }
}

impl From<InvalidDemandError> for TaskError {
    fn from(err: InvalidDemandError) -> Self {
        TaskError::InvalidDemand(err)
    }
}

/// A task whose demand cannot be delivered inside its window even at full rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfeasibleSpecError {
    task: TaskKey,
    demand: f64,
    capacity: f64,
}

impl InfeasibleSpecError {
    pub fn new(task: TaskKey, demand: f64, capacity: f64) -> Self {
        Self {
            task,
            demand,
            capacity,
        }
    }

    pub fn task(&self) -> TaskKey {
        self.task
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

impl std::fmt::Display for InfeasibleSpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} demands {} but its window can deliver at most {}",
            self.task, self.demand, self.capacity
        )
    }
}

impl std::error::Error for InfeasibleSpecError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateUserError {
    id: UserIdentifier,
}

impl DuplicateUserError {
    pub fn new(id: UserIdentifier) -> Self {
        Self { id }
    }

    pub fn id(&self) -> UserIdentifier {
        self.id
    }
}

impl std::fmt::Display for DuplicateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User {} was added more than once", self.id)
    }
}

impl std::error::Error for DuplicateUserError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogError {
    DuplicateUser(DuplicateUserError),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateUser(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<DuplicateUserError> for CatalogError {
    fn from(err: DuplicateUserError) -> Self {
        CatalogError::DuplicateUser(err)
    }
}

#[derive(Debug)]
pub enum CatalogLoaderError {
    Io(std::io::Error),
    ParseInt(ParseIntError),
    ParseFloat(ParseFloatError),
    UnexpectedEof,
    HourOutOfRange(i64),
    Task(TaskKey, TaskError),
    Infeasible(InfeasibleSpecError),
    Catalog(CatalogError),
}

impl From<std::io::Error> for CatalogLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseIntError> for CatalogLoaderError {
    fn from(e: ParseIntError) -> Self {
        Self::ParseInt(e)
    }
}

impl From<ParseFloatError> for CatalogLoaderError {
    fn from(e: ParseFloatError) -> Self {
        Self::ParseFloat(e)
    }
}

impl From<InfeasibleSpecError> for CatalogLoaderError {
    fn from(e: InfeasibleSpecError) -> Self {
        Self::Infeasible(e)
    }
}

impl From<CatalogError> for CatalogLoaderError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl std::fmt::Display for CatalogLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CatalogLoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            ParseInt(e) => write!(f, "parse-int error: {e}"),
            ParseFloat(e) => write!(f, "parse-float error: {e}"),
            UnexpectedEof => write!(f, "unexpected end of file while parsing catalog"),
            HourOutOfRange(h) => write!(f, "hour {h} does not fit into a day"),
            Task(key, e) => write!(f, "task {key}: {e}"),
            Infeasible(e) => write!(f, "infeasible task: {e}"),
            Catalog(e) => write!(f, "catalog error: {e}"),
        }
    }
}

impl std::error::Error for CatalogLoaderError {}
