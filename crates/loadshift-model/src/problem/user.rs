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
        err::TaskError,
        task::{Task, TaskIdentifier, TaskKey},
    },
};
use loadshift_core::prelude::{HourPoint, HourWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserIdentifierMarker;

impl IdentifierMarkerName for UserIdentifierMarker {
    const NAME: &'static str = "User";
}

pub type UserIdentifier = Identifier<u32, UserIdentifierMarker>;

/// A consumer owning an ordered list of tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserIdentifier,
    name: String,
    tasks: Vec<Task>,
}

impl User {
    #[inline]
    pub fn new(id: UserIdentifier, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Creates a user from `(ready, deadline, max_rate, demand)` tuples, numbering
    /// the tasks in the given order.
    pub fn from_tuples<I>(
        id: UserIdentifier,
        name: impl Into<String>,
        specs: I,
    ) -> Result<Self, TaskError>
    where
        I: IntoIterator<Item = (u8, u8, f64, f64)>,
    {
        let mut user = User::new(id, name);
        for spec in specs {
            let tid = user.next_task_id();
            user.tasks.push(Task::from_tuple(tid, spec)?);
        }
        Ok(user)
    }

    #[inline]
    pub fn id(&self) -> UserIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[inline]
    pub fn task(&self, id: TaskIdentifier) -> Option<&Task> {
        self.tasks.get(*id.value() as usize)
    }

    #[inline]
    fn next_task_id(&self) -> TaskIdentifier {
        TaskIdentifier::new(self.tasks.len() as u32)
    }

    /// Appends a task and returns the identifier it was given.
    #[inline]
    pub fn add_task(
        &mut self,
        window: HourWindow,
        max_hourly_rate: f64,
        total_demand: f64,
    ) -> Result<TaskIdentifier, TaskError> {
        let tid = self.next_task_id();
        self.tasks
            .push(Task::new(tid, window, max_hourly_rate, total_demand)?);
        Ok(tid)
    }

    #[inline]
    pub fn key_of(&self, task: &Task) -> TaskKey {
        TaskKey::new(self.id, task.id())
    }

    #[inline]
    pub fn iter_keyed(&self) -> impl Iterator<Item = (TaskKey, &Task)> + '_ {
        self.tasks.iter().map(move |t| (self.key_of(t), t))
    }

    #[inline]
    pub fn tasks_active_at(&self, hour: HourPoint) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| t.is_active_at(hour))
    }

    #[inline]
    pub fn total_demand(&self) -> f64 {
        self.tasks.iter().map(Task::total_demand).sum()
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} \"{}\" with {} task(s)",
            self.id,
            self.name,
            self.tasks.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(n: u32) -> UserIdentifier {
        UserIdentifier::new(n)
    }

    #[test]
    fn test_from_tuples_numbers_tasks_in_order() {
        let u = User::from_tuples(
            uid(1),
            "User1",
            [(20, 23, 1.0, 1.0), (18, 23, 1.0, 2.0), (19, 21, 1.0, 1.0)],
        )
        .unwrap();
        let ids: Vec<u32> = u.tasks().iter().map(|t| t.id().into_inner()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(u.total_demand(), 4.0);
        assert_eq!(u.name(), "User1");
    }

    #[test]
    fn test_add_task_assigns_next_identifier() {
        let mut u = User::new(uid(2), "User2");
        let a = u.add_task(HourWindow::new(0, 4).unwrap(), 1.0, 2.0).unwrap();
        let b = u.add_task(HourWindow::new(5, 9).unwrap(), 1.0, 1.0).unwrap();
        assert_eq!(a, TaskIdentifier::new(0));
        assert_eq!(b, TaskIdentifier::new(1));
        assert_eq!(u.task(b).map(|t| t.total_demand()), Some(1.0));
        assert!(u.task(TaskIdentifier::new(2)).is_none());
    }

    #[test]
    fn test_active_tasks_filter_by_window() {
        let u = User::from_tuples(uid(1), "u", [(0, 5, 1.0, 1.0), (6, 9, 1.0, 1.0)]).unwrap();
        assert_eq!(u.tasks_active_at(HourPoint::new(5)).count(), 1);
        assert_eq!(u.tasks_active_at(HourPoint::new(12)).count(), 0);
    }

    #[test]
    fn test_invalid_tuple_is_reported() {
        let err = User::from_tuples(uid(1), "u", [(0, 5, -1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, TaskError::InvalidRate(_)));
    }
}
