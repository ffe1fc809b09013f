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

use crate::problem::{
    err::{CatalogError, DuplicateUserError, InfeasibleSpecError},
    task::{Task, TaskKey},
    user::{User, UserIdentifier},
};
use loadshift_core::prelude::HourPoint;
use std::collections::BTreeMap;

/// All users and their tasks for one planning day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCatalog {
    users: BTreeMap<UserIdentifier, User>,
}

impl TaskCatalog {
    #[inline]
    pub fn new<I>(users: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = User>,
    {
        let mut map = BTreeMap::new();
        for u in users {
            let id = u.id();
            if map.insert(id, u).is_some() {
                return Err(DuplicateUserError::new(id).into());
            }
        }
        Ok(Self { users: map })
    }

    #[inline]
    pub fn users(&self) -> &BTreeMap<UserIdentifier, User> {
        &self.users
    }

    #[inline]
    pub fn iter_users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    #[inline]
    pub fn user(&self, id: UserIdentifier) -> Option<&User> {
        self.users.get(&id)
    }

    #[inline]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.values().all(|u| u.tasks().is_empty())
    }

    /// Every task with its key, ordered by user and then task position.
    #[inline]
    pub fn iter_tasks(&self) -> impl Iterator<Item = (TaskKey, &Task)> + '_ {
        self.users.values().flat_map(|u| u.iter_keyed())
    }

    #[inline]
    pub fn task(&self, key: TaskKey) -> Option<&Task> {
        self.users.get(&key.user())?.task(key.task())
    }

    #[inline]
    pub fn task_count(&self) -> usize {
        self.users.values().map(|u| u.tasks().len()).sum()
    }

    #[inline]
    pub fn total_demand(&self) -> f64 {
        self.users.values().map(User::total_demand).sum()
    }

    #[inline]
    pub fn tasks_active_at(&self, hour: HourPoint) -> impl Iterator<Item = (TaskKey, &Task)> + '_ {
        self.iter_tasks().filter(move |(_, t)| t.is_active_at(hour))
    }

    /// Number of allocation slots, i.e. the summed window lengths.
    #[inline]
    pub fn window_slot_count(&self) -> usize {
        self.iter_tasks().map(|(_, t)| t.window().len()).sum()
    }

    /// Fails on the first task whose demand exceeds what its window can deliver.
    pub fn check_feasible(&self) -> Result<(), InfeasibleSpecError> {
        for (key, task) in self.iter_tasks() {
            task.check_feasible(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::task::TaskIdentifier;

    fn uid(n: u32) -> UserIdentifier {
        UserIdentifier::new(n)
    }

    fn catalog() -> TaskCatalog {
        TaskCatalog::new([
            User::from_tuples(uid(2), "B", [(0, 3, 1.0, 2.0)]).unwrap(),
            User::from_tuples(uid(1), "A", [(5, 9, 1.0, 1.0), (8, 8, 2.0, 2.0)]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_iteration_is_ordered_by_user_then_task() {
        let keys: Vec<String> = catalog().iter_tasks().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["User(1)/Task(0)", "User(1)/Task(1)", "User(2)/Task(0)"]
        );
    }

    #[test]
    fn test_aggregates() {
        let c = catalog();
        assert_eq!(c.user_count(), 2);
        assert_eq!(c.task_count(), 3);
        assert_eq!(c.total_demand(), 5.0);
        assert_eq!(c.window_slot_count(), 5 + 1 + 4);
        assert_eq!(c.tasks_active_at(HourPoint::new(8)).count(), 2);
        assert!(!c.is_empty());
    }

    #[test]
    fn test_task_lookup() {
        let c = catalog();
        let k = TaskKey::new(uid(1), TaskIdentifier::new(1));
        assert_eq!(c.task(k).map(|t| t.max_hourly_rate()), Some(2.0));
        assert!(c.task(TaskKey::new(uid(9), TaskIdentifier::new(0))).is_none());
    }

    #[test]
    fn test_duplicate_users_are_rejected() {
        let err = TaskCatalog::new([User::new(uid(1), "a"), User::new(uid(1), "b")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateUser(DuplicateUserError::new(uid(1))));
    }

    #[test]
    fn test_check_feasible_names_offending_task() {
        let c = TaskCatalog::new([User::from_tuples(
            uid(3),
            "C",
            [(0, 4, 1.0, 1.0), (0, 0, 1.0, 2.0)],
        )
        .unwrap()])
        .unwrap();
        let err = c.check_feasible().unwrap_err();
        assert_eq!(err.task(), TaskKey::new(uid(3), TaskIdentifier::new(1)));
    }
}
