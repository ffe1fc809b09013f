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
    catalog::TaskCatalog,
    err::{CatalogError, TaskError},
    user::{User, UserIdentifier},
};

#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    users: Vec<User>,
}

impl CatalogBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(users: usize) -> Self {
        Self {
            users: Vec::with_capacity(users),
        }
    }

    #[inline]
    pub fn with_users<I>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = User>,
    {
        self.users.clear();
        self.users.extend(users);
        self
    }

    #[inline]
    pub fn add_user(&mut self, user: User) -> &mut Self {
        self.users.push(user);
        self
    }

    #[inline]
    pub fn extend_users<I>(&mut self, users: I) -> &mut Self
    where
        I: IntoIterator<Item = User>,
    {
        self.users.extend(users);
        self
    }

    /// Adds a user numbered after the users already present.
    pub fn add_user_tuples<I>(&mut self, name: &str, specs: I) -> Result<&mut Self, TaskError>
    where
        I: IntoIterator<Item = (u8, u8, f64, f64)>,
    {
        let id = UserIdentifier::new(self.users.len() as u32);
        self.users.push(User::from_tuples(id, name, specs)?);
        Ok(self)
    }

    #[inline]
    pub fn build(self) -> Result<TaskCatalog, CatalogError> {
        TaskCatalog::new(self.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::err::DuplicateUserError;

    fn uid(n: u32) -> UserIdentifier {
        UserIdentifier::new(n)
    }

    #[test]
    fn test_build_empty() {
        let c = CatalogBuilder::new().build().unwrap();
        assert_eq!(c.user_count(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_add_user_tuples_numbers_users() {
        let mut b = CatalogBuilder::with_capacity(2);
        b.add_user_tuples("User1", [(0, 3, 1.0, 1.0)])
            .unwrap()
            .add_user_tuples("User2", [(4, 7, 1.0, 2.0), (8, 9, 1.0, 1.0)])
            .unwrap();
        let c = b.build().unwrap();
        assert_eq!(c.user(uid(0)).map(|u| u.name()), Some("User1"));
        assert_eq!(c.user(uid(1)).map(|u| u.tasks().len()), Some(2));
    }

    #[test]
    fn test_with_users_replaces() {
        let mut b = CatalogBuilder::new();
        b.add_user(User::new(uid(5), "old"));
        let c = b
            .with_users([User::new(uid(1), "a"), User::new(uid(2), "b")])
            .build()
            .unwrap();
        assert_eq!(c.user_count(), 2);
        assert!(c.user(uid(5)).is_none());
    }

    #[test]
    fn test_duplicate_ids_fail_on_build() {
        let mut b = CatalogBuilder::new();
        b.extend_users([User::new(uid(1), "a"), User::new(uid(1), "b")]);
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::DuplicateUser(DuplicateUserError::new(uid(1)))
        );
    }
}
