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
    builder::CatalogBuilder,
    catalog::TaskCatalog,
    err::CatalogLoaderError,
    task::{TaskIdentifier, TaskKey},
    user::{User, UserIdentifier},
};
use loadshift_core::prelude::{HourWindow, LAST_HOUR};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Reads task catalogs from a whitespace separated text format:
///
/// ```text
/// <users>
/// <name> <tasks>
/// <ready> <deadline> <max_rate> <demand>   # one line per task
/// ...
/// ```
///
/// `#` starts a comment that runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogLoader {
    reject_infeasible: bool,
}

impl CatalogLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail while loading when a task cannot fit its window, instead of
    /// leaving the check to program construction.
    #[inline]
    pub fn reject_infeasible(mut self, yes: bool) -> Self {
        self.reject_infeasible = yes;
        self
    }

    pub fn from_bufread<R: BufRead>(&self, mut br: R) -> Result<TaskCatalog, CatalogLoaderError> {
        let mut sc = Scanner::new(&mut br);
        let user_count = sc.next_usize()?;

        let mut builder = CatalogBuilder::with_capacity(user_count);
        for u in 0..user_count {
            let uid = UserIdentifier::new(u as u32);
            let name = sc.next_token()?;
            let task_count = sc.next_usize()?;

            let mut user = User::new(uid, name);
            for t in 0..task_count {
                let key = TaskKey::new(uid, TaskIdentifier::new(t as u32));
                let ready = sc.next_hour()?;
                let deadline = sc.next_hour()?;
                let rate = sc.next_f64()?;
                let demand = sc.next_f64()?;

                let window = HourWindow::new(ready, deadline)
                    .map_err(|e| CatalogLoaderError::Task(key, e.into()))?;
                let tid = user
                    .add_task(window, rate, demand)
                    .map_err(|e| CatalogLoaderError::Task(key, e))?;
                if self.reject_infeasible {
                    if let Some(task) = user.task(tid) {
                        task.check_feasible(TaskKey::new(uid, tid))
                            .map_err(CatalogLoaderError::Infeasible)?;
                    }
                }
            }
            builder.add_user(user);
        }

        Ok(builder.build()?)
    }

    #[inline]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<TaskCatalog, CatalogLoaderError> {
        let file = File::open(path).map_err(CatalogLoaderError::Io)?;
        self.from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<TaskCatalog, CatalogLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    #[inline]
    pub fn from_str(&self, s: &str) -> Result<TaskCatalog, CatalogLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

#[derive(Debug)]
struct Scanner<R: BufRead> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    #[inline]
    fn fill_line(&mut self) -> Result<(), CatalogLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self
            .rdr
            .read_line(&mut self.buf)
            .map_err(CatalogLoaderError::Io)?;
        if n == 0 {
            return Err(CatalogLoaderError::UnexpectedEof);
        }
        if let Some(cut) = self.buf.find('#') {
            self.buf.truncate(cut);
        }
        Ok(())
    }

    #[inline]
    fn skip_ws(&mut self) -> Result<(), CatalogLoaderError> {
        loop {
            if self.pos >= self.buf.len() {
                self.fill_line()?;
                continue;
            }
            while self.pos < self.buf.len() && self.buf.as_bytes()[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.buf.len() {
                continue;
            }
            return Ok(());
        }
    }

    #[inline]
    fn next_token(&mut self) -> Result<String, CatalogLoaderError> {
        self.skip_ws()?;
        let start = self.pos;
        while self.pos < self.buf.len() && !self.buf.as_bytes()[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(self.buf[start..self.pos].to_owned())
    }

    #[inline]
    fn next_usize(&mut self) -> Result<usize, CatalogLoaderError> {
        Ok(self.next_token()?.parse::<usize>()?)
    }

    #[inline]
    fn next_hour(&mut self) -> Result<u8, CatalogLoaderError> {
        let h = self.next_token()?.parse::<i64>()?;
        if !(0..=LAST_HOUR as i64).contains(&h) {
            return Err(CatalogLoaderError::HourOutOfRange(h));
        }
        Ok(h as u8)
    }

    #[inline]
    fn next_f64(&mut self) -> Result<f64, CatalogLoaderError> {
        Ok(self.next_token()?.parse::<f64>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::err::TaskError;

    const SMALL_OK: &str = r#"
        # two users
        2
        Alice 2
        20 23 1 1
        18 23 1 2   # evening
        Bob 1
        0 7 1.5 3
    "#;

    #[test]
    fn test_loads_minimal_catalog() {
        let c = CatalogLoader::new().from_str(SMALL_OK).unwrap();
        assert_eq!(c.user_count(), 2);
        assert_eq!(c.task_count(), 3);
        let bob = c.user(UserIdentifier::new(1)).unwrap();
        assert_eq!(bob.name(), "Bob");
        assert_eq!(bob.tasks()[0].max_hourly_rate(), 1.5);
        assert_eq!(c.total_demand(), 6.0);
    }

    #[test]
    fn test_truncated_input_is_eof() {
        let err = CatalogLoader::new().from_str("1\nAlice 2\n0 3 1 1\n").unwrap_err();
        assert!(matches!(err, CatalogLoaderError::UnexpectedEof));
    }

    #[test]
    fn test_hour_outside_day_is_rejected() {
        let err = CatalogLoader::new().from_str("1\nA 1\n0 24 1 1\n").unwrap_err();
        assert!(matches!(err, CatalogLoaderError::HourOutOfRange(24)));
    }

    #[test]
    fn test_invalid_task_names_its_key() {
        let err = CatalogLoader::new().from_str("1\nA 2\n0 3 1 1\n5 2 1 1\n").unwrap_err();
        match err {
            CatalogLoaderError::Task(key, TaskError::Window(_)) => {
                assert_eq!(key.to_string(), "User(0)/Task(1)");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_infeasible_tasks_load_unless_rejected() {
        let text = "1\nA 1\n0 0 1 2\n";
        let c = CatalogLoader::new().from_str(text).unwrap();
        assert!(c.check_feasible().is_err());

        let err = CatalogLoader::new()
            .reject_infeasible(true)
            .from_str(text)
            .unwrap_err();
        assert!(matches!(err, CatalogLoaderError::Infeasible(_)));
    }

    #[test]
    fn test_tasks_keep_their_line_order_and_values() {
        let c = CatalogLoader::new()
            .reject_infeasible(true)
            .from_str("1\nA 2\n0 2 0.3 0.9\n5 6 2 1\n")
            .unwrap();
        let tasks = c.user(UserIdentifier::new(0)).unwrap().tasks();
        assert_eq!(tasks[0].id(), TaskIdentifier::new(0));
        assert_eq!(tasks[0].total_demand(), 0.9);
        assert_eq!(tasks[1].id(), TaskIdentifier::new(1));
        assert_eq!(tasks[1].window(), HourWindow::new(5, 6).unwrap());
        assert_eq!(tasks[1].max_hourly_rate(), 2.0);
    }

    #[test]
    fn test_load_sample_instances_from_workspace() {
        use std::path::{Path, PathBuf};

        fn find_instances_dir() -> Option<PathBuf> {
            let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
            while let Some(p) = cur {
                let cand = p.join("instances");
                if cand.is_dir() {
                    return Some(cand);
                }
                cur = p.parent();
            }
            None
        }

        let dir = find_instances_dir().expect("instances/ directory in an ancestor");
        let catalog = CatalogLoader::new()
            .from_path(dir.join("five_users.txt"))
            .unwrap_or_else(|e| panic!("failed to load five_users.txt: {e}"));
        assert_eq!(catalog.user_count(), 5);
        assert_eq!(catalog.task_count(), 50);
        assert!(catalog.check_feasible().is_ok());
    }
}
