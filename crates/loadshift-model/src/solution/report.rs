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

use crate::{problem::user::UserIdentifier, solution::sol::Schedule};
use loadshift_core::prelude::{HourPoint, HourlySeries};
use serde::Serialize;

/// One line of the hourly usage table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRow {
    pub hour: HourPoint,
    pub total: f64,
    /// Per-user usage, in user order.
    pub per_user: Vec<f64>,
}

/// Fixed-width text rendering of [`UsageRow`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTable {
    headers: Vec<String>,
    rows: Vec<UsageRow>,
}

impl UsageTable {
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[inline]
    pub fn rows(&self) -> &[UsageRow] {
        &self.rows
    }
}

impl std::fmt::Display for UsageTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .headers
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8);

        write!(f, "{:>4} {:>w$}", "Hour", "Total", w = width)?;
        for h in &self.headers {
            write!(f, " {:>w$}", h, w = width)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:>4} {:>w$.3}", row.hour.value(), row.total, w = width)?;
            for v in &row.per_user {
                write!(f, " {:>w$.3}", v, w = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cumulative band of one user in a stacked hourly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    pub user: UserIdentifier,
    pub name: String,
    pub bottom: HourlySeries,
    pub top: HourlySeries,
}

impl Schedule {
    pub fn usage_rows(&self) -> Vec<UsageRow> {
        HourPoint::all()
            .map(|h| UsageRow {
                hour: h,
                total: self.hourly_totals().get(h),
                per_user: self.iter_user_hourly().map(|(_, s)| s.get(h)).collect(),
            })
            .collect()
    }

    pub fn usage_table(&self) -> UsageTable {
        UsageTable {
            headers: self
                .iter_user_hourly()
                .map(|(u, _)| match self.user_name(u) {
                    Some(name) if !name.is_empty() => name.to_owned(),
                    _ => u.to_string(),
                })
                .collect(),
            rows: self.usage_rows(),
        }
    }

    /// Bands stacked in user order; the last band's `top` equals the hourly totals.
    pub fn stacked_series(&self) -> Vec<StackedSeries> {
        let mut bottom = HourlySeries::zeros();
        self.iter_user_hourly()
            .map(|(user, usage)| {
                let top = bottom + *usage;
                let band = StackedSeries {
                    user,
                    name: self.user_name(user).unwrap_or_default().to_owned(),
                    bottom,
                    top,
                };
                bottom = top;
                band
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pricing::PricingMode,
        problem::{
            builder::CatalogBuilder,
            task::{TaskIdentifier, TaskKey},
        },
        solution::{
            sol::{ScheduleBuilder, TaskAllocation},
            status::SolverStatus,
        },
    };
    use loadshift_core::prelude::HourWindow;

    fn schedule() -> Schedule {
        let mut cb = CatalogBuilder::new();
        cb.add_user_tuples("User1", [(0, 1, 1.0, 1.0)]).unwrap();
        cb.add_user_tuples("User2", [(0, 1, 1.0, 2.0)]).unwrap();
        let catalog = cb.build().unwrap();

        let k = |u| TaskKey::new(UserIdentifier::new(u), TaskIdentifier::new(0));
        let w = HourWindow::new(0, 1).unwrap();
        let mut a = TaskAllocation::new(k(0), w);
        a.set(HourPoint::new(0), 1.0);
        let mut b = TaskAllocation::new(k(1), w);
        b.set(HourPoint::new(0), 1.0);
        b.set(HourPoint::new(1), 1.0);

        let mut sb = ScheduleBuilder::new(PricingMode::Linear, SolverStatus::Optimal);
        sb.add_allocation(a).add_allocation(b);
        sb.build(&catalog, |_, l| l, |_, _| 1.0)
    }

    #[test]
    fn test_usage_rows_cover_the_day() {
        let rows = schedule().usage_rows();
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].total, 2.0);
        assert_eq!(rows[0].per_user, vec![1.0, 1.0]);
        assert_eq!(rows[1].per_user, vec![0.0, 1.0]);
        assert_eq!(rows[5].total, 0.0);
    }

    #[test]
    fn test_table_has_header_and_one_line_per_hour() {
        let text = schedule().usage_table().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 25);
        assert!(lines[0].contains("User1") && lines[0].contains("User2"));
        assert!(lines[1].trim_start().starts_with('0'));
        assert!(lines[1].contains("2.000"));
    }

    #[test]
    fn test_stacks_accumulate_to_totals() {
        let s = schedule();
        let bands = s.stacked_series();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].bottom, HourlySeries::zeros());
        assert_eq!(bands[1].bottom, bands[0].top);
        assert_eq!(&bands[1].top, s.hourly_totals());
        assert_eq!(bands[1].name, "User2");
    }
}
