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

use crate::primitives::{HOURS_PER_DAY, HourPoint};
use serde::Serialize;
use std::ops::{Add, AddAssign, Index, IndexMut};

/// One real value per hour of the day.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HourlySeries([f64; HOURS_PER_DAY]);

impl Default for HourlySeries {
    fn default() -> Self {
        Self::zeros()
    }
}

impl HourlySeries {
    #[inline]
    pub const fn zeros() -> Self {
        Self([0.0; HOURS_PER_DAY])
    }

    #[inline]
    pub const fn from_array(values: [f64; HOURS_PER_DAY]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn from_fn(mut f: impl FnMut(HourPoint) -> f64) -> Self {
        let mut out = Self::zeros();
        for h in HourPoint::all() {
            out.0[h.index()] = f(h);
        }
        out
    }

    #[inline]
    pub fn get(&self, hour: HourPoint) -> f64 {
        self.0[hour.index()]
    }

    #[inline]
    pub fn add_at(&mut self, hour: HourPoint, value: f64) {
        self.0[hour.index()] += value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (HourPoint, f64)> + '_ {
        HourPoint::all().map(move |h| (h, self.0[h.index()]))
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Hour with the largest value; the earliest hour wins ties.
    pub fn peak(&self) -> (HourPoint, f64) {
        self.iter()
            .fold((HourPoint::new(0), f64::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 { cur } else { best }
            })
    }

    #[inline]
    pub fn map(&self, mut f: impl FnMut(HourPoint, f64) -> f64) -> Self {
        Self::from_fn(|h| f(h, self.0[h.index()]))
    }
}

/// # Panics
///
/// Panics if `hour` lies past [`LAST_HOUR`](crate::prelude::LAST_HOUR).
impl Index<HourPoint> for HourlySeries {
    type Output = f64;

    #[inline]
    fn index(&self, hour: HourPoint) -> &f64 {
        &self.0[hour.index()]
    }
}

impl IndexMut<HourPoint> for HourlySeries {
    #[inline]
    fn index_mut(&mut self, hour: HourPoint) -> &mut f64 {
        &mut self.0[hour.index()]
    }
}

impl Add for HourlySeries {
    type Output = HourlySeries;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for HourlySeries {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(v: u8) -> HourPoint {
        HourPoint::new(v)
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_hour_past_the_day_is_not_an_index() {
        let s = HourlySeries::default();
        let v: f64 = s[HourPoint::new(24)];
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_add_at_and_total() {
        let mut s = HourlySeries::zeros();
        s.add_at(h(3), 1.5);
        s.add_at(h(3), 0.5);
        s[h(7)] = 4.0;
        assert_eq!(s.get(h(3)), 2.0);
        assert_eq!(s.total(), 6.0);
    }

    #[test]
    fn test_peak_prefers_earliest_on_tie() {
        let mut s = HourlySeries::zeros();
        s[h(5)] = 3.0;
        s[h(9)] = 3.0;
        assert_eq!(s.peak(), (h(5), 3.0));
    }

    #[test]
    fn test_sum_of_series() {
        let a = HourlySeries::from_fn(|hr| hr.index() as f64);
        let b = HourlySeries::from_fn(|_| 1.0);
        let c = a + b;
        assert_eq!(c.get(h(0)), 1.0);
        assert_eq!(c.get(h(23)), 24.0);
    }
}
