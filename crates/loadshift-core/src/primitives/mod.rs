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

pub mod affine;
pub mod series;
pub mod window;

pub use affine::*;
pub use series::HourlySeries;
pub use window::{HourWindow, HourWindowError};

/// Number of hour slots in a planning day.
pub const HOURS_PER_DAY: usize = 24;

/// Latest valid hour of day.
pub const LAST_HOUR: u8 = (HOURS_PER_DAY - 1) as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourMarker;

impl MarkerName for HourMarker {
    const NAME_POINT: &'static str = "Hour";
    const NAME_DELTA: &'static str = "Hours";
}

/// An hour of the day.
///
/// `HourPoint::new` does not check its argument; only values up to
/// [`LAST_HOUR`] are valid hours. Hours read from outside input go through
/// [`HourPoint::try_of_day`] (or [`HourWindow::new`]).
pub type HourPoint = Point<u8, HourMarker>;
pub type HourDelta = Delta<u8, HourMarker>;

impl HourPoint {
    /// Returns the hour if it lies within a single day.
    #[inline]
    pub fn try_of_day(hour: u8) -> Option<Self> {
        (hour <= LAST_HOUR).then(|| HourPoint::new(hour))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.value() as usize
    }

    /// All hours of the day in ascending order.
    #[inline]
    pub fn all() -> impl DoubleEndedIterator<Item = HourPoint> + ExactSizeIterator {
        (0..=LAST_HOUR).map(HourPoint::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_of_day_rejects_hour_24() {
        assert_eq!(HourPoint::try_of_day(23), Some(HourPoint::new(23)));
        assert_eq!(HourPoint::try_of_day(24), None);
    }

    #[test]
    fn test_all_covers_the_day() {
        let hours: Vec<usize> = HourPoint::all().map(HourPoint::index).collect();
        assert_eq!(hours.len(), HOURS_PER_DAY);
        assert_eq!(hours.first(), Some(&0));
        assert_eq!(hours.last(), Some(&23));
    }
}
