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

use crate::primitives::{HourDelta, HourPoint, LAST_HOUR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourWindowError {
    HourOutOfDay(u8),
    Reversed { ready: u8, deadline: u8 },
}

impl std::fmt::Display for HourWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HourWindowError::HourOutOfDay(h) => {
                write!(f, "hour {} is outside of 0..={}", h, LAST_HOUR)
            }
            HourWindowError::Reversed { ready, deadline } => write!(
                f,
                "ready hour {} lies after deadline hour {}",
                ready, deadline
            ),
        }
    }
}

impl std::error::Error for HourWindowError {}

/// Inclusive range of hours `[ready, deadline]` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourWindow {
    ready: HourPoint,
    deadline: HourPoint,
}

impl HourWindow {
    #[inline]
    pub fn new(ready: u8, deadline: u8) -> Result<Self, HourWindowError> {
        let r = HourPoint::try_of_day(ready).ok_or(HourWindowError::HourOutOfDay(ready))?;
        let d = HourPoint::try_of_day(deadline).ok_or(HourWindowError::HourOutOfDay(deadline))?;
        if r > d {
            return Err(HourWindowError::Reversed { ready, deadline });
        }
        Ok(Self {
            ready: r,
            deadline: d,
        })
    }

    /// The whole day, `[0, 23]`.
    #[inline]
    pub fn full_day() -> Self {
        Self {
            ready: HourPoint::new(0),
            deadline: HourPoint::new(LAST_HOUR),
        }
    }

    #[inline]
    pub fn ready(&self) -> HourPoint {
        self.ready
    }

    #[inline]
    pub fn deadline(&self) -> HourPoint {
        self.deadline
    }

    /// Distance between ready and deadline hour (zero for a single-hour window).
    #[inline]
    pub fn span(&self) -> HourDelta {
        HourDelta::new(self.deadline.value() - self.ready.value())
    }

    /// Number of hour slots covered, `deadline - ready + 1`.
    #[inline]
    pub fn len(&self) -> usize {
        self.span().value() as usize + 1
    }

    #[inline]
    pub fn contains(&self, hour: HourPoint) -> bool {
        self.ready <= hour && hour <= self.deadline
    }

    #[inline]
    pub fn intersects(&self, other: &HourWindow) -> bool {
        self.ready <= other.deadline && other.ready <= self.deadline
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = HourPoint> + ExactSizeIterator + use<> {
        (self.ready.value()..=self.deadline.value()).map(HourPoint::new)
    }
}

impl std::fmt::Display for HourWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.ready.value(), self.deadline.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_single_hour() {
        let w = HourWindow::new(5, 5).unwrap();
        assert_eq!(w.len(), 1);
        assert!(w.contains(HourPoint::new(5)));
        assert!(!w.contains(HourPoint::new(6)));
    }

    #[test]
    fn test_new_rejects_reversed_and_out_of_day() {
        assert_eq!(
            HourWindow::new(7, 3),
            Err(HourWindowError::Reversed {
                ready: 7,
                deadline: 3
            })
        );
        assert_eq!(
            HourWindow::new(20, 24),
            Err(HourWindowError::HourOutOfDay(24))
        );
    }

    #[test]
    fn test_len_and_iter_agree() {
        let w = HourWindow::new(18, 23).unwrap();
        let hours: Vec<u8> = w.iter().map(|h| h.value()).collect();
        assert_eq!(hours, vec![18, 19, 20, 21, 22, 23]);
        assert_eq!(w.len(), hours.len());
        assert_eq!(HourWindow::full_day().len(), 24);
    }

    #[test]
    fn test_intersects_is_inclusive() {
        let a = HourWindow::new(0, 7).unwrap();
        let b = HourWindow::new(7, 12).unwrap();
        let c = HourWindow::new(8, 12).unwrap();
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_display() {
        assert_eq!(HourWindow::new(2, 17).unwrap().to_string(), "[2, 17]");
    }
}
