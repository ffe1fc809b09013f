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

use num_traits::{CheckedAdd, CheckedSub, Zero};
use serde::{Serialize, Serializer};
use std::{iter::Sum, marker::PhantomData, ops::Add};

/// Display names of a tagged axis.
pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// A position on the axis `U`. Moving it is always checked, since the
/// underlying integers are small and overflow is a real possibility.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, PhantomData<U>);

/// A number of steps along the axis `U`.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, PhantomData)
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    /// `self + d`, or `None` on overflow.
    #[inline]
    pub fn offset(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    /// `self - d`, or `None` on underflow.
    #[inline]
    pub fn rewind(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }

    /// Steps from `earlier` to `self`; `None` if `earlier` lies after `self`.
    #[inline]
    pub fn since(self, earlier: Self) -> Option<Delta<T, U>>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&earlier.0).map(Delta::new)
    }
}

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, PhantomData)
    }

    #[inline]
    pub const fn value(self) -> T
    where
        T: Copy,
    {
        self.0
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

/// Serialized as the bare value.
impl<T: Serialize, U> Serialize for Point<T, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<T: Add<Output = T>, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0 + rhs.0)
    }
}

impl<T: Zero, U> Sum for Delta<T, U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Delta::default(), |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    struct SlotMarker;

    impl MarkerName for SlotMarker {
        const NAME_POINT: &'static str = "Slot";
        const NAME_DELTA: &'static str = "Slots";
    }

    type Slot = Point<u8, SlotMarker>;
    type Slots = Delta<u8, SlotMarker>;

    #[test]
    fn test_is_as_small_as_the_value() {
        assert_eq!(std::mem::size_of::<Slot>(), 1);
        assert_eq!(std::mem::size_of::<Slots>(), 1);
    }

    #[test]
    fn test_display_uses_marker_names() {
        assert_eq!(Slot::new(9).to_string(), "Slot(9)");
        assert_eq!(Slots::new(3).to_string(), "Slots(3)");
    }

    #[test]
    fn test_offset_rewind_and_since() {
        let p = Slot::new(10).offset(Slots::new(5)).unwrap();
        assert_eq!(p.value(), 15);
        assert_eq!(p.rewind(Slots::new(15)), Some(Slot::new(0)));
        assert_eq!(p.since(Slot::new(10)), Some(Slots::new(5)));
        assert_eq!(p.since(Slot::new(16)), None);
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(Slot::new(u8::MAX).offset(Slots::new(1)), None);
        assert_eq!(Slot::new(0).rewind(Slots::new(1)), None);
    }

    #[test]
    fn test_deltas_sum() {
        let total: Slots = [1, 2, 3].into_iter().map(Slots::new).sum();
        assert_eq!(total.value(), 6);
        assert_eq!(Slots::default().value(), 0);
    }
}
