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

use crate::pricing::ConfigurationError;
use loadshift_core::prelude::{HourPoint, LAST_HOUR};
use std::collections::BTreeSet;

/// Per-user ceiling on the energy drawn across all of a user's tasks during
/// selected hours, on top of each task's own rate limit.
#[derive(Debug, Clone, PartialEq)]
pub struct CapPolicy {
    restricted_hours: BTreeSet<HourPoint>,
    ceiling: f64,
}

impl CapPolicy {
    pub const DEFAULT_RESTRICTED_HOURS: [u32; 3] = [11, 13, 21];
    pub const DEFAULT_CEILING: f64 = 2.0;

    pub fn new<I>(restricted_hours: I, ceiling: f64) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = u32>,
    {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(ConfigurationError::InvalidCeiling(ceiling));
        }
        let mut hours = BTreeSet::new();
        for h in restricted_hours {
            if h > LAST_HOUR as u32 {
                return Err(ConfigurationError::RestrictedHourOutOfDay(h));
            }
            hours.insert(HourPoint::new(h as u8));
        }
        Ok(Self {
            restricted_hours: hours,
            ceiling,
        })
    }

    /// A policy that restricts nothing.
    #[inline]
    pub fn none() -> Self {
        Self {
            restricted_hours: BTreeSet::new(),
            ceiling: f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.restricted_hours.is_empty()
    }

    #[inline]
    pub fn is_restricted(&self, hour: HourPoint) -> bool {
        self.restricted_hours.contains(&hour)
    }

    #[inline]
    pub fn restricted_hours(&self) -> impl Iterator<Item = HourPoint> + '_ {
        self.restricted_hours.iter().copied()
    }

    #[inline]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl Default for CapPolicy {
    fn default() -> Self {
        Self {
            restricted_hours: Self::DEFAULT_RESTRICTED_HOURS
                .iter()
                .map(|&h| HourPoint::new(h as u8))
                .collect(),
            ceiling: Self::DEFAULT_CEILING,
        }
    }
}

impl std::fmt::Display for CapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_enabled() {
            return write!(f, "no hourly caps");
        }
        let hours: Vec<String> = self
            .restricted_hours
            .iter()
            .map(|h| h.value().to_string())
            .collect();
        write!(f, "<= {} per user at hours {{{}}}", self.ceiling, hours.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_observed_policy() {
        let p = CapPolicy::default();
        let hours: Vec<u8> = p.restricted_hours().map(|h| h.value()).collect();
        assert_eq!(hours, vec![11, 13, 21]);
        assert_eq!(p.ceiling(), 2.0);
        assert!(p.is_restricted(HourPoint::new(13)));
        assert!(!p.is_restricted(HourPoint::new(12)));
        assert_eq!(p.to_string(), "<= 2 per user at hours {11, 13, 21}");
    }

    #[test]
    fn test_none_is_disabled() {
        let p = CapPolicy::none();
        assert!(!p.is_enabled());
        assert_eq!(p.restricted_hours().count(), 0);
    }

    #[test]
    fn test_rejects_out_of_day_hour_and_bad_ceiling() {
        assert_eq!(
            CapPolicy::new([3, 24], 1.0),
            Err(ConfigurationError::RestrictedHourOutOfDay(24))
        );
        assert_eq!(
            CapPolicy::new([3], 0.0),
            Err(ConfigurationError::InvalidCeiling(0.0))
        );
        assert!(CapPolicy::new([3], f64::NAN).is_err());
    }

    #[test]
    fn test_duplicate_hours_collapse() {
        let p = CapPolicy::new([5, 5, 6], 1.5).unwrap();
        assert_eq!(p.restricted_hours().count(), 2);
    }
}
