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

use crate::pricing::err::{
    ConfigurationError, InvalidPriceError, PriceTableLengthError, PriceTableLoaderError,
};
use loadshift_core::prelude::{HOURS_PER_DAY, HourPoint, HourlySeries};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Fixed unit price per hour of day for the linear pricing regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HourlyPriceTable(HourlySeries);

impl HourlyPriceTable {
    /// Accepts exactly 24 finite, positive prices.
    pub fn from_slice(prices: &[f64]) -> Result<Self, ConfigurationError> {
        if prices.len() != HOURS_PER_DAY {
            return Err(PriceTableLengthError::new(prices.len()))?;
        }
        if let Some((hour, &p)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p <= 0.0)
        {
            return Err(InvalidPriceError::new(hour, p))?;
        }
        Ok(Self(HourlySeries::from_fn(|h| prices[h.index()])))
    }

    #[inline]
    pub fn uniform(price: f64) -> Result<Self, ConfigurationError> {
        Self::from_slice(&[price; HOURS_PER_DAY])
    }

    #[inline]
    pub fn price(&self, hour: HourPoint) -> f64 {
        self.0.get(hour)
    }

    #[inline]
    pub fn as_series(&self) -> &HourlySeries {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (HourPoint, f64)> + '_ {
        self.0.iter()
    }

    /// Reads whitespace separated prices; `#` starts a comment that runs to the end of the line.
    pub fn from_bufread<R: BufRead>(br: R) -> Result<Self, PriceTableLoaderError> {
        let mut prices = Vec::with_capacity(HOURS_PER_DAY);
        for line in br.lines() {
            let line = line?;
            let content = line.split('#').next().unwrap_or_default();
            for tok in content.split_whitespace() {
                prices.push(tok.parse::<f64>()?);
            }
        }
        Ok(Self::from_slice(&prices)?)
    }

    #[inline]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PriceTableLoaderError> {
        let file = File::open(path).map_err(PriceTableLoaderError::Io)?;
        Self::from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn from_reader<R: Read>(r: R) -> Result<Self, PriceTableLoaderError> {
        Self::from_bufread(BufReader::new(r))
    }

    #[inline]
    pub fn parse(s: &str) -> Result<Self, PriceTableLoaderError> {
        Self::from_reader(s.as_bytes())
    }
}

impl std::str::FromStr for HourlyPriceTable {
    type Err = PriceTableLoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        let err = HourlyPriceTable::from_slice(&[1.0; 23]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PriceTableLength(PriceTableLengthError::new(23))
        );
        assert!(HourlyPriceTable::from_slice(&[1.0; 25]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut prices = [2.0; HOURS_PER_DAY];
        prices[13] = 0.0;
        let err = HourlyPriceTable::from_slice(&prices).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidPrice(InvalidPriceError::new(13, 0.0))
        );
    }

    #[test]
    fn test_lookup_by_hour() {
        let prices: Vec<f64> = (1..=24).map(f64::from).collect();
        let t = HourlyPriceTable::from_slice(&prices).unwrap();
        assert_eq!(t.price(HourPoint::new(0)), 1.0);
        assert_eq!(t.price(HourPoint::new(23)), 24.0);
    }

    #[test]
    fn test_parse_with_comments_and_lines() {
        let text = "# unit costs\n1 2 3 4 5 6\n7 8 9 10 11 12 # midday\n13 14 15 16 17 18 19 20 21 22 23 24\n";
        let t = HourlyPriceTable::parse(text).unwrap();
        assert_eq!(t.price(HourPoint::new(11)), 12.0);
    }

    #[test]
    fn test_parse_reports_short_table_as_configuration_error() {
        let err = HourlyPriceTable::parse("1 2 3").unwrap_err();
        assert!(matches!(
            err,
            PriceTableLoaderError::Configuration(ConfigurationError::PriceTableLength(_))
        ));
    }

    #[test]
    fn test_parse_reports_garbage() {
        let err = HourlyPriceTable::parse("1 two 3").unwrap_err();
        assert!(matches!(err, PriceTableLoaderError::ParseFloat(_)));
    }

    #[test]
    fn test_from_str_matches_parse() {
        let text = "5 ".repeat(HOURS_PER_DAY);
        let t: HourlyPriceTable = text.parse().unwrap();
        assert_eq!(t, HourlyPriceTable::parse(&text).unwrap());
    }
}
