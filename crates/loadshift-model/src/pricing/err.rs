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

use std::num::ParseFloatError;

use loadshift_core::prelude::HOURS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceTableLengthError {
    len: usize,
}

impl PriceTableLengthError {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn found(&self) -> usize {
        self.len
    }
}

impl std::fmt::Display for PriceTableLengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Price table must have exactly {} entries, got {}",
            HOURS_PER_DAY, self.len
        )
    }
}

impl std::error::Error for PriceTableLengthError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidPriceError {
    hour: usize,
    price: f64,
}

impl InvalidPriceError {
    pub fn new(hour: usize, price: f64) -> Self {
        Self { hour, price }
    }

    pub fn hour(&self) -> usize {
        self.hour
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl std::fmt::Display for InvalidPriceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Price for hour {} must be finite and positive, got {}",
            self.hour, self.price
        )
    }
}

impl std::error::Error for InvalidPriceError {}

/// Invalid pricing or policy configuration, detected before a program is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    PriceTableLength(PriceTableLengthError),
    InvalidPrice(InvalidPriceError),
    RestrictedHourOutOfDay(u32),
    InvalidCeiling(f64),
    InvalidCostCoefficient(f64),
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::PriceTableLength(e) => write!(f, "{}", e),
            ConfigurationError::InvalidPrice(e) => write!(f, "{}", e),
            ConfigurationError::RestrictedHourOutOfDay(h) => write!(
                f,
                "Restricted hour {} is outside of 0..{}",
                h, HOURS_PER_DAY
            ),
            ConfigurationError::InvalidCeiling(c) => write!(
                f,
                "Per-user hourly ceiling must be finite and positive, got {}",
                c
            ),
            ConfigurationError::InvalidCostCoefficient(k) => write!(
                f,
                "Quadratic cost coefficient must be finite and positive, got {}",
                k
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<PriceTableLengthError> for ConfigurationError {
    fn from(err: PriceTableLengthError) -> Self {
        ConfigurationError::PriceTableLength(err)
    }
}

impl From<InvalidPriceError> for ConfigurationError {
    fn from(err: InvalidPriceError) -> Self {
        ConfigurationError::InvalidPrice(err)
    }
}

#[derive(Debug)]
pub enum PriceTableLoaderError {
    Io(std::io::Error),
    ParseFloat(ParseFloatError),
    Configuration(ConfigurationError),
}

impl From<std::io::Error> for PriceTableLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseFloatError> for PriceTableLoaderError {
    fn from(e: ParseFloatError) -> Self {
        Self::ParseFloat(e)
    }
}

impl From<ConfigurationError> for PriceTableLoaderError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl std::fmt::Display for PriceTableLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PriceTableLoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            ParseFloat(e) => write!(f, "parse-float error: {e}"),
            Configuration(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for PriceTableLoaderError {}
