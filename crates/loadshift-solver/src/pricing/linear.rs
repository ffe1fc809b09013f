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

use crate::{
    pricing::PricingStrategy,
    program::{expr::LinearExpr, prog::Program, var::VariableId},
};
use loadshift_core::prelude::HourPoint;
use loadshift_model::prelude::{ConfigurationError, HourlyPriceTable, PricingMode};

/// Published per-hour unit prices: `Σ price[h] * total[h]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPricing {
    prices: HourlyPriceTable,
}

impl LinearPricing {
    #[inline]
    pub fn new(prices: HourlyPriceTable) -> Self {
        Self { prices }
    }

    #[inline]
    pub fn from_slice(prices: &[f64]) -> Result<Self, ConfigurationError> {
        Ok(Self::new(HourlyPriceTable::from_slice(prices)?))
    }

    #[inline]
    pub fn prices(&self) -> &HourlyPriceTable {
        &self.prices
    }
}

impl PricingStrategy for LinearPricing {
    fn name(&self) -> &str {
        "Linear (published unit prices)"
    }

    fn mode(&self) -> PricingMode {
        PricingMode::Linear
    }

    fn encode(
        &self,
        hourly_totals: &[VariableId],
        _program: &mut Program,
    ) -> Result<LinearExpr, ConfigurationError> {
        Ok(HourPoint::all()
            .zip(hourly_totals.iter())
            .fold(LinearExpr::new(), |acc, (h, &total)| {
                acc.with_term(total, self.prices.price(h))
            }))
    }

    #[inline]
    fn hourly_cost(&self, hour: HourPoint, load: f64) -> f64 {
        self.prices.price(hour) * load
    }

    #[inline]
    fn marginal_price(&self, hour: HourPoint, _load: f64) -> f64 {
        self.prices.price(hour)
    }
}
