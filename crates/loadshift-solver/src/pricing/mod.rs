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

pub mod linear;
pub mod quadratic;

pub use linear::LinearPricing;
pub use quadratic::QuadraticPricing;

use crate::program::{expr::LinearExpr, prog::Program, var::VariableId};
use loadshift_core::prelude::HourPoint;
use loadshift_model::prelude::{ConfigurationError, PricingMode};

/// Turns per-hour aggregate load into an objective, and prices a load for reporting.
pub trait PricingStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn mode(&self) -> PricingMode;

    /// Builds the objective over the 24 hourly aggregate variables, adding
    /// whatever auxiliary variables and bounds are needed to keep it linear.
    fn encode(
        &self,
        hourly_totals: &[VariableId],
        program: &mut Program,
    ) -> Result<LinearExpr, ConfigurationError>;

    /// True cost of carrying `load` during `hour`.
    fn hourly_cost(&self, hour: HourPoint, load: f64) -> f64;

    /// Price of one more unit of load during `hour`.
    fn marginal_price(&self, hour: HourPoint, load: f64) -> f64;
}

impl<P: PricingStrategy + ?Sized> PricingStrategy for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mode(&self) -> PricingMode {
        (**self).mode()
    }

    fn encode(
        &self,
        hourly_totals: &[VariableId],
        program: &mut Program,
    ) -> Result<LinearExpr, ConfigurationError> {
        (**self).encode(hourly_totals, program)
    }

    fn hourly_cost(&self, hour: HourPoint, load: f64) -> f64 {
        (**self).hourly_cost(hour, load)
    }

    fn marginal_price(&self, hour: HourPoint, load: f64) -> f64 {
        (**self).marginal_price(hour, load)
    }
}
