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
    program::{
        expr::{LinearExpr, QuadraticBound},
        prog::Program,
        var::{VariableId, VariableKind, hour_tag},
    },
};
use loadshift_core::prelude::HourPoint;
use loadshift_model::prelude::{ConfigurationError, PricingMode};

/// Load-dependent price: an hour carrying `load` costs `coefficient * load^2`.
///
/// The square is not handed to the solver directly. Each hour gets a cost
/// surrogate `c[h] >= coefficient * total[h]^2` and the objective is `Σ c[h]`;
/// since lowering `c[h]` always pays off, the bound is tight at the optimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticPricing {
    coefficient: f64,
}

impl Default for QuadraticPricing {
    fn default() -> Self {
        Self {
            coefficient: Self::DEFAULT_COEFFICIENT,
        }
    }
}

impl QuadraticPricing {
    pub const DEFAULT_COEFFICIENT: f64 = 0.5;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_coefficient(coefficient: f64) -> Result<Self, ConfigurationError> {
        if !coefficient.is_finite() || coefficient <= 0.0 {
            return Err(ConfigurationError::InvalidCostCoefficient(coefficient));
        }
        Ok(Self { coefficient })
    }

    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl PricingStrategy for QuadraticPricing {
    fn name(&self) -> &str {
        "Quadratic (load dependent)"
    }

    fn mode(&self) -> PricingMode {
        PricingMode::Quadratic
    }

    fn encode(
        &self,
        hourly_totals: &[VariableId],
        program: &mut Program,
    ) -> Result<LinearExpr, ConfigurationError> {
        let k = self.coefficient;
        let mut surrogates = Vec::with_capacity(hourly_totals.len());
        for (h, &total) in HourPoint::all().zip(hourly_totals.iter()) {
            let upper = program
                .variable(total)
                .map(|v| k * v.upper() * v.upper())
                .unwrap_or(f64::INFINITY);
            let c = program.add_variable(VariableKind::CostSurrogate(h), 0.0, upper);
            program.add_quadratic_bound(QuadraticBound::new(
                format!("surrogate[{}]", hour_tag(h)),
                c,
                total,
                k,
            ));
            surrogates.push(c);
        }
        let objective = LinearExpr::sum(surrogates.iter().copied());
        program.set_cost_surrogates(surrogates);
        Ok(objective)
    }

    #[inline]
    fn hourly_cost(&self, _hour: HourPoint, load: f64) -> f64 {
        self.coefficient * load * load
    }

    #[inline]
    fn marginal_price(&self, _hour: HourPoint, load: f64) -> f64 {
        2.0 * self.coefficient * load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadshift_core::prelude::HOURS_PER_DAY;

    #[test]
    fn test_default_coefficient_is_one_half() {
        let q = QuadraticPricing::default();
        assert_eq!(q.coefficient(), 0.5);
        assert_eq!(q.hourly_cost(HourPoint::new(0), 3.0), 4.5);
        // derivative of 0.5 x^2 is x
        assert_eq!(q.marginal_price(HourPoint::new(0), 3.0), 3.0);
    }

    #[test]
    fn test_rejects_bad_coefficient() {
        assert_eq!(
            QuadraticPricing::with_coefficient(0.0),
            Err(ConfigurationError::InvalidCostCoefficient(0.0))
        );
        assert!(QuadraticPricing::with_coefficient(f64::NAN).is_err());
    }

    #[test]
    fn test_encode_adds_one_surrogate_and_bound_per_hour() {
        let mut program = Program::new(PricingMode::Quadratic);
        let totals: Vec<VariableId> = HourPoint::all()
            .map(|h| program.add_variable(VariableKind::HourlyTotal(h), 0.0, 2.0))
            .collect();
        let obj = QuadraticPricing::new().encode(&totals, &mut program).unwrap();

        assert_eq!(program.cost_surrogates().len(), HOURS_PER_DAY);
        assert_eq!(program.quadratic_bounds().len(), HOURS_PER_DAY);
        assert_eq!(obj.terms().len(), HOURS_PER_DAY);

        let c7 = program.cost_surrogate(HourPoint::new(7)).unwrap();
        let var = program.variable(c7).unwrap();
        assert_eq!(var.kind(), VariableKind::CostSurrogate(HourPoint::new(7)));
        assert_eq!(var.upper(), 2.0);
        let bound = &program.quadratic_bounds()[7];
        assert_eq!(bound.name(), "surrogate[h07]");
        assert_eq!(bound.argument(), totals[7]);
    }
}
