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

use crate::{engine::err::PlannerError, pricing::PricingStrategy};
use loadshift_model::prelude::{CapPolicy, PricingMode, Schedule};

/// One pricing and cap configuration to plan a catalog under.
pub struct Scenario {
    name: String,
    pricing: Box<dyn PricingStrategy>,
    caps: CapPolicy,
}

impl Scenario {
    #[inline]
    pub fn new<P>(name: impl Into<String>, pricing: P, caps: CapPolicy) -> Self
    where
        P: PricingStrategy + 'static,
    {
        Self {
            name: name.into(),
            pricing: Box::new(pricing),
            caps,
        }
    }

    #[inline]
    pub fn from_boxed(
        name: impl Into<String>,
        pricing: Box<dyn PricingStrategy>,
        caps: CapPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            pricing,
            caps,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn pricing(&self) -> &dyn PricingStrategy {
        self.pricing.as_ref()
    }

    #[inline]
    pub fn mode(&self) -> PricingMode {
        self.pricing.mode()
    }

    #[inline]
    pub fn caps(&self) -> &CapPolicy {
        &self.caps
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("pricing", &self.pricing.name())
            .field("caps", &self.caps)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    name: String,
    result: Result<Schedule, PlannerError>,
}

impl ScenarioResult {
    #[inline]
    pub fn new(name: impl Into<String>, result: Result<Schedule, PlannerError>) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn result(&self) -> Result<&Schedule, &PlannerError> {
        self.result.as_ref()
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    #[inline]
    pub fn into_result(self) -> Result<Schedule, PlannerError> {
        self.result
    }
}
