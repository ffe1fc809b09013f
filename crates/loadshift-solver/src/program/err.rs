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

use loadshift_model::prelude::{ConfigurationError, InfeasibleSpecError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildError {
    Configuration(ConfigurationError),
    Infeasible(InfeasibleSpecError),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Configuration(e) => write!(f, "Configuration error: {}", e),
            BuildError::Infeasible(e) => write!(f, "Infeasible specification: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ConfigurationError> for BuildError {
    fn from(err: ConfigurationError) -> Self {
        BuildError::Configuration(err)
    }
}

impl From<InfeasibleSpecError> for BuildError {
    fn from(err: InfeasibleSpecError) -> Self {
        BuildError::Infeasible(err)
    }
}
