//! Fluent builder for estimation requests.

use crate::error::ValidationError;
use crate::estimate::request::{ContextFactor, EstimationRequest};

/// Builder for [`EstimationRequest`].
#[derive(Debug, Clone, Default)]
pub struct EstimateBuilder {
    base_value: Option<f64>,
    growth_rate_percent: Option<f64>,
    horizon_years: Option<u32>,
    context_factors: Vec<ContextFactor>,
}

impl EstimateBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting price or quantity.
    #[must_use]
    pub fn base_value(mut self, value: f64) -> Self {
        self.base_value = Some(value);
        self
    }

    /// Set the growth per period, in percent.
    #[must_use]
    pub fn growth_rate_percent(mut self, rate: f64) -> Self {
        self.growth_rate_percent = Some(rate);
        self
    }

    /// Set the number of compounding periods.
    #[must_use]
    pub fn horizon_years(mut self, years: u32) -> Self {
        self.horizon_years = Some(years);
        self
    }

    /// Append a display-only context factor. Order is preserved.
    #[must_use]
    pub fn factor(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.context_factors.push(ContextFactor::new(label, value));
        self
    }

    /// Build the request, applying strict validation.
    pub fn build(self) -> Result<EstimationRequest, ValidationError> {
        let request = EstimationRequest {
            base_value: self.base_value,
            growth_rate_percent: self.growth_rate_percent,
            horizon_years: self.horizon_years,
            context_factors: self.context_factors,
        };
        request.validate()?;
        Ok(request)
    }
}
