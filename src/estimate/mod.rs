//! Compound-growth estimation.
//!
//! The estimator is a pure function: same request in, same result out. It
//! never fails. Missing or unusable inputs are replaced with defaults:
//!
//! | field | default |
//! |---|---|
//! | `base_value` | `1` (also used for non-positive values) |
//! | `growth_rate_percent` | `0` |
//! | `horizon_years` | `1` |
//!
//! ```
//! use aliensim::{estimate, EstimateBuilder};
//!
//! let request = EstimateBuilder::new()
//!     .base_value(100.0)
//!     .growth_rate_percent(10.0)
//!     .horizon_years(2)
//!     .build()
//!     .unwrap();
//!
//! let result = estimate(request);
//! assert!((result.estimated_value - 121.0).abs() < 1e-9);
//! assert_eq!(result.confidence.value(), 0.8);
//! ```

mod builder;
mod request;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confidence::Confidence;
use crate::numeric::{compound, round2};

pub use builder::EstimateBuilder;
pub use request::{
    ContextFactor, EstimationRequest, FoodEstimationRequest, MAX_CONTEXT_FACTORS,
    MAX_HORIZON_YEARS, MAX_TEXT_LEN,
};

/// Substituted for a missing, non-numeric or non-positive base value.
pub const DEFAULT_BASE_VALUE: f64 = 1.0;

/// Substituted for a missing growth rate.
pub const DEFAULT_GROWTH_RATE_PERCENT: f64 = 0.0;

/// Substituted for a missing horizon.
pub const DEFAULT_HORIZON_YEARS: u32 = 1;

/// Fixed explanation attached to every result.
pub const EXPLANATION: &str = "Compound growth projection: estimated value = base value \
     * (1 + growth rate / 100) ^ horizon years. Context factors are shown for \
     reference and do not change the result.";

/// Output of a single estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    #[serde(
        alias = "estimatedValue",
        alias = "predicted_price",
        alias = "predictedPrice"
    )]
    pub estimated_value: f64,

    #[serde(alias = "confidence_score")]
    pub confidence: Confidence,

    /// Formatted context factors in input order, then derived summaries.
    #[serde(default)]
    pub factors: Vec<String>,

    #[serde(default, alias = "analysis")]
    pub explanation: String,
}

/// Inputs after default substitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInputs {
    pub base_value: f64,
    pub growth_rate_percent: f64,
    pub horizon_years: u32,
}

impl ResolvedInputs {
    /// Applies the tolerant-default policy to a request.
    #[must_use]
    pub fn from_request(request: &EstimationRequest) -> Self {
        let base_value = request
            .base_value
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_BASE_VALUE);
        let growth_rate_percent = request
            .growth_rate_percent
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_GROWTH_RATE_PERCENT);
        let horizon_years = request.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS);

        Self {
            base_value,
            growth_rate_percent,
            horizon_years,
        }
    }

    /// Value after `years` periods.
    #[must_use]
    pub fn value_at(&self, years: u32) -> f64 {
        compound(self.base_value, self.growth_rate_percent, years)
    }
}

/// Rates past this magnitude are printed in scientific notation.
const PLAIN_PERCENT_LIMIT: f64 = 1e9;

fn format_percent(rate: f64) -> String {
    if rate.abs() < PLAIN_PERCENT_LIMIT {
        round2(rate).to_string()
    } else {
        format!("{rate:.3e}")
    }
}

/// Produces a compound-growth estimate from a request.
///
/// Never fails; see the module docs for the defaults applied.
#[must_use]
pub fn estimate(request: EstimationRequest) -> EstimationResult {
    let inputs = ResolvedInputs::from_request(&request);
    let estimated_value = inputs.value_at(inputs.horizon_years);

    let mut factors: Vec<String> = request
        .context_factors
        .iter()
        .map(ToString::to_string)
        .collect();
    factors.push(format!(
        "Annual growth rate: {}%",
        format_percent(inputs.growth_rate_percent)
    ));
    factors.push(format!("Horizon (years): {}", inputs.horizon_years));

    debug!(
        base_value = inputs.base_value,
        growth_rate_percent = inputs.growth_rate_percent,
        horizon_years = inputs.horizon_years,
        estimated_value,
        "estimate computed"
    );

    EstimationResult {
        estimated_value,
        confidence: Confidence::placeholder(),
        factors,
        explanation: EXPLANATION.to_string(),
    }
}

/// Estimate for a named food item; the item is listed as the first factor.
#[must_use]
pub fn estimate_food(request: FoodEstimationRequest) -> EstimationResult {
    let FoodEstimationRequest {
        food_item,
        mut request,
    } = request;
    request
        .context_factors
        .insert(0, ContextFactor::new("Food item", food_item));
    estimate(request)
}

/// One point of a year-by-year projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: u32,
    pub value: f64,
}

/// Year-by-year values from year 0 through the horizon, for charting.
///
/// The horizon is capped at [`MAX_HORIZON_YEARS`].
#[must_use]
pub fn project_series(request: &EstimationRequest) -> Vec<SeriesPoint> {
    let inputs = ResolvedInputs::from_request(request);
    let last = inputs.horizon_years.min(MAX_HORIZON_YEARS);
    (0..=last)
        .map(|year| SeriesPoint {
            year,
            value: inputs.value_at(year),
        })
        .collect()
}
