//! Estimation request types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ResolvedInputs;
use crate::error::ValidationError;
use crate::wire::{lenient_f64, lenient_u32};

/// Conservative upper bound for free-form text fields.
pub const MAX_TEXT_LEN: usize = 16 * 1024;

/// Upper bound on the number of context factors a strict caller may send.
pub const MAX_CONTEXT_FACTORS: usize = 64;

/// Upper bound on the compounding horizon a strict caller may request.
pub const MAX_HORIZON_YEARS: u32 = 500;

/// A display-only label describing an input used in an estimation.
///
/// Context factors have no effect on the computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFactor {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl ContextFactor {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ContextFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Inputs to a single estimation.
///
/// Every numeric field is optional; the estimator substitutes a default for
/// anything missing or non-numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationRequest {
    /// Starting price or quantity.
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none",
        alias = "baseValue",
        alias = "current_price",
        alias = "currentPrice"
    )]
    pub base_value: Option<f64>,

    /// Growth per period in percent; negative values mean decline.
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none",
        alias = "growthRatePercent",
        alias = "population_growth",
        alias = "populationGrowth"
    )]
    pub growth_rate_percent: Option<f64>,

    /// Number of compounding periods.
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none",
        alias = "horizonYears",
        alias = "years_ahead",
        alias = "yearsAhead"
    )]
    pub horizon_years: Option<u32>,

    #[serde(default, alias = "contextFactors")]
    pub context_factors: Vec<ContextFactor>,
}

impl EstimationRequest {
    /// Strict validation for callers that want to reject bad input instead
    /// of relying on the estimator's tolerant defaults.
    ///
    /// Missing fields are fine; present fields must be usable, and together
    /// they must produce a finite estimate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(base) = self.base_value {
            validate_positive("base_value", base)?;
        }
        if let Some(rate) = self.growth_rate_percent {
            if !rate.is_finite() {
                return Err(ValidationError::NotFinite {
                    field: "growth_rate_percent".to_string(),
                });
            }
        }
        if let Some(years) = self.horizon_years {
            if years > MAX_HORIZON_YEARS {
                return Err(ValidationError::HorizonTooLong {
                    years,
                    max: MAX_HORIZON_YEARS,
                });
            }
        }
        let inputs = ResolvedInputs::from_request(self);
        if !inputs.value_at(inputs.horizon_years).is_finite() {
            return Err(ValidationError::Overflow {
                field: "estimated_value".to_string(),
            });
        }
        if self.context_factors.len() > MAX_CONTEXT_FACTORS {
            return Err(ValidationError::TooManyFactors {
                actual: self.context_factors.len(),
                max: MAX_CONTEXT_FACTORS,
            });
        }
        for factor in &self.context_factors {
            validate_text("context_factors.label", &factor.label)?;
            validate_text("context_factors.value", &factor.value)?;
        }
        Ok(())
    }
}

/// An estimation request for a named food item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodEstimationRequest {
    #[serde(default, alias = "foodItem")]
    pub food_item: String,

    #[serde(flatten)]
    pub request: EstimationRequest,
}

impl FoodEstimationRequest {
    /// Validates this request; the food item must be named.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.food_item.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "food_item".to_string(),
            });
        }
        validate_text("food_item", &self.food_item)?;
        self.request.validate()
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_TEXT_LEN {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_deserialize() {
        let req: EstimationRequest = serde_json::from_str(
            r#"{"base_value": 100, "growth_rate_percent": 2.5, "horizon_years": 3,
                "context_factors": [{"label": "Location", "value": "Area 51"}]}"#,
        )
        .unwrap();
        assert_eq!(req.base_value, Some(100.0));
        assert_eq!(req.growth_rate_percent, Some(2.5));
        assert_eq!(req.horizon_years, Some(3));
        assert_eq!(req.context_factors, vec![ContextFactor::new("Location", "Area 51")]);
    }

    #[test]
    fn legacy_names_deserialize() {
        let req: EstimationRequest = serde_json::from_str(
            r#"{"current_price": "250000", "population_growth": 1.2, "years_ahead": "10"}"#,
        )
        .unwrap();
        assert_eq!(req.base_value, Some(250_000.0));
        assert_eq!(req.growth_rate_percent, Some(1.2));
        assert_eq!(req.horizon_years, Some(10));
        assert!(req.context_factors.is_empty());
    }

    #[test]
    fn non_numeric_fields_become_missing() {
        let req: EstimationRequest =
            serde_json::from_str(r#"{"base_value": "lots", "horizon_years": -2}"#).unwrap();
        assert_eq!(req.base_value, None);
        assert_eq!(req.horizon_years, None);
    }

    #[test]
    fn serialization_uses_canonical_names_and_skips_missing() {
        let req = EstimationRequest {
            base_value: Some(5.0),
            ..EstimationRequest::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["base_value"], 5.0);
        assert!(json.get("growth_rate_percent").is_none());
        assert!(json.get("horizon_years").is_none());
    }

    #[test]
    fn validate_accepts_defaults() {
        EstimationRequest::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_positive_base() {
        let req = EstimationRequest {
            base_value: Some(0.0),
            ..EstimationRequest::default()
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::NonPositive { .. })
        ));
    }

    #[test]
    fn validate_rejects_long_horizon_and_factor_floods() {
        let req = EstimationRequest {
            horizon_years: Some(MAX_HORIZON_YEARS + 1),
            ..EstimationRequest::default()
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::HorizonTooLong { .. })
        ));

        let req = EstimationRequest {
            context_factors: vec![ContextFactor::new("a", "b"); MAX_CONTEXT_FACTORS + 1],
            ..EstimationRequest::default()
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::TooManyFactors { .. })
        ));
    }

    #[test]
    fn validate_rejects_inputs_that_overflow() {
        let huge_base = EstimationRequest {
            base_value: Some(1e308),
            growth_rate_percent: Some(100.0),
            horizon_years: Some(1),
            ..EstimationRequest::default()
        };
        assert!(matches!(
            huge_base.validate(),
            Err(ValidationError::Overflow { .. })
        ));

        let huge_rate = EstimationRequest {
            base_value: Some(2.0),
            growth_rate_percent: Some(1e300),
            horizon_years: Some(3),
            ..EstimationRequest::default()
        };
        assert!(matches!(
            huge_rate.validate(),
            Err(ValidationError::Overflow { .. })
        ));

        // A steep decline bottoms out at zero and stays representable.
        let crash = EstimationRequest {
            growth_rate_percent: Some(-1e300),
            horizon_years: Some(MAX_HORIZON_YEARS),
            ..EstimationRequest::default()
        };
        crash.validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_finite_growth() {
        let req = EstimationRequest {
            growth_rate_percent: Some(f64::INFINITY),
            ..EstimationRequest::default()
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn food_request_flattens_and_requires_item() {
        let food: FoodEstimationRequest = serde_json::from_str(
            r#"{"food_item": "Moon Cheese", "current_price": 12, "years_ahead": 2}"#,
        )
        .unwrap();
        assert_eq!(food.food_item, "Moon Cheese");
        assert_eq!(food.request.base_value, Some(12.0));
        assert_eq!(food.request.horizon_years, Some(2));
        food.validate().unwrap();

        let unnamed = FoodEstimationRequest::default();
        assert!(matches!(
            unnamed.validate(),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn context_factor_display() {
        assert_eq!(ContextFactor::new("Bedrooms", 3).to_string(), "Bedrooms: 3");
        assert_eq!(ContextFactor::new("Notes", "").to_string(), "Notes: ");
    }
}
