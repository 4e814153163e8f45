//! City model: base demographics plus derived 10-year projections.
//!
//! A single model is held in memory at a time. Daily reports nudge its
//! growth rate upward and the derived projections are recomputed.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExecutionError, SimResult, ValidationError};
use crate::estimate::MAX_TEXT_LEN;
use crate::numeric::{compound, round2, simple};

/// Horizon of the derived projections.
pub const PROJECTION_YEARS: u32 = 10;

/// Growth-rate points added per reported alien arrival.
pub const GROWTH_PER_ALIEN: f64 = 0.1;

/// Arrivals above this count are flagged as high activity.
pub const HIGH_ACTIVITY_THRESHOLD: u32 = 5;

/// Parameters for creating a city model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityModelParams {
    pub city_name: String,
    pub base_population: u64,
    /// Annual growth in percent.
    pub base_growth_rate: f64,
    pub base_price: f64,
}

impl CityModelParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.city_name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "city_name".to_string(),
            });
        }
        if name.len() > MAX_TEXT_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "city_name".to_string(),
                max_length: MAX_TEXT_LEN,
            });
        }
        if !self.base_growth_rate.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "base_growth_rate".to_string(),
            });
        }
        if !self.base_price.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "base_price".to_string(),
            });
        }
        if self.base_price <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "base_price".to_string(),
                value: self.base_price,
            });
        }
        DerivedStats::compute(self.base_population, self.base_growth_rate, self.base_price)
            .map(|_| ())
    }
}

/// Projections derived from the base model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Compound growth, truncated to whole inhabitants.
    pub projected_population_10_years: u64,
    /// Simple (linear) growth, rounded to cents.
    pub projected_price_10_years: f64,
}

impl DerivedStats {
    /// Projects population and price `PROJECTION_YEARS` ahead.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Overflow` when a projection does not fit its
    /// type: the population past `u64::MAX`, or the price past `f64::MAX`.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(population: u64, growth_rate: f64, price: f64) -> Result<Self, ValidationError> {
        let projected = compound(population as f64, growth_rate, PROJECTION_YEARS).floor();
        if !projected.is_finite() || projected >= u64::MAX as f64 {
            return Err(ValidationError::Overflow {
                field: "projected_population_10_years".to_string(),
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let projected_population_10_years = projected as u64;

        let projected_price_10_years = round2(simple(price, growth_rate, PROJECTION_YEARS));
        if !projected_price_10_years.is_finite() {
            return Err(ValidationError::Overflow {
                field: "projected_price_10_years".to_string(),
            });
        }

        Ok(Self {
            projected_population_10_years,
            projected_price_10_years,
        })
    }
}

/// The current city model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityModel {
    pub city_name: String,
    pub base_population: u64,
    pub base_growth_rate: f64,
    pub base_price: f64,
    pub derived_stats: DerivedStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CityModel {
    fn from_params(params: CityModelParams) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let derived_stats =
            DerivedStats::compute(params.base_population, params.base_growth_rate, params.base_price)?;
        Ok(Self {
            city_name: params.city_name.trim().to_string(),
            base_population: params.base_population,
            base_growth_rate: params.base_growth_rate,
            base_price: params.base_price,
            derived_stats,
            created_at: now,
            updated_at: now,
        })
    }

    /// Leaves the model untouched when the new rate cannot be projected.
    fn set_growth_rate(&mut self, growth_rate: f64) -> Result<(), ValidationError> {
        self.derived_stats =
            DerivedStats::compute(self.base_population, growth_rate, self.base_price)?;
        self.base_growth_rate = growth_rate;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Pointers describing a day's alien activity.
#[must_use]
pub fn activity_pointers(aliens_count: u32, comments: &str) -> Vec<String> {
    let mut pointers = Vec::with_capacity(2);
    if aliens_count > HIGH_ACTIVITY_THRESHOLD {
        pointers.push("High alien activity detected. Review city security protocols.".to_string());
    } else {
        pointers.push("Alien activity is within normal range.".to_string());
    }
    if !comments.is_empty() {
        pointers.push(format!("Additional comment: {comments}"));
    }
    pointers
}

/// Holds the single in-memory city model.
#[derive(Debug, Default)]
pub struct CityModelService {
    model: RwLock<Option<CityModel>>,
}

fn lock_err(context: &'static str) -> ExecutionError {
    ExecutionError::PoisonedLock {
        context: context.to_string(),
    }
}

impl CityModelService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or replaces) the city model.
    pub fn create_base_model(&self, params: CityModelParams) -> SimResult<CityModel> {
        params.validate()?;
        let model = CityModel::from_params(params)?;

        let mut guard = self.model.write().map_err(|_| lock_err("city model write"))?;
        if guard.is_some() {
            info!(city = %model.city_name, "replacing existing city model");
        }
        *guard = Some(model.clone());

        info!(
            city = %model.city_name,
            population = model.base_population,
            growth_rate = model.base_growth_rate,
            price = model.base_price,
            "created base city model"
        );
        Ok(model)
    }

    /// Returns a snapshot of the current model.
    pub fn get_city_model(&self) -> SimResult<CityModel> {
        let guard = self.model.read().map_err(|_| lock_err("city model read"))?;
        guard
            .clone()
            .ok_or_else(|| ExecutionError::CityModelMissing.into())
    }

    /// Applies a day's arrivals to the model.
    ///
    /// Returns the updated model and the activity pointers for the report.
    pub fn apply_daily_report(
        &self,
        aliens_count: u32,
        comments: &str,
    ) -> SimResult<(CityModel, Vec<String>)> {
        let mut guard = self.model.write().map_err(|_| lock_err("city model write"))?;
        let model = guard.as_mut().ok_or(ExecutionError::CityModelMissing)?;

        let updated_rate = model.base_growth_rate + f64::from(aliens_count) * GROWTH_PER_ALIEN;
        model.set_growth_rate(updated_rate)?;

        info!(
            city = %model.city_name,
            aliens_count,
            growth_rate = model.base_growth_rate,
            "applied daily report to city model"
        );

        Ok((model.clone(), activity_pointers(aliens_count, comments)))
    }
}
