//! Historical market samples and trend statistics.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::numeric::round2;

/// Which market a history describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Housing,
    Food,
}

impl Market {
    /// Name of the volume series for this market.
    #[must_use]
    pub const fn volume_label(self) -> &'static str {
        match self {
            Self::Housing => "population",
            Self::Food => "demand",
        }
    }
}

/// Yearly prices and a companion volume series (population or demand).
///
/// On the wire the volume series is keyed by its label, so housing emits
/// `population` and food emits `demand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MarketHistoryBody")]
pub struct MarketHistory {
    pub market: Market,
    pub years: Vec<i32>,
    pub prices: Vec<f64>,
    #[serde(alias = "population", alias = "demand")]
    pub volume: Vec<f64>,
    pub volume_label: String,
}

#[derive(Serialize)]
struct MarketHistoryBody {
    market: Market,
    years: Vec<i32>,
    prices: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    population: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    demand: Option<Vec<f64>>,
    volume_label: String,
}

impl From<MarketHistory> for MarketHistoryBody {
    fn from(history: MarketHistory) -> Self {
        let (population, demand) = match history.market {
            Market::Housing => (Some(history.volume), None),
            Market::Food => (None, Some(history.volume)),
        };
        Self {
            market: history.market,
            years: history.years,
            prices: history.prices,
            population,
            demand,
            volume_label: history.volume_label,
        }
    }
}

/// Summary statistics over a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub average_price: f64,
    /// Compound annual growth in percent.
    pub price_growth_rate: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl MarketHistory {
    /// Built-in housing sample, 2010-2023.
    #[must_use]
    pub fn housing_sample() -> Self {
        Self::linear_sample(Market::Housing, 200_000.0, 10_000.0, 100_000.0, 2_000.0)
    }

    /// Built-in food sample, 2010-2023.
    #[must_use]
    pub fn food_sample() -> Self {
        let prices = vec![
            10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0, 32.0, 35.0,
        ];
        let mut history = Self::linear_sample(Market::Food, 0.0, 0.0, 1_000.0, 50.0);
        history.prices = prices;
        history
    }

    #[must_use]
    pub fn sample(market: Market) -> Self {
        match market {
            Market::Housing => Self::housing_sample(),
            Market::Food => Self::food_sample(),
        }
    }

    fn linear_sample(
        market: Market,
        price_start: f64,
        price_step: f64,
        volume_start: f64,
        volume_step: f64,
    ) -> Self {
        let years: Vec<i32> = (2010..2024).collect();
        let steps = years.iter().map(|y| f64::from(y - 2010));
        Self {
            market,
            prices: steps.clone().map(|i| price_start + price_step * i).collect(),
            volume: steps.map(|i| volume_start + volume_step * i).collect(),
            years,
            volume_label: market.volume_label().to_string(),
        }
    }

    /// Average annual growth of the volume series, in percent (2 decimals).
    pub fn average_growth_rate(&self) -> Result<f64, ValidationError> {
        cagr(self.market.volume_label(), &self.volume).map(round2)
    }

    /// Average, compound growth, min and max of the price series.
    pub fn price_trend(&self) -> Result<PriceTrend, ValidationError> {
        let price_growth_rate = round2(cagr("prices", &self.prices)?);

        #[allow(clippy::cast_precision_loss)]
        let average_price = round2(self.prices.iter().sum::<f64>() / self.prices.len() as f64);
        let min_price = self.prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(PriceTrend {
            average_price,
            price_growth_rate,
            min_price,
            max_price,
        })
    }
}

/// Compound annual growth rate between the first and last points, in percent.
fn cagr(series: &str, values: &[f64]) -> Result<f64, ValidationError> {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Err(ValidationError::InsufficientHistory {
            series: series.to_string(),
            points: 0,
        });
    };
    if values.len() < 2 {
        return Err(ValidationError::InsufficientHistory {
            series: series.to_string(),
            points: values.len(),
        });
    }
    if !first.is_finite() || first <= 0.0 {
        return Err(ValidationError::NonPositive {
            field: series.to_string(),
            value: first,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let periods = (values.len() - 1) as f64;
    Ok(((last / first).powf(1.0 / periods) - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn housing_sample_matches_fixture() {
        let h = MarketHistory::housing_sample();
        assert_eq!(h.years.first(), Some(&2010));
        assert_eq!(h.years.last(), Some(&2023));
        assert_eq!(h.prices.first(), Some(&200_000.0));
        assert_eq!(h.prices.last(), Some(&330_000.0));
        assert_eq!(h.volume.last(), Some(&126_000.0));
        assert_eq!(h.volume_label, "population");
    }

    #[test]
    fn food_sample_matches_fixture() {
        let f = MarketHistory::food_sample();
        assert_eq!(f.prices.len(), 14);
        assert_eq!(f.volume.first(), Some(&1_000.0));
        assert_eq!(f.volume.last(), Some(&1_650.0));
        assert_eq!(f.volume_label, "demand");
    }

    #[test]
    fn housing_population_growth_rate() {
        // (126000/100000)^(1/13) - 1 = 1.79%
        let rate = MarketHistory::housing_sample().average_growth_rate().unwrap();
        assert!((rate - 1.79).abs() < 1e-9);
    }

    #[test]
    fn housing_price_trend() {
        let trend = MarketHistory::housing_sample().price_trend().unwrap();
        assert!((trend.average_price - 265_000.0).abs() < 1e-9);
        assert!((trend.price_growth_rate - 3.93).abs() < 1e-9);
        assert_eq!(trend.min_price, 200_000.0);
        assert_eq!(trend.max_price, 330_000.0);
    }

    #[test]
    fn food_price_trend() {
        let trend = MarketHistory::food_sample().price_trend().unwrap();
        assert!((trend.average_price - 21.57).abs() < 1e-9);
        assert_eq!(trend.min_price, 10.0);
        assert_eq!(trend.max_price, 35.0);
    }

    #[test]
    fn short_series_are_rejected() {
        let mut h = MarketHistory::food_sample();
        h.prices.truncate(1);
        assert!(matches!(
            h.price_trend(),
            Err(ValidationError::InsufficientHistory { points: 1, .. })
        ));
        h.volume.clear();
        assert!(matches!(
            h.average_growth_rate(),
            Err(ValidationError::InsufficientHistory { points: 0, .. })
        ));
    }

    #[test]
    fn volume_serializes_under_market_key() {
        let housing = serde_json::to_value(MarketHistory::housing_sample()).unwrap();
        assert_eq!(housing["population"].as_array().map(Vec::len), Some(14));
        assert!(housing.get("demand").is_none());
        assert!(housing.get("volume").is_none());

        let food = serde_json::to_value(MarketHistory::food_sample()).unwrap();
        assert_eq!(food["demand"][0], 1_000.0);
        assert!(food.get("population").is_none());

        let back: MarketHistory = serde_json::from_value(food).unwrap();
        assert_eq!(back, MarketHistory::food_sample());
    }

    #[test]
    fn legacy_volume_names_deserialize() {
        let json = r#"{"market": "housing", "years": [2020, 2021], "prices": [1.0, 2.0],
                       "population": [10.0, 11.0], "volume_label": "population"}"#;
        let h: MarketHistory = serde_json::from_str(json).unwrap();
        assert_eq!(h.volume, vec![10.0, 11.0]);
    }
}
