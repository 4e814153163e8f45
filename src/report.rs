//! Daily alien-arrival reports.
//!
//! Processing a report updates the city model, writes a plain-text report
//! document, and prepares pre-filled estimation requests for the housing and
//! food pages.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::city::{CityModel, CityModelService, PROJECTION_YEARS};
use crate::error::{ExecutionError, SimResult, ValidationError};
use crate::estimate::{EstimationRequest, FoodEstimationRequest, MAX_TEXT_LEN};
use crate::numeric::round2;

/// Placeholder item used for the food auto-fill.
pub const AUTO_FILL_FOOD_ITEM: &str = "Alien Cuisine Special";

/// Food auto-fill price as a fraction of the housing base price.
pub const FOOD_PRICE_RATIO: f64 = 0.5;

/// Used when the advisor fails.
pub const ADVICE_FALLBACK: &str = "Could not generate infrastructure advice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(uuid::Uuid);

impl ReportId {
    /// Creates a new random report ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day's report as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub aliens_count: u32,
    #[serde(default)]
    pub comments: String,
}

impl DailyReport {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.comments.len() > MAX_TEXT_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "comments".to_string(),
                max_length: MAX_TEXT_LEN,
            });
        }
        Ok(())
    }
}

/// Pre-filled requests for the prediction pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFill {
    pub housing: EstimationRequest,
    pub food: FoodEstimationRequest,
}

impl AutoFill {
    #[must_use]
    pub fn from_model(model: &CityModel) -> Self {
        let housing = EstimationRequest {
            base_value: Some(model.base_price),
            growth_rate_percent: Some(model.base_growth_rate),
            horizon_years: Some(PROJECTION_YEARS),
            context_factors: Vec::new(),
        };
        let food = FoodEstimationRequest {
            food_item: AUTO_FILL_FOOD_ITEM.to_string(),
            request: EstimationRequest {
                base_value: Some(round2(model.base_price * FOOD_PRICE_RATIO)),
                ..housing.clone()
            },
        };
        Self { housing, food }
    }
}

/// Everything produced by processing one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReportOutcome {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub updated_city_model: CityModel,
    pub pointers: Vec<String>,
    pub report_doc: String,
    pub auto_fill: AutoFill,
    pub infrastructure_advice: String,
}

/// Produces infrastructure advice for a report.
pub trait Advisor: Send + Sync {
    fn advise(&self, report: &DailyReport, model: &CityModel) -> Result<String, ExecutionError>;
}

const BULLETINS: [&str; 7] = [
    "A surge of {aliens} new arrivals was detected. The council recommends building advanced dwellings.",
    "{aliens} aliens in one day: allocate more farmland for off-world crop varieties.",
    "With {aliens} visitors reported, budget for new energy infrastructure and universal translators.",
    "An arrival count of {aliens} raises density concerns. Explore vertical housing.",
    "Investing in interstellar tourism would help the local economy.",
    "Scientists suggest upgrading the warp-train lines for alien commuters.",
    "Keep the energy supply clean to remain an alien-friendly city.",
];

/// Deterministic advisor that assembles 2-4 bulletins from a fixed bank.
///
/// The same report always yields the same advice.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletinAdvisor;

impl Advisor for BulletinAdvisor {
    fn advise(&self, report: &DailyReport, model: &CityModel) -> Result<String, ExecutionError> {
        let count = report.aliens_count as usize;
        let picks = 2 + count % 3;
        // Stride 3 is coprime with the bank size, so picks never repeat.
        let start = (count + model.city_name.len()) % BULLETINS.len();
        let aliens = report.aliens_count.to_string();

        let advice: Vec<String> = (0..picks)
            .map(|i| BULLETINS[(start + 3 * i) % BULLETINS.len()].replace("{aliens}", &aliens))
            .collect();
        Ok(advice.join(" "))
    }
}

/// Processes daily reports against the shared city model.
pub struct DailyReportService {
    city: Arc<CityModelService>,
    advisor: Box<dyn Advisor>,
}

impl fmt::Debug for DailyReportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyReportService")
            .field("city", &self.city)
            .finish_non_exhaustive()
    }
}

impl DailyReportService {
    #[must_use]
    pub fn new(city: Arc<CityModelService>) -> Self {
        Self::with_advisor(city, Box::new(BulletinAdvisor))
    }

    #[must_use]
    pub fn with_advisor(city: Arc<CityModelService>, advisor: Box<dyn Advisor>) -> Self {
        Self { city, advisor }
    }

    /// Applies the report to the city model and assembles the outcome.
    ///
    /// Fails if no city model exists. Advisor failures are not fatal.
    pub fn process(&self, report: DailyReport) -> SimResult<DailyReportOutcome> {
        report.validate()?;
        let (model, pointers) = self
            .city
            .apply_daily_report(report.aliens_count, &report.comments)?;

        let auto_fill = AutoFill::from_model(&model);
        let advice = self.advisor.advise(&report, &model).unwrap_or_else(|e| {
            warn!(error = %e, "infrastructure advice failed, using fallback");
            ADVICE_FALLBACK.to_string()
        });
        let report_doc = render_report_doc(&report, &pointers, &advice);

        let outcome = DailyReportOutcome {
            report_id: ReportId::new(),
            generated_at: Utc::now(),
            updated_city_model: model,
            pointers,
            report_doc,
            auto_fill,
            infrastructure_advice: advice,
        };
        info!(
            report_id = %outcome.report_id,
            aliens_count = report.aliens_count,
            "processed daily report"
        );
        Ok(outcome)
    }
}

fn render_report_doc(report: &DailyReport, pointers: &[String], advice: &str) -> String {
    format!(
        "Daily Report:\nAliens Count: {}\nComments: {}\n\nPointers:\n{}\n\nInfrastructure Advice:\n{}",
        report.aliens_count,
        report.comments,
        pointers.join("\n"),
        advice
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityModelParams;

    struct FailingAdvisor;

    impl Advisor for FailingAdvisor {
        fn advise(&self, _: &DailyReport, _: &CityModel) -> Result<String, ExecutionError> {
            Err(ExecutionError::AdvisorFailed {
                reason: "offline".to_string(),
            })
        }
    }

    fn seeded_city() -> Arc<CityModelService> {
        let city = Arc::new(CityModelService::new());
        city.create_base_model(CityModelParams {
            city_name: "Roswell".to_string(),
            base_population: 50_000,
            base_growth_rate: 1.0,
            base_price: 180_000.5,
        })
        .unwrap();
        city
    }

    #[test]
    fn process_requires_city_model() {
        let svc = DailyReportService::new(Arc::new(CityModelService::new()));
        let err = svc
            .process(DailyReport {
                aliens_count: 1,
                comments: String::new(),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn process_builds_auto_fill_from_updated_model() {
        let svc = DailyReportService::new(seeded_city());
        let outcome = svc
            .process(DailyReport {
                aliens_count: 4,
                comments: "quiet day".to_string(),
            })
            .unwrap();

        let growth = outcome.updated_city_model.base_growth_rate;
        assert!((growth - 1.4).abs() < 1e-9);

        let housing = &outcome.auto_fill.housing;
        assert_eq!(housing.base_value, Some(180_000.5));
        assert_eq!(housing.growth_rate_percent, Some(growth));
        assert_eq!(housing.horizon_years, Some(10));

        let food = &outcome.auto_fill.food;
        assert_eq!(food.food_item, AUTO_FILL_FOOD_ITEM);
        assert_eq!(food.request.base_value, Some(90_000.25));
        assert_eq!(food.request.horizon_years, Some(10));
    }

    #[test]
    fn report_doc_lists_everything() {
        let svc = DailyReportService::new(seeded_city());
        let outcome = svc
            .process(DailyReport {
                aliens_count: 9,
                comments: "crop circles".to_string(),
            })
            .unwrap();

        let doc = &outcome.report_doc;
        assert!(doc.starts_with("Daily Report:\nAliens Count: 9\nComments: crop circles"));
        assert!(doc.contains("High alien activity"));
        assert!(doc.contains("Additional comment: crop circles"));
        assert!(doc.ends_with(&outcome.infrastructure_advice));
    }

    #[test]
    fn bulletin_advice_is_deterministic() {
        let city = seeded_city();
        let model = city.get_city_model().unwrap();
        let report = DailyReport {
            aliens_count: 7,
            comments: String::new(),
        };
        let a = BulletinAdvisor.advise(&report, &model).unwrap();
        let b = BulletinAdvisor.advise(&report, &model).unwrap();
        assert_eq!(a, b);
        assert!(!a.contains("{aliens}"));
    }

    #[test]
    fn bulletin_pick_count_varies_between_two_and_four() {
        let city = seeded_city();
        let model = city.get_city_model().unwrap();
        for aliens_count in 0..12 {
            let report = DailyReport {
                aliens_count,
                comments: String::new(),
            };
            let advice = BulletinAdvisor.advise(&report, &model).unwrap();
            let sentences = BULLETINS
                .iter()
                .map(|b| b.replace("{aliens}", &aliens_count.to_string()))
                .filter(|b| advice.contains(b.as_str()))
                .count();
            assert_eq!(sentences, 2 + aliens_count as usize % 3);
        }
    }

    #[test]
    fn advisor_failure_uses_fallback() {
        let svc = DailyReportService::with_advisor(seeded_city(), Box::new(FailingAdvisor));
        let outcome = svc.process(DailyReport::default()).unwrap();
        assert_eq!(outcome.infrastructure_advice, ADVICE_FALLBACK);
        assert!(outcome.report_doc.ends_with(ADVICE_FALLBACK));
    }

    #[test]
    fn oversized_comments_are_rejected() {
        let svc = DailyReportService::new(seeded_city());
        let err = svc
            .process(DailyReport {
                aliens_count: 1,
                comments: "x".repeat(MAX_TEXT_LEN + 1),
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn report_ids_are_unique() {
        assert_ne!(ReportId::new(), ReportId::new());
    }
}
