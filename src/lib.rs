//! # aliensim - estimation core for the Alien Simulation demo
//!
//! aliensim turns a handful of form inputs into a deterministic projection
//! and keeps a small in-memory city model that daily alien-arrival reports
//! update. An optional HTTP surface (feature `transport-http`, binary with
//! feature `server`) exposes everything as JSON.
//!
//! ## Core Concepts
//!
//! - **Estimation**: compound-growth projection of a base value over a horizon
//! - **Context factor**: display-only label echoed into the result
//! - **Confidence**: fixed placeholder value with explicit calibration mode
//! - **City model**: base demographics with derived 10-year projections
//! - **Daily report**: arrivals that raise the city's growth rate
//!
//! ## Usage
//!
//! ```rust
//! use aliensim::{estimate, EstimateBuilder};
//!
//! let request = EstimateBuilder::new()
//!     .base_value(250_000.0)
//!     .growth_rate_percent(1.5)
//!     .horizon_years(10)
//!     .factor("Location", "Roswell")
//!     .build()?;
//!
//! let result = estimate(request);
//! assert_eq!(result.factors[0], "Location: Roswell");
//! # Ok::<(), aliensim::ValidationError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod city;
pub mod config;
pub mod confidence;
pub mod error;
pub mod estimate;
pub mod history;
pub mod numeric;
pub mod report;
pub mod wire;

#[cfg(feature = "transport-http")]
pub mod transport;

// Re-export primary types at crate root for convenience
pub use city::{CityModel, CityModelParams, CityModelService, DerivedStats};
pub use confidence::{CalibrationMode, Confidence};
pub use error::{ExecutionError, SimError, SimResult, TransportError, ValidationError};
pub use estimate::{
    estimate, estimate_food, project_series, ContextFactor, EstimateBuilder, EstimationRequest,
    EstimationResult, FoodEstimationRequest, SeriesPoint,
};
pub use history::{Market, MarketHistory, PriceTrend};
pub use report::{
    Advisor, AutoFill, BulletinAdvisor, DailyReport, DailyReportOutcome, DailyReportService,
    ReportId,
};
