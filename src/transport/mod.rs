//! HTTP transport for aliensim.
//!
//! JSON in, JSON out. Every failure is reported with one generic body shape,
//! `{"error": "<message>"}`; the status code separates bad input (400), a
//! missing city model (404) and everything else (500). There are no retries
//! and no partial results.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::city::{CityModel, CityModelParams, CityModelService};
use crate::config::ServerConfig;
use crate::error::{ExecutionError, SimError, SimResult, TransportError, ValidationError};
use crate::estimate::{
    estimate, estimate_food, project_series, EstimationRequest, EstimationResult,
    FoodEstimationRequest, SeriesPoint,
};
use crate::history::{Market, MarketHistory, PriceTrend};
use crate::report::{DailyReport, DailyReportOutcome, DailyReportService};

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppState {
    pub city: Arc<CityModelService>,
    pub reports: DailyReportService,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        let city = Arc::new(CityModelService::new());
        let reports = DailyReportService::new(Arc::clone(&city));
        Self { city, reports }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The single failure body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CityModelEnvelope {
    pub city_model: CityModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Handler error: wraps `SimError` and renders the generic failure body.
#[derive(Debug)]
pub struct ApiError(SimError);

impl From<SimError> for ApiError {
    fn from(err: SimError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self(err.into())
    }
}

fn status_from_sim_error(err: &SimError) -> StatusCode {
    match err {
        SimError::Validation(_)
        | SimError::Transport(TransportError::DeserializationFailed { .. }) => {
            StatusCode::BAD_REQUEST
        }
        SimError::Execution(ExecutionError::CityModelMissing) => StatusCode::NOT_FOUND,
        SimError::Execution(_) | SimError::Transport(_) | SimError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_from_sim_error(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        ApiError::from(TransportError::DeserializationFailed {
            message: rejection.body_text(),
        })
    })
}

async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: Some("Welcome to Alien Simulation API".to_string()),
        status: None,
    })
}

async fn health() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: None,
        status: Some("healthy".to_string()),
    })
}

async fn predict(
    payload: Result<Json<EstimationRequest>, JsonRejection>,
) -> ApiResult<EstimationResult> {
    let request = parse_body(payload)?;
    request.validate()?;
    Ok(Json(estimate(request)))
}

async fn predict_series(
    payload: Result<Json<EstimationRequest>, JsonRejection>,
) -> ApiResult<Vec<SeriesPoint>> {
    let request = parse_body(payload)?;
    request.validate()?;
    Ok(Json(project_series(&request)))
}

async fn predict_food(
    payload: Result<Json<FoodEstimationRequest>, JsonRejection>,
) -> ApiResult<EstimationResult> {
    let request = parse_body(payload)?;
    request.validate()?;
    Ok(Json(estimate_food(request)))
}

async fn housing_history() -> Json<MarketHistory> {
    Json(MarketHistory::sample(Market::Housing))
}

async fn food_history() -> Json<MarketHistory> {
    Json(MarketHistory::sample(Market::Food))
}

async fn housing_trend() -> ApiResult<PriceTrend> {
    Ok(Json(MarketHistory::sample(Market::Housing).price_trend()?))
}

async fn food_trend() -> ApiResult<PriceTrend> {
    Ok(Json(MarketHistory::sample(Market::Food).price_trend()?))
}

async fn create_city_model(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CityModelParams>, JsonRejection>,
) -> ApiResult<CityModelEnvelope> {
    let params = parse_body(payload)?;
    let city_model = state.city.create_base_model(params)?;
    Ok(Json(CityModelEnvelope { city_model }))
}

async fn get_city_model(State(state): State<Arc<AppState>>) -> ApiResult<CityModelEnvelope> {
    let city_model = state.city.get_city_model()?;
    Ok(Json(CityModelEnvelope { city_model }))
}

async fn daily_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DailyReport>, JsonRejection>,
) -> ApiResult<DailyReportOutcome> {
    let report = parse_body(payload)?;
    Ok(Json(state.reports.process(report)?))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ValidationError> {
    let origin = HeaderValue::from_str(origin).map_err(|e| ValidationError::Malformed {
        field: "cors_origin".to_string(),
        reason: e.to_string(),
    })?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

/// Builds the API router over the given state.
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> SimResult<Router> {
    let cors = cors_layer(&config.cors_origin)?;
    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict/series", post(predict_series))
        .route("/predict-food", post(predict_food))
        .route("/api/housing/historical-data", get(housing_history))
        .route("/api/food/historical-data", get(food_history))
        .route("/api/housing/trend", get(housing_trend))
        .route("/api/food/trend", get(food_trend))
        .route("/city-model", post(create_city_model).get(get_city_model))
        .route("/daily-report", post(daily_report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(config: ServerConfig) -> SimResult<()> {
    let app = router(Arc::new(AppState::new()), &config)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| TransportError::BindFailed {
            addr: config.addr.to_string(),
            message: e.to_string(),
        })?;

    info!(addr = %config.addr, origin = %config.cors_origin, "serving aliensim API");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| SimError::internal(format!("server error: {e}")))?;

    info!("shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let bad: SimError = ValidationError::MissingField {
            field: "x".to_string(),
        }
        .into();
        assert_eq!(status_from_sim_error(&bad), StatusCode::BAD_REQUEST);

        let missing: SimError = ExecutionError::CityModelMissing.into();
        assert_eq!(status_from_sim_error(&missing), StatusCode::NOT_FOUND);

        let garbled: SimError = TransportError::DeserializationFailed {
            message: "eof".to_string(),
        }
        .into();
        assert_eq!(status_from_sim_error(&garbled), StatusCode::BAD_REQUEST);

        let internal = SimError::internal("boom");
        assert_eq!(status_from_sim_error(&internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        assert!(cors_layer("bad\norigin").is_err());
        assert!(cors_layer("http://localhost:3000").is_ok());
    }
}
