//! HTTP API for the exposure engine
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /solve - Solve one parameter of an exposure triple
//! - GET /values/:kind/:increment - Marked values of a stop table
//! - POST /ev - EV100 of a triple

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::EngineConfig;
use crate::core::query::{BaseExposure, ExposureQuery};
use crate::core::ExposureEngine;
use crate::types::{FormatError, IncrementStep, ParameterKind, SolveError, SolveReport};

/// App state
pub struct AppState {
    pub engine: ExposureEngine,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cached_tables: usize,
}

/// Stop table listing
#[derive(Debug, Serialize)]
pub struct ValuesResponse {
    pub kind: ParameterKind,
    pub increment: IncrementStep,
    pub values: Vec<String>,
}

/// EV100 response
#[derive(Debug, Serialize)]
pub struct EvResponse {
    pub ev100: f64,
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Value,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<SolveError> for ErrorResponse {
    fn from(err: SolveError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

/// Format problems are the caller's input; exposure problems are valid input with no answer
fn api_error(err: SolveError) -> ApiError {
    let status = if err.is_format() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(err.into()))
}

/// Bodies that do not deserialize are bad queries, answered in the usual error shape
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| api_error(FormatError::InvalidQuery(rejection.body_text()).into()))
}

/// Create the API router
pub fn create_router(config: EngineConfig) -> Router {
    let state = Arc::new(AppState {
        engine: ExposureEngine::with_config(config),
    });

    Router::new()
        .route("/health", get(health))
        .route("/solve", post(solve))
        .route("/values/:kind/:increment", get(values))
        .route("/ev", post(ev))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        cached_tables: state.engine.cached_tables(),
    })
}

/// Solve endpoint
async fn solve(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExposureQuery>, JsonRejection>,
) -> Result<Json<SolveReport>, ApiError> {
    let query = json_body(payload)?;
    let engine = &state.engine;
    let request = query
        .to_request(engine.config().default_increment)
        .map_err(|e| api_error(e.into()))?;

    match engine.solve(&request) {
        Ok(resolution) => {
            info!(solve_for = request.solve_for.key(), value = %resolution.value, "solved");
            Ok(Json(SolveReport::new(
                &resolution,
                request.target_triple(),
                request.solve_for,
                request.increment,
                request.ev_compensation,
            )))
        }
        Err(err) => {
            warn!(code = err.code(), "solve failed: {}", err);
            Err(api_error(err))
        }
    }
}

/// Stop table listing endpoint
async fn values(
    State(state): State<Arc<AppState>>,
    Path((kind, increment)): Path<(String, String)>,
) -> Result<Json<ValuesResponse>, ApiError> {
    let kind: ParameterKind = kind.parse().map_err(|e: FormatError| api_error(e.into()))?;
    let increment: IncrementStep = increment.parse().map_err(|e: FormatError| api_error(e.into()))?;

    Ok(Json(ValuesResponse {
        kind,
        increment,
        values: state.engine.available_values(kind, increment),
    }))
}

/// EV100 endpoint
async fn ev(payload: Result<Json<BaseExposure>, JsonRejection>) -> Result<Json<EvResponse>, ApiError> {
    let base = json_body(payload)?;
    let triple = base.parse().map_err(|e| api_error(e.into()))?;
    Ok(Json(EvResponse { ev100: triple.ev100() }))
}

/// Run the API server
pub async fn run_server(config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.addr.clone();
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("evsolve API running on {}", addr);
    info!("  GET  /health                    - Health check");
    info!("  POST /solve                     - Solve exposure");
    info!("  GET  /values/:kind/:increment   - Stop table values");
    info!("  POST /ev                        - EV100 of a triple");
    axum::serve(listener, router).await?;
    Ok(())
}
