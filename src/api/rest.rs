// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and return JSON.  There is no
// authentication: the server only exposes read-only analysis.
//
// CORS is configured permissively so a browser dashboard on another origin
// can call the API.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::types::Period;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/periods", get(periods))
        .route("/api/v1/analyze", get(analyze))
        .route("/api/v1/recent", get(recent))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    analyses_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        analyses_served: state.analyses_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Periods
// =============================================================================

async fn periods(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "periods": Period::ALL,
        "default": state.config.default_period,
    }))
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeQuery {
    symbol: String,
    #[serde(default)]
    period: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> impl IntoResponse {
    let period = match query.period.as_deref() {
        None | Some("") => state.config.default_period,
        Some(raw) => match raw.parse::<Period>() {
            Ok(p) => p,
            Err(e) => {
                warn!(period = raw, "rejected analyze request");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response();
            }
        },
    };

    info!(symbol = %query.symbol, period = %period, "analyze request");
    let report = state.run_analysis(&query.symbol, period).await;
    Json(report).into_response()
}

// =============================================================================
// Recent analyses
// =============================================================================

async fn recent(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent())
}
