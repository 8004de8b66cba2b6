//! Health check endpoint
//!
//! Always answers 200. A failing database degrades `db` to `"down"`
//! and reports the error instead of failing the request.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::db::probe;
use crate::db::row::format_instant;
use crate::db::PoolStats;
use crate::http::server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbStatus {
    Ok,
    Down,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub db: DbStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub time: String,
    pub version: &'static str,
    pub pool: PoolStats,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (db, error) = match probe::ping(&state.pool).await {
        Ok(()) => (DbStatus::Ok, None),
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            (DbStatus::Down, Some(e.to_string()))
        }
    };

    Json(HealthResponse {
        ok: true,
        db,
        error,
        time: format_instant(Utc::now()),
        version: env!("CARGO_PKG_VERSION"),
        pool: state.pool.stats(),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
