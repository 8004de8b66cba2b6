//! Liveness endpoint that does not touch the database

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub msg: &'static str,
}

/// GET /api/ping
async fn ping() -> Json<PingResponse> {
    Json(PingResponse { ok: true, msg: "pong" })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/ping", get(ping))
}
