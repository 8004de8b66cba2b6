//! Route handlers organized by resource

pub mod health;
pub mod hydro;
pub mod measurements;
pub mod ping;

use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use super::server::AppState;
use crate::db::row::RowObject;

/// `{"ok": true, "items": [...]}`
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub ok: bool,
    pub items: Vec<RowObject>,
}

impl ItemsResponse {
    pub fn new(items: Vec<RowObject>) -> Self {
        Self { ok: true, items }
    }
}

/// Latest-readings routes, mounted at the root and under `/api/v1`.
pub fn readings_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(measurements::router())
        .merge(hydro::router())
}
