//! Latest meteorological readings

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::ItemsResponse;
use crate::db::MeasurementRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidQuery;
use crate::http::server::AppState;
use crate::models::LatestParams;

/// GET /measurements/latest?limit=&station=
async fn latest_measurements(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<LatestParams>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let limit = params.limit();
    let station = params.station()?;

    let mut conn = state.pool.acquire().await?;
    let items = MeasurementRepo::new(&mut conn)
        .latest(limit, station.as_ref())
        .await?;
    state.pool.release(conn);

    tracing::debug!(count = items.len(), limit = limit.get(), "latest measurements");
    Ok(Json(ItemsResponse::new(items)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/measurements/latest", get(latest_measurements))
}
