//! Latest hydrological readings (river flow, reservoir capacity)

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::ItemsResponse;
use crate::db::HydroRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidQuery;
use crate::http::server::AppState;
use crate::models::LatestParams;

/// GET /hydro/latest?limit=&station=
async fn latest_hydro(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<LatestParams>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let limit = params.limit();
    let station = params.station()?;

    let mut conn = state.pool.acquire().await?;
    let items = HydroRepo::new(&mut conn)
        .latest(limit, station.as_ref())
        .await?;
    state.pool.release(conn);

    tracing::debug!(count = items.len(), limit = limit.get(), "latest hydro readings");
    Ok(Json(ItemsResponse::new(items)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/hydro/latest", get(latest_hydro))
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::{get, json_body, unreachable_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn legacy_codi_parameter_is_validated_like_station() {
        let uri = format!("/hydro/latest?codi={}", "y".repeat(80));
        let response = get(unreachable_app(), &uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn codi_and_station_together_get_a_json_400() {
        let response = get(unreachable_app(), "/hydro/latest?codi=E001&station=E002").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");
    }
}
