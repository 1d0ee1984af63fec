//! Proximity search handler

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::super::types::{ApiResult, ok};
use crate::proximity::{NearbyFarm, RadiusQuery};

/// Farms within `radius` km of (`lat`, `lon`), closest first
#[utoipa::path(
    get,
    path = "/radius",
    params(
        ("lat" = f64, Query, description = "Latitude, -90..=90"),
        ("lon" = f64, Query, description = "Longitude, -180..=180"),
        ("radius" = f64, Query, description = "Radius in kilometres, >= 0")
    ),
    responses(
        (status = 200, description = "Farms found within radius", body = [NearbyFarm]),
        (status = 400, description = "Missing or out-of-range parameter", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "No farm within radius", body = crate::gateway::error::ErrorBody)
    ),
    tag = "Search"
)]
pub async fn search_radius(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<NearbyFarm>> {
    let query = RadiusQuery::parse(
        params.get("lat").map(String::as_str),
        params.get("lon").map(String::as_str),
        params.get("radius").map(String::as_str),
    )?;

    let rows = state.locator.within(&query).await?;
    if rows.is_empty() {
        return ApiError::not_found("No farms found within the given radius").into_err();
    }
    ok(
        "Farms found within radius",
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| NearbyFarm::new(i, row))
            .collect(),
    )
}
