use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hhmap_core::BoundingBox;

use crate::middleware::RequestId;
use crate::viewport::ViewportParams;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct MarkerItem {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct MarkersQuery {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    zoom: i32,
}

/// One marker request is one viewport event: refresh the venue snapshot from
/// the store, run it through the declutter controller, and return the
/// bounded marker set.
pub(super) async fn list_markers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarkersQuery>,
) -> Result<Json<ApiResponse<Vec<MarkerItem>>>, ApiError> {
    let bounds = BoundingBox {
        south: query.south,
        west: query.west,
        north: query.north,
        east: query.east,
    };
    if !bounds.is_valid() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "viewport bounds must be finite with south < north and west < east",
        ));
    }

    let rows = hhmap_db::list_venues(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let venues = rows
        .into_iter()
        .map(hhmap_db::VenueRow::into_domain)
        .collect();

    state.viewport.replace_venues(venues).await;
    let visible = state
        .viewport
        .update_viewport(ViewportParams {
            bounds,
            zoom: query.zoom,
        })
        .await;

    let data = visible
        .iter()
        .filter_map(|venue| {
            // Declutter output always carries coordinates; the filter_map is
            // just the typed way to unwrap them.
            venue.coordinates.map(|point| MarkerItem {
                id: venue.id,
                name: venue.name.clone(),
                latitude: point.lat,
                longitude: point.lng,
            })
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
