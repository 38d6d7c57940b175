use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hhmap_core::deals::curate;
use hhmap_core::geo::{distance_km, Coordinates};
use hhmap_core::rank::select_context;
use hhmap_core::schedule::format_schedule;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ContextDealItem {
    pub name: String,
    pub price: String,
    pub category: Option<String>,
}

/// One venue prepared as assistant prompt context: the schedule already
/// rendered and the deals already curated, so the assistant integration
/// never touches raw store JSON.
#[derive(Debug, Serialize)]
pub(super) struct ContextVenueItem {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub schedule: String,
    pub deals: Vec<ContextDealItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContextQuery {
    #[serde(default)]
    q: String,
    lat: Option<f64>,
    lng: Option<f64>,
}

pub(super) async fn get_assistant_context(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<ApiResponse<Vec<ContextVenueItem>>>, ApiError> {
    let reference = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            Some(Coordinates { lat, lng })
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "lat and lng must be finite coordinates",
            ));
        }
        _ => None,
    };

    let rows = hhmap_db::list_venues(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let venues: Vec<hhmap_core::Venue> = rows
        .into_iter()
        .map(hhmap_db::VenueRow::into_domain)
        .collect();

    let now = Utc::now();
    let now_day = now.format("%A").to_string();
    let now_minutes = now.hour() * 60 + now.minute();

    let mut rng = rand::rng();
    let context = select_context(
        &venues,
        &query.q,
        reference,
        &now_day,
        now_minutes,
        &mut rng,
    );

    let data = context
        .into_iter()
        .map(|venue| ContextVenueItem {
            id: venue.id,
            schedule: format_schedule(&venue.schedule),
            deals: curate(&venue.deals)
                .into_iter()
                .map(|deal| ContextDealItem {
                    name: deal.name,
                    price: deal.price,
                    category: deal.category,
                })
                .collect(),
            distance_km: reference.and_then(|point| {
                venue.coordinates.map(|venue_point| distance_km(venue_point, point))
            }),
            latitude: venue.coordinates.map(|point| point.lat),
            longitude: venue.coordinates.map(|point| point.lng),
            name: venue.name,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
