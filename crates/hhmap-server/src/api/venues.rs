use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hhmap_core::deals::{curate, partition_food, NO_DEALS_SENTINEL};
use hhmap_core::geo::{distance_km, Coordinates};
use hhmap_core::rank::{is_currently_active, rank_by_distance};
use hhmap_core::schedule::{consolidate, format_schedule};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct VenueSummaryItem {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScheduleLineItem {
    pub days: String,
    pub times: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DealItem {
    pub name: String,
    pub price: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct VenueDetailItem {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub schedule_lines: Vec<ScheduleLineItem>,
    pub schedule_text: String,
    pub food_deals: Vec<DealItem>,
    pub drink_deals: Vec<DealItem>,
    /// Display sentinel, set when curation leaves nothing to show.
    pub deals_note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyVenueItem {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub currently_active: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: f64,
    lng: f64,
    limit: Option<i64>,
    open_now: Option<bool>,
}

pub(super) async fn list_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<VenueSummaryItem>>>, ApiError> {
    let rows = hhmap_db::list_venues(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| VenueSummaryItem {
            id: row.id,
            name: row.name,
            latitude: row.latitude.as_ref().and_then(ToPrimitive::to_f64),
            longitude: row.longitude.as_ref().and_then(ToPrimitive::to_f64),
            address: row.address,
            website: row.website,
            image_url: row.image_url,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_venue_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VenueDetailItem>>, ApiError> {
    let row = hhmap_db::get_venue(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let latitude = row.latitude.as_ref().and_then(ToPrimitive::to_f64);
    let longitude = row.longitude.as_ref().and_then(ToPrimitive::to_f64);
    let address = row.address.clone();
    let website = row.website.clone();
    let phone_number = row.phone_number.clone();
    let description = row.description.clone();
    let image_url = row.image_url.clone();
    let venue = row.into_domain();

    let schedule_lines = consolidate(&venue.schedule)
        .into_iter()
        .map(|line| ScheduleLineItem {
            days: line.days_label,
            times: line.times_label,
        })
        .collect();
    let schedule_text = format_schedule(&venue.schedule);

    let curated = curate(&venue.deals);
    let deals_note = curated.is_empty().then_some(NO_DEALS_SENTINEL);
    let (food, drinks) = partition_food(&curated);

    let data = VenueDetailItem {
        id: venue.id,
        name: venue.name,
        latitude,
        longitude,
        address,
        website,
        phone_number,
        description,
        image_url,
        schedule_lines,
        schedule_text,
        food_deals: food.into_iter().map(deal_item).collect(),
        drink_deals: drinks.into_iter().map(deal_item).collect(),
        deals_note,
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_nearby_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyVenueItem>>>, ApiError> {
    if !query.lat.is_finite() || !query.lng.is_finite() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "lat and lng must be finite coordinates",
        ));
    }
    let reference = Coordinates {
        lat: query.lat,
        lng: query.lng,
    };
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let limit = normalize_limit(query.limit) as usize;

    let rows = hhmap_db::list_venues(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let venues: Vec<hhmap_core::Venue> = rows.into_iter().map(hhmap_db::VenueRow::into_domain).collect();

    let now = Utc::now();
    let now_day = now.format("%A").to_string();
    let now_minutes = now.hour() * 60 + now.minute();

    let ranked = rank_by_distance(&venues, reference);
    let data = ranked
        .into_iter()
        .filter(|venue| {
            !query.open_now.unwrap_or(false)
                || is_currently_active(venue, &now_day, now_minutes)
        })
        .take(limit)
        .map(|venue| NearbyVenueItem {
            id: venue.id,
            currently_active: is_currently_active(&venue, &now_day, now_minutes),
            distance_km: venue
                .coordinates
                .map(|point| distance_km(point, reference)),
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

fn deal_item(deal: hhmap_core::DealEntry) -> DealItem {
    DealItem {
        name: deal.name,
        price: deal.price,
        category: deal.category,
    }
}
