//! Database operations for the `venues` table.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use hhmap_core::geo::Coordinates;
use hhmap_core::venue::{parse_deals, parse_schedule};
use hhmap_core::Venue;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Input record for inserting/upserting a venue (CLI import).
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub id: Option<Uuid>,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_frames: serde_json::Value,
    pub deals: serde_json::Value,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A row from the `venues` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueRow {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub time_frames: serde_json::Value,
    pub deals: serde_json::Value,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl VenueRow {
    /// Converts the stored row into the core domain type.
    ///
    /// Either coordinate missing yields a venue without coordinates, which
    /// the spatial code excludes. `time_frames` and `deals` JSONB go through
    /// the lenient intake parsers — malformed elements drop silently.
    #[must_use]
    pub fn into_domain(self) -> Venue {
        let coordinates = match (
            self.latitude.as_ref().and_then(Decimal::to_f64),
            self.longitude.as_ref().and_then(Decimal::to_f64),
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };

        Venue {
            id: self.id,
            name: self.name,
            coordinates,
            schedule: parse_schedule(&self.time_frames),
            deals: parse_deals(&self.deals),
        }
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

/// Fetch all venues, oldest first.
///
/// The whole table is the working set — venue counts are bounded in the
/// thousands — so there is no pagination on this path.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_venues(pool: &PgPool) -> Result<Vec<VenueRow>, sqlx::Error> {
    sqlx::query_as::<_, VenueRow>(
        "SELECT id, name, address, latitude, longitude, time_frames, deals, \
                website, phone_number, description, image_url, created_at, updated_at \
         FROM venues \
         ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await
}

/// Fetch one venue by id.
///
/// # Errors
///
/// Returns [`sqlx::Error::RowNotFound`] if no venue has that id.
pub async fn get_venue(pool: &PgPool, id: Uuid) -> Result<VenueRow, sqlx::Error> {
    sqlx::query_as::<_, VenueRow>(
        "SELECT id, name, address, latitude, longitude, time_frames, deals, \
                website, phone_number, description, image_url, created_at, updated_at \
         FROM venues \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Count venues.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_venues(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

/// Insert venues, updating mutable fields for ids that already exist.
///
/// Returns `(new_count, updated_count)`. Records without an id get one
/// generated here so the import file does not have to carry them.
///
/// Latitude and longitude are bound as `Option<f64>` and cast to
/// `NUMERIC(10,7)` inside the SQL statement so the database engine performs
/// the type coercion consistently.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if any query fails.
pub async fn upsert_venues(
    pool: &PgPool,
    venues: &[NewVenue],
) -> Result<(u64, u64), sqlx::Error> {
    let mut new_count: u64 = 0;
    let mut updated_count: u64 = 0;

    for venue in venues {
        let id = venue.id.unwrap_or_else(Uuid::new_v4);

        let is_new: bool = sqlx::query_scalar::<_, bool>(
            "INSERT INTO venues \
                 (id, name, address, latitude, longitude, time_frames, deals, \
                  website, phone_number, description, image_url) \
             VALUES ($1, $2, $3, $4::NUMERIC(10,7), $5::NUMERIC(10,7), $6::JSONB, $7::JSONB, \
                     $8, $9, $10, $11) \
             ON CONFLICT (id) DO UPDATE SET \
                 updated_at   = NOW(), \
                 name         = EXCLUDED.name, \
                 address      = EXCLUDED.address, \
                 latitude     = EXCLUDED.latitude, \
                 longitude    = EXCLUDED.longitude, \
                 time_frames  = EXCLUDED.time_frames, \
                 deals        = EXCLUDED.deals, \
                 website      = EXCLUDED.website, \
                 phone_number = EXCLUDED.phone_number, \
                 description  = EXCLUDED.description, \
                 image_url    = EXCLUDED.image_url \
             RETURNING (xmax = 0) AS is_new",
        )
        .bind(id)
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(venue.latitude)
        .bind(venue.longitude)
        .bind(&venue.time_frames)
        .bind(&venue.deals)
        .bind(&venue.website)
        .bind(&venue.phone_number)
        .bind(&venue.description)
        .bind(&venue.image_url)
        .fetch_one(pool)
        .await?;

        if is_new {
            new_count += 1;
        } else {
            updated_count += 1;
        }
    }

    Ok((new_count, updated_count))
}
