//! Venue import from a JSON file.
//!
//! The file is a JSON array of venue records in the store's shape. Venue
//! fields are validated here only as far as the store requires (a name);
//! `time_frames` and `deals` stay raw JSON — the lenient intake parsers deal
//! with their contents at read time, so a half-broken scrape still imports.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use hhmap_db::NewVenue;

#[derive(Debug, Deserialize)]
struct ImportVenue {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default = "empty_array")]
    time_frames: serde_json::Value,
    #[serde(default = "empty_array")]
    deals: serde_json::Value,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

fn empty_array() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

fn into_new_venue(record: ImportVenue) -> NewVenue {
    NewVenue {
        id: record.id,
        name: record.name,
        address: record.address,
        latitude: record.latitude,
        longitude: record.longitude,
        time_frames: record.time_frames,
        deals: record.deals,
        website: record.website,
        phone_number: record.phone_number,
        description: record.description,
        image_url: record.image_url,
    }
}

pub(crate) async fn run_import(pool: &PgPool, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<ImportVenue> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} as a venue array", path.display()))?;

    let with_coordinates = records
        .iter()
        .filter(|r| r.latitude.is_some() && r.longitude.is_some())
        .count();
    tracing::info!(
        total = records.len(),
        with_coordinates,
        "parsed venue import file"
    );

    if dry_run {
        println!(
            "dry run: {} venues parsed ({} with coordinates), nothing written",
            records.len(),
            with_coordinates
        );
        return Ok(());
    }

    let venues: Vec<NewVenue> = records.into_iter().map(into_new_venue).collect();
    let (new_count, updated_count) = hhmap_db::upsert_venues(pool, &venues).await?;
    let total = hhmap_db::count_venues(pool).await?;
    println!("imported {new_count} new venues, updated {updated_count}; store now has {total}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_record_parses_with_minimal_fields() {
        let record: ImportVenue =
            serde_json::from_str(r#"{ "name": "Bar Min" }"#).expect("parses");
        assert_eq!(record.name, "Bar Min");
        assert!(record.id.is_none());
        assert!(record.latitude.is_none());
        assert_eq!(record.time_frames, serde_json::json!([]));
    }

    #[test]
    fn import_record_keeps_raw_schedule_and_deals() {
        let record: ImportVenue = serde_json::from_str(
            r#"{
                "name": "Bar Full",
                "latitude": 30.2672,
                "longitude": -97.7431,
                "time_frames": [{ "day": "Friday", "start_time": "16:00", "end_time": "18:00" }],
                "deals": [{ "name": "Pints", "price": "$4" }, { "junk": true }]
            }"#,
        )
        .expect("parses");

        // Raw JSON passes through untouched; leniency lives in the readers.
        let new_venue = into_new_venue(record);
        assert_eq!(new_venue.time_frames.as_array().map(Vec::len), Some(1));
        assert_eq!(new_venue.deals.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        let result: Result<ImportVenue, _> = serde_json::from_str(r#"{ "latitude": 30.0 }"#);
        assert!(result.is_err());
    }
}
