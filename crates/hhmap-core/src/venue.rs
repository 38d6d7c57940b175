//! Venue domain types and lenient intake from raw store JSON.
//!
//! Upstream schedule and deal data is scraped and noisy; intake maps invalid
//! shapes to a drop-silently policy rather than a parse error. A venue record
//! always comes through — at worst with an empty schedule or deal list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::geo::Coordinates;

/// A point-of-interest venue as consumed by the declutter and ranking code.
///
/// Venues missing coordinates are carried (they still have a detail view)
/// but never appear in declutter or ranking output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub schedule: Vec<ScheduleEntry>,
    pub deals: Vec<DealEntry>,
}

/// One recurring weekly time window. All three fields are required; raw
/// entries missing any of them are dropped at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub start: String,
    pub end: String,
}

/// One priced offer. `name` and `price` are required at intake; `category`
/// is free-form ("Food" is the only value display layers treat specially).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealEntry {
    pub name: String,
    pub price: String,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTimeFrame {
    #[serde(default)]
    day: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDeal {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Parses the raw `time_frames` JSON array into validated entries.
///
/// Non-array input, non-object elements, and elements missing or blanking
/// any of `day`/`start_time`/`end_time` are dropped without error.
#[must_use]
pub fn parse_schedule(raw: &Value) -> Vec<ScheduleEntry> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<RawTimeFrame>(item.clone()).ok())
        .filter_map(|frame| {
            let day = non_blank(frame.day)?;
            let start = non_blank(frame.start_time)?;
            let end = non_blank(frame.end_time)?;
            Some(ScheduleEntry { day, start, end })
        })
        .collect()
}

/// Parses the raw `deals` JSON array into validated entries.
///
/// Elements missing or blanking `name` or `price` are dropped without error.
#[must_use]
pub fn parse_deals(raw: &Value) -> Vec<DealEntry> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<RawDeal>(item.clone()).ok())
        .filter_map(|deal| {
            let name = non_blank(deal.name)?;
            let price = non_blank(deal.price)?;
            Some(DealEntry {
                name,
                price,
                category: non_blank(deal.category),
            })
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_schedule_keeps_complete_entries() {
        let raw = json!([
            { "day": "Monday", "start_time": "16:00", "end_time": "18:00" },
            { "day": "Friday", "start_time": "15:00", "end_time": "19:00" },
        ]);
        let entries = parse_schedule(&raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].day, "Monday");
        assert_eq!(entries[1].end, "19:00");
    }

    #[test]
    fn parse_schedule_drops_incomplete_entries() {
        let raw = json!([
            { "day": "Monday", "start_time": "16:00" },
            { "day": null, "start_time": "16:00", "end_time": "18:00" },
            { "day": "  ", "start_time": "16:00", "end_time": "18:00" },
            { "start_time": "16:00", "end_time": "18:00" },
            { "day": "Friday", "start_time": "15:00", "end_time": "19:00" },
        ]);
        let entries = parse_schedule(&raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].day, "Friday");
    }

    #[test]
    fn parse_schedule_tolerates_non_array_and_junk_elements() {
        assert!(parse_schedule(&json!(null)).is_empty());
        assert!(parse_schedule(&json!("not an array")).is_empty());
        assert!(parse_schedule(&json!([42, "junk", []])).is_empty());
    }

    #[test]
    fn parse_deals_drops_missing_name_or_price() {
        let raw = json!([
            { "name": "House Margarita", "price": "$6" },
            { "name": "Well Drinks", "price": null },
            { "price": "$4" },
            { "name": "Queso", "price": "$5", "category": "Food" },
        ]);
        let deals = parse_deals(&raw);
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].name, "House Margarita");
        assert_eq!(deals[0].category, None);
        assert_eq!(deals[1].category.as_deref(), Some("Food"));
    }

    #[test]
    fn parse_deals_non_array_yields_empty() {
        assert!(parse_deals(&json!({"name": "x", "price": "$1"})).is_empty());
    }
}
