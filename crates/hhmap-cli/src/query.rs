//! Read-side commands: nearby ranking and schedule display.

use chrono::{Timelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hhmap_core::deals::{curate, partition_food, NO_DEALS_SENTINEL};
use hhmap_core::geo::{distance_km, Coordinates};
use hhmap_core::rank::{is_currently_active, rank_by_distance};
use hhmap_core::schedule::format_schedule;
use hhmap_core::Venue;

pub(crate) async fn run_nearby(
    pool: &PgPool,
    lat: f64,
    lng: f64,
    limit: Option<i64>,
    open_now: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        lat.is_finite() && lng.is_finite(),
        "lat and lng must be finite coordinates"
    );
    let reference = Coordinates { lat, lng };
    let limit = usize::try_from(limit.unwrap_or(20).clamp(1, 200))?;

    let rows = hhmap_db::list_venues(pool).await?;
    let venues: Vec<Venue> = rows
        .into_iter()
        .map(hhmap_db::VenueRow::into_domain)
        .collect();

    let (now_day, now_minutes) = local_day_and_minutes();
    let ranked = rank_by_distance(&venues, reference);

    let mut printed = 0usize;
    for venue in ranked {
        if open_now && !is_currently_active(&venue, &now_day, now_minutes) {
            continue;
        }
        match venue.coordinates {
            Some(point) => println!(
                "{:>7.2} km  {}{}",
                distance_km(point, reference),
                venue.name,
                if is_currently_active(&venue, &now_day, now_minutes) {
                    "  [open now]"
                } else {
                    ""
                }
            ),
            None => println!("      ? km  {}", venue.name),
        }
        printed += 1;
        if printed >= limit {
            break;
        }
    }

    if printed == 0 {
        println!("no venues matched");
    }
    Ok(())
}

pub(crate) async fn run_schedule(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    let row = hhmap_db::get_venue(pool, id).await?;
    let venue = row.into_domain();

    println!("{}", venue.name);
    println!("{}", format_schedule(&venue.schedule));

    let curated = curate(&venue.deals);
    if curated.is_empty() {
        println!("{NO_DEALS_SENTINEL}");
        return Ok(());
    }

    let (food, drinks) = partition_food(&curated);
    if !drinks.is_empty() {
        println!("Drinks:");
        for deal in &drinks {
            println!("  {} — {}", deal.name, deal.price);
        }
    }
    if !food.is_empty() {
        println!("Food:");
        for deal in &food {
            println!("  {} — {}", deal.name, deal.price);
        }
    }
    Ok(())
}

fn local_day_and_minutes() -> (String, u32) {
    let now = Utc::now();
    (now.format("%A").to_string(), now.hour() * 60 + now.minute())
}
