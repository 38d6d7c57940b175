//! Proximity ranking, open-now checks, and assistant context selection.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

use crate::geo::{distance_km, Coordinates};
use crate::schedule::parse_time_minutes;
use crate::venue::Venue;

/// Hard cap on the venue subset handed to the assistant.
pub const CONTEXT_MAX: usize = 20;

/// Minimum context size; smaller filtered sets are padded by random
/// sampling from the remaining venues.
pub const CONTEXT_MIN: usize = 10;

const LOCATION_KEYWORDS: &[&str] = &[
    "near", "nearby", "close", "closest", "around", "walking", "distance",
];
const TIME_KEYWORDS: &[&str] = &["now", "tonight", "open", "today", "currently", "late"];
const FOOD_DRINK_KEYWORDS: &[&str] = &[
    "food",
    "eat",
    "pizza",
    "taco",
    "burger",
    "wings",
    "appetizer",
    "snack",
    "drink",
    "beer",
    "wine",
    "cocktail",
    "margarita",
    "whiskey",
    "tequila",
];

/// Sorts venues ascending by distance from `reference`.
///
/// Venues without coordinates are treated as infinitely far and sort after
/// every venue that has them; ties and the coordinate-free tail keep input
/// order (stable sort).
#[must_use]
pub fn rank_by_distance(venues: &[Venue], reference: Coordinates) -> Vec<Venue> {
    let mut keyed: Vec<(f64, &Venue)> = venues
        .iter()
        .map(|venue| {
            let distance = venue
                .coordinates
                .map_or(f64::INFINITY, |point| distance_km(point, reference));
            (distance, venue)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, venue)| venue.clone()).collect()
}

/// True if any schedule entry covers `now`: the day matches and
/// `now_minutes` falls within `[start, end]` inclusive.
///
/// Times parse via [`parse_time_minutes`], so a malformed start or end reads
/// as midnight — the documented leniency for noisy upstream data.
#[must_use]
pub fn is_currently_active(venue: &Venue, now_day: &str, now_minutes: u32) -> bool {
    venue.schedule.iter().any(|entry| {
        entry.day == now_day && {
            let start = parse_time_minutes(&entry.start);
            let end = parse_time_minutes(&entry.end);
            now_minutes >= start && now_minutes <= end
        }
    })
}

/// Selects the venue subset handed to the conversational assistant.
///
/// Keyword intent narrows the candidates: a time intent ("open now",
/// "tonight") keeps currently-active venues, a food/drink keyword keeps
/// venues with a matching deal, a location intent ("near me") ranks by
/// distance. When no intent matches or the narrowed set comes up empty, the
/// fallback is plain distance ranking (input order if no reference point is
/// available). Output is capped at [`CONTEXT_MAX`] and padded up to
/// [`CONTEXT_MIN`] by random sampling from the venues not already selected.
#[must_use]
pub fn select_context<R: Rng + ?Sized>(
    venues: &[Venue],
    query: &str,
    reference: Option<Coordinates>,
    now_day: &str,
    now_minutes: u32,
    rng: &mut R,
) -> Vec<Venue> {
    let lower = query.to_lowercase();

    let time_intent = TIME_KEYWORDS.iter().any(|k| lower.contains(k));
    let menu_keywords: Vec<&str> = FOOD_DRINK_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect();
    let location_intent = LOCATION_KEYWORDS.iter().any(|k| lower.contains(k));

    let mut selected: Vec<Venue> = if time_intent {
        venues
            .iter()
            .filter(|venue| is_currently_active(venue, now_day, now_minutes))
            .cloned()
            .collect()
    } else if !menu_keywords.is_empty() {
        venues
            .iter()
            .filter(|venue| {
                venue.deals.iter().any(|deal| {
                    let name = deal.name.to_lowercase();
                    let category = deal.category.as_deref().unwrap_or("").to_lowercase();
                    menu_keywords
                        .iter()
                        .any(|k| name.contains(k) || category.contains(k))
                })
            })
            .cloned()
            .collect()
    } else if location_intent {
        match reference {
            Some(point) => rank_by_distance(venues, point),
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    if selected.is_empty() {
        selected = match reference {
            Some(point) => rank_by_distance(venues, point),
            None => venues.to_vec(),
        };
    }

    selected.truncate(CONTEXT_MAX);

    if selected.len() < CONTEXT_MIN {
        let chosen: HashSet<Uuid> = selected.iter().map(|venue| venue.id).collect();
        let remaining: Vec<&Venue> = venues
            .iter()
            .filter(|venue| !chosen.contains(&venue.id))
            .collect();
        let padding = remaining.choose_multiple(rng, CONTEXT_MIN - selected.len());
        selected.extend(padding.map(|venue| (*venue).clone()));
    }

    selected
}
