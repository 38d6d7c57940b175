//! Viewport declutter: bounded marker selection via grid bucketing.
//!
//! Below the detail zoom threshold, in-bounds venues are bucketed into a
//! zoom-dependent grid and only the first venue per occupied cell survives
//! (first-wins, not nearest-to-cell-center — O(n) and good enough for a
//! marker layer). At detail zoom, everything in view is shown up to a hard
//! cap. Each pass recomputes from scratch; nothing is incrementally mutated.

use std::collections::HashSet;

use crate::geo::BoundingBox;
use crate::venue::Venue;

/// Zoom at or above which grid bucketing is skipped and the raw in-bounds
/// set is shown.
pub const DETAIL_ZOOM: i32 = 16;

/// Marker cap at detail zoom. The cap takes a stable prefix of the filtered
/// input order; no spatial fairness is attempted.
pub const DETAIL_MAX_MARKERS: usize = 300;

/// Grid cell size in degrees for the zoom tier.
fn cell_size(zoom: i32) -> f64 {
    if zoom <= 12 {
        0.006
    } else if zoom <= 14 {
        0.003
    } else {
        0.0015
    }
}

/// Marker cap for the zoom tier.
fn tier_cap(zoom: i32) -> usize {
    if zoom <= 12 {
        100
    } else if zoom <= 14 {
        150
    } else {
        200
    }
}

/// Selects the subset of venues to render as markers for the given viewport.
///
/// Guarantees: output is a subset of the input, every venue has coordinates
/// inside `bounds`, at most one venue per occupied grid cell below
/// [`DETAIL_ZOOM`], and the size never exceeds the applicable cap. Venues
/// without coordinates are silently excluded. Selection is stable only for a
/// fixed input order — re-ranking the input can swap which venue represents
/// a cell.
#[must_use]
pub fn select_visible(venues: &[Venue], bounds: &BoundingBox, zoom: i32) -> Vec<Venue> {
    let in_bounds: Vec<&Venue> = venues
        .iter()
        .filter(|venue| {
            venue
                .coordinates
                .is_some_and(|point| bounds.contains(point))
        })
        .collect();

    if zoom >= DETAIL_ZOOM {
        return in_bounds
            .into_iter()
            .take(DETAIL_MAX_MARKERS)
            .cloned()
            .collect();
    }

    let cell = cell_size(zoom);
    let mut occupied: HashSet<(i64, i64)> = HashSet::new();
    let mut selected: Vec<Venue> = Vec::new();

    for venue in in_bounds {
        // In-bounds filter above guarantees coordinates are present.
        let Some(point) = venue.coordinates else {
            continue;
        };
        #[allow(clippy::cast_possible_truncation)]
        let key = (
            (point.lng / cell).floor() as i64,
            (point.lat / cell).floor() as i64,
        );
        if occupied.insert(key) {
            selected.push(venue.clone());
        }
    }

    selected.truncate(tier_cap(zoom));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use uuid::Uuid;

    fn venue(lat: f64, lng: f64) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            name: format!("venue {lat},{lng}"),
            coordinates: Some(Coordinates { lat, lng }),
            schedule: Vec::new(),
            deals: Vec::new(),
        }
    }

    fn venue_without_coordinates() -> Venue {
        Venue {
            id: Uuid::new_v4(),
            name: "nowhere".to_string(),
            coordinates: None,
            schedule: Vec::new(),
            deals: Vec::new(),
        }
    }

    fn austin_bounds() -> BoundingBox {
        BoundingBox {
            south: 30.05,
            west: -98.05,
            north: 30.55,
            east: -97.45,
        }
    }

    #[test]
    fn excludes_out_of_bounds_and_coordinate_free_venues() {
        let venues = vec![
            venue(30.27, -97.74),
            venue(45.0, -97.74),
            venue_without_coordinates(),
        ];
        let visible = select_visible(&venues, &austin_bounds(), 12);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "venue 30.27,-97.74");
    }

    #[test]
    fn detail_zoom_shows_everything_up_to_cap() {
        // 40 venues spread 0.0001 degrees apart: far denser than the finest
        // grid, but at detail zoom they all render.
        let venues: Vec<Venue> = (0..40)
            .map(|i| venue(30.27 + f64::from(i) * 0.0001, -97.74))
            .collect();
        let visible = select_visible(&venues, &austin_bounds(), 16);
        assert_eq!(visible.len(), 40);
    }

    #[test]
    fn detail_zoom_caps_at_300_stable_prefix() {
        let venues: Vec<Venue> = (0..350)
            .map(|i| venue(30.10 + f64::from(i) * 0.001, -97.74))
            .collect();
        let visible = select_visible(&venues, &austin_bounds(), 17);
        assert_eq!(visible.len(), DETAIL_MAX_MARKERS);
        assert_eq!(visible[0].id, venues[0].id);
        assert_eq!(visible[299].id, venues[299].id);
    }

    #[test]
    fn low_zoom_merges_venues_sharing_a_cell() {
        // 0.001 degrees apart: inside one 0.006-degree cell at zoom <= 12.
        let venues = vec![venue(30.2701, -97.7401), venue(30.2704, -97.7404)];
        let visible = select_visible(&venues, &austin_bounds(), 11);
        assert_eq!(visible.len(), 1);
        // First-wins.
        assert_eq!(visible[0].id, venues[0].id);
    }

    #[test]
    fn low_zoom_keeps_venues_in_distinct_cells() {
        // Separation of ~0.13 degrees latitude dwarfs the 0.006-degree cell
        // used at zoom 10, so both survive bucketing.
        let venues = vec![venue(30.27, -97.74), venue(30.40, -97.70)];
        let visible = select_visible(&venues, &austin_bounds(), 10);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn grid_tier_caps_are_enforced() {
        // One venue per cell: 0.01-degree spacing exceeds every cell size.
        let venues: Vec<Venue> = (0..250)
            .map(|i| {
                let i = f64::from(i);
                venue(30.06 + (i % 40.0) * 0.01, -98.0 + (i / 40.0).floor() * 0.01)
            })
            .collect();

        assert_eq!(select_visible(&venues, &austin_bounds(), 12).len(), 100);
        assert_eq!(select_visible(&venues, &austin_bounds(), 14).len(), 150);
        assert_eq!(select_visible(&venues, &austin_bounds(), 15).len(), 200);
    }

    #[test]
    fn output_is_subset_within_bounds() {
        let bounds = austin_bounds();
        let venues: Vec<Venue> = (0..50)
            .map(|i| venue(30.0 + f64::from(i) * 0.02, -97.8))
            .collect();
        for zoom in [8, 12, 13, 14, 15, 16, 18] {
            let visible = select_visible(&venues, &bounds, zoom);
            for v in &visible {
                let point = v.coordinates.expect("visible venues have coordinates");
                assert!(bounds.contains(point));
                assert!(venues.iter().any(|orig| orig.id == v.id));
            }
        }
    }
}
