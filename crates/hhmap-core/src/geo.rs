//! Great-circle distance and viewport geometry.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the map in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Haversine distance between two points in kilometers.
///
/// Identical points return exactly 0. NaN inputs propagate NaN; callers are
/// expected to exclude venues without valid coordinates before ranking.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Geographic bounding box as delivered by the map view: `{south, west,
/// north, east}` in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// All edges finite and south/west strictly below north/east.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite()
            && self.south < self.north
            && self.west < self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_identical_points_is_zero() {
        let p = Coordinates {
            lat: 30.2672,
            lng: -97.7431,
        };
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_downtown_austin_to_domain() {
        // Texas Capitol to the Domain is roughly 13-14 km as the crow flies.
        let capitol = Coordinates {
            lat: 30.2747,
            lng: -97.7404,
        };
        let domain = Coordinates {
            lat: 30.4019,
            lng: -97.7252,
        };
        let d = distance_km(capitol, domain);
        assert!(d > 13.0 && d < 15.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates {
            lat: 30.25,
            lng: -97.75,
        };
        let b = Coordinates {
            lat: 30.40,
            lng: -97.70,
        };
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn bounds_contains_edges_inclusive() {
        let bounds = BoundingBox {
            south: 30.0,
            west: -98.0,
            north: 30.5,
            east: -97.5,
        };
        assert!(bounds.contains(Coordinates {
            lat: 30.0,
            lng: -98.0
        }));
        assert!(bounds.contains(Coordinates {
            lat: 30.5,
            lng: -97.5
        }));
        assert!(!bounds.contains(Coordinates {
            lat: 29.99,
            lng: -97.75
        }));
        assert!(!bounds.contains(Coordinates {
            lat: 30.25,
            lng: -97.49
        }));
    }

    #[test]
    fn bounds_validity() {
        let good = BoundingBox {
            south: 30.0,
            west: -98.0,
            north: 30.5,
            east: -97.5,
        };
        assert!(good.is_valid());

        let inverted = BoundingBox {
            south: 30.5,
            west: -98.0,
            north: 30.0,
            east: -97.5,
        };
        assert!(!inverted.is_valid());

        let nan = BoundingBox {
            south: f64::NAN,
            west: -98.0,
            north: 30.5,
            east: -97.5,
        };
        assert!(!nan.is_valid());
    }
}
