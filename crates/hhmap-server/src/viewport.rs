//! Viewport controller: the declutter engine's reentrancy guard.
//!
//! Map pan/zoom events can arrive in rapid bursts. Each controller allows at
//! most one declutter recomputation in flight; events landing during an
//! active computation overwrite a single pending slot, so a burst collapses
//! into one trailing recomputation with the newest parameters — never an
//! unbounded queue. The visible set is an `Arc` snapshot replaced wholesale,
//! so readers never observe a partial update.

use std::sync::Arc;

use tokio::sync::Mutex;

use hhmap_core::declutter::select_visible;
use hhmap_core::{BoundingBox, Venue};

/// One viewport change event: where the map is and how far in it is zoomed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportParams {
    pub bounds: BoundingBox,
    pub zoom: i32,
}

#[derive(Default)]
struct ControllerState {
    computing: bool,
    pending: Option<ViewportParams>,
    last_params: Option<ViewportParams>,
    visible: Arc<Vec<Venue>>,
}

/// Owns the venue snapshot and the currently visible marker set.
#[derive(Default)]
pub struct ViewportController {
    venues: Mutex<Arc<Vec<Venue>>>,
    state: Mutex<ControllerState>,
}

impl ViewportController {
    /// Replaces the venue set and recomputes against the last known
    /// viewport, if any.
    pub async fn replace_venues(&self, venues: Vec<Venue>) {
        let last_params = {
            let mut snapshot = self.venues.lock().await;
            *snapshot = Arc::new(venues);
            self.state.lock().await.last_params
        };
        if let Some(params) = last_params {
            self.update_viewport(params).await;
        }
    }

    /// Handles a viewport change event and returns the visible marker set.
    ///
    /// If a recomputation is already in flight, the parameters land in the
    /// pending slot (overwriting any older pending event) and the current
    /// snapshot is returned immediately; the in-flight call picks the
    /// pending parameters up as its trailing recomputation.
    pub async fn update_viewport(&self, params: ViewportParams) -> Arc<Vec<Venue>> {
        {
            let mut state = self.state.lock().await;
            state.last_params = Some(params);
            if state.computing {
                state.pending = Some(params);
                return Arc::clone(&state.visible);
            }
            state.computing = true;
        }

        let mut next = params;
        loop {
            let venues = Arc::clone(&*self.venues.lock().await);
            let visible = Arc::new(select_visible(&venues, &next.bounds, next.zoom));

            let mut state = self.state.lock().await;
            if let Some(pending) = state.pending.take() {
                next = pending;
                continue;
            }
            state.visible = Arc::clone(&visible);
            state.computing = false;
            return visible;
        }
    }

    /// The current visible marker snapshot.
    pub async fn visible(&self) -> Arc<Vec<Venue>> {
        Arc::clone(&self.state.lock().await.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hhmap_core::Coordinates;
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

    fn params(zoom: i32) -> ViewportParams {
        ViewportParams {
            bounds: BoundingBox {
                south: 30.0,
                west: -98.0,
                north: 30.6,
                east: -97.4,
            },
            zoom,
        }
    }

    fn spread_venues(count: u16) -> Vec<Venue> {
        (0..count)
            .map(|i| venue(30.05 + f64::from(i) * 0.004, -97.7))
            .collect()
    }

    #[tokio::test]
    async fn update_replaces_the_snapshot() {
        let controller = ViewportController::default();
        controller.replace_venues(spread_venues(20)).await;

        let visible = controller.update_viewport(params(16)).await;
        assert_eq!(visible.len(), 20);
        assert_eq!(controller.visible().await.len(), 20);
    }

    #[tokio::test]
    async fn venue_replacement_recomputes_with_last_viewport() {
        let controller = ViewportController::default();
        controller.replace_venues(spread_venues(10)).await;
        controller.update_viewport(params(16)).await;

        controller.replace_venues(spread_venues(30)).await;
        assert_eq!(controller.visible().await.len(), 30);
    }

    #[tokio::test]
    async fn concurrent_burst_settles_on_a_submitted_viewport() {
        let controller = Arc::new(ViewportController::default());
        controller.replace_venues(spread_venues(120)).await;

        // Zoom 10 buckets 120 venues into fewer cells; zoom 16 shows all.
        let mut handles = Vec::new();
        for i in 0..50 {
            let controller = Arc::clone(&controller);
            let zoom = if i % 2 == 0 { 10 } else { 16 };
            handles.push(tokio::spawn(async move {
                controller.update_viewport(params(zoom)).await;
            }));
        }
        for handle in handles {
            handle.await.expect("task completes");
        }

        // Whatever event won the trailing slot, the snapshot must match one
        // of the two submitted parameter sets, fully computed.
        let expected_detail = 120;
        let expected_bucketed = {
            let venues = spread_venues(120);
            select_visible(&venues, &params(10).bounds, 10).len()
        };
        let settled = controller.visible().await.len();
        assert!(
            settled == expected_detail || settled == expected_bucketed,
            "settled on {settled}, expected {expected_detail} or {expected_bucketed}"
        );

        // The guard must be released: a fresh event computes synchronously.
        let after = controller.update_viewport(params(16)).await;
        assert_eq!(after.len(), 120);
    }
}
