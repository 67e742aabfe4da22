//! Map viewport owned by the overview panel
//!
//! The viewport is created lazily on first `show`, re-centred in place on
//! later calls, and dropped by `release`. It carries at most one marker.

use super::entity::EntityId;
use super::ship::Ship;

pub const DEFAULT_ZOOM: u8 = 3;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub ship_id: EntityId,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub speed_label: String,
}

impl MapMarker {
    fn for_ship(ship: &Ship) -> Self {
        Self {
            ship_id: ship.id,
            latitude: ship.latitude,
            longitude: ship.longitude,
            name: ship.name.clone(),
            speed_label: format!("Speed: {}", ship.speed_label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    pub center: (f64, f64),
    pub zoom: u8,
    pub marker: Option<MapMarker>,
}

impl MapViewport {
    /// Longitude and latitude bounds of the visible window, clamped to the globe
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let span_lon = 360.0 / f64::from(1u32 << self.zoom);
        let span_lat = (span_lon / 2.0).min(180.0);
        let (lat, lon) = self.center;
        let x = shift_into(lon - span_lon / 2.0, lon + span_lon / 2.0, -180.0, 180.0);
        let y = shift_into(lat - span_lat / 2.0, lat + span_lat / 2.0, -90.0, 90.0);
        (x, y)
    }
}

/// Slide the window `[lo, hi]` so it stays within `[min, max]`
fn shift_into(lo: f64, hi: f64, min: f64, max: f64) -> [f64; 2] {
    if hi - lo >= max - min {
        [min, max]
    } else if lo < min {
        [min, min + (hi - lo)]
    } else if hi > max {
        [max - (hi - lo), max]
    } else {
        [lo, hi]
    }
}

#[derive(Debug, Default)]
pub struct MapView {
    viewport: Option<MapViewport>,
    zoom: Option<u8>,
    acquisitions: usize,
}

impl MapView {
    /// Centre on `ship`, replacing any previous marker
    pub fn show(&mut self, ship: &Ship) -> &MapViewport {
        if self.viewport.is_none() {
            self.acquisitions += 1;
            tracing::trace!(
                ship_id = ship.id,
                acquisitions = self.acquisitions,
                "Map viewport created"
            );
        }
        let zoom = self.zoom();
        let viewport = self.viewport.get_or_insert_with(|| MapViewport {
            center: (0.0, 0.0),
            zoom,
            marker: None,
        });
        viewport.center = (ship.latitude, ship.longitude);
        viewport.marker = Some(MapMarker::for_ship(ship));
        viewport
    }

    pub fn release(&mut self) {
        if self.viewport.take().is_some() {
            tracing::trace!("Map viewport released");
        }
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Option<&MapViewport> {
        self.viewport.as_ref()
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn zoom(&self) -> u8 {
        self.zoom.unwrap_or(DEFAULT_ZOOM)
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom().saturating_add(1).min(MAX_ZOOM));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom().saturating_sub(1).max(MIN_ZOOM));
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = Some(zoom);
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.zoom = zoom;
        }
    }

    /// How many times a fresh viewport has been set up
    #[cfg(test)]
    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }
}
