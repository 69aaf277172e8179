//! Screen projection for a north-up web map.
//!
//! The map library owns the real camera; the engine only needs to move
//! between geographic and screen coordinates for the current frame.

use std::f64::consts::PI;

use super::Vec2;
use crate::bounds::{GeoPoint, GeoRect, MERCATOR_MAX_LAT, ScreenRect, wrap_lng};

/// Tile size used by MapLibre-style zoom levels.
pub const TILE_SIZE_PX: f64 = 512.0;

/// Projection/unprojection callback consumed by viewport logic.
///
/// Screen coordinates are CSS pixels with the origin at the top-left corner
/// of the map canvas.
pub trait Projection {
    fn project(&self, point: GeoPoint) -> Vec2;
    fn unproject(&self, px: Vec2) -> GeoPoint;
    fn screen(&self) -> ScreenRect;
    fn zoom(&self) -> f64;
}

/// Spherical Web Mercator camera with no bearing or pitch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WebMercatorView {
    pub center: GeoPoint,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
}

impl WebMercatorView {
    pub fn new(center: GeoPoint, zoom: f64, width_px: f64, height_px: f64) -> Self {
        Self {
            center,
            zoom,
            width_px,
            height_px,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_valid()
            && self.zoom.is_finite()
            && self.zoom >= 0.0
            && self.width_px.is_finite()
            && self.height_px.is_finite()
            && self.width_px > 0.0
            && self.height_px > 0.0
    }

    pub fn world_size(&self) -> f64 {
        TILE_SIZE_PX * self.zoom.exp2()
    }

    /// Geographic rectangle covered by the whole canvas.
    pub fn bounds(&self) -> GeoRect {
        let nw = self.unproject(Vec2::ZERO);
        let se = self.unproject(Vec2::new(self.width_px, self.height_px));
        if self.width_px >= self.world_size() {
            return GeoRect::new(-180.0, se.lat, 180.0, nw.lat);
        }
        GeoRect::new(nw.lng, se.lat, se.lng, nw.lat)
    }

    fn center_world(&self) -> Vec2 {
        mercator_unit(self.center).scale(self.world_size())
    }
}

impl Projection for WebMercatorView {
    fn project(&self, point: GeoPoint) -> Vec2 {
        let ws = self.world_size();
        let world = mercator_unit(point).scale(ws);
        let c = self.center_world();
        let mut dx = world.x - c.x;
        // Pick the world copy closest to the camera.
        if dx > 0.5 * ws {
            dx -= ws;
        } else if dx < -0.5 * ws {
            dx += ws;
        }
        Vec2::new(dx + 0.5 * self.width_px, world.y - c.y + 0.5 * self.height_px)
    }

    fn unproject(&self, px: Vec2) -> GeoPoint {
        let ws = self.world_size();
        let c = self.center_world();
        let wx = px.x - 0.5 * self.width_px + c.x;
        let wy = (px.y - 0.5 * self.height_px + c.y).clamp(0.0, ws);
        let lng = wrap_lng(wx / ws * 360.0 - 180.0);
        let lat = (PI * (1.0 - 2.0 * wy / ws)).sinh().atan().to_degrees();
        GeoPoint::new(lat, lng)
    }

    fn screen(&self) -> ScreenRect {
        ScreenRect::from_size(self.width_px, self.height_px)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

/// Mercator coordinates in the unit square, y growing southwards.
fn mercator_unit(point: GeoPoint) -> Vec2 {
    let lat = point.lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
    let x = (point.lng + 180.0) / 360.0;
    let y = 0.5 - (PI / 4.0 + lat / 2.0).tan().ln() / (2.0 * PI);
    Vec2::new(x, y)
}
