//! Geographic and screen-space rectangles.

use crate::math::Vec2;

/// Latitude limit of the Web Mercator projection (degrees).
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// WGS84 coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// Finite, with `lat` in [-90, 90] and `lng` in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Geographic rectangle in degrees.
///
/// Convention:
/// - `west > east` means the rectangle crosses the antimeridian.
/// - All edges are inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRect {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        GeoRect {
            west,
            south,
            east,
            north,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
            && self.south <= self.north
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Brings unwrapped edges (as reported when world copies are on screen,
    /// e.g. west = -200) back into [-180, 180]. A span of a full turn or
    /// more becomes the whole world.
    pub fn normalized(&self) -> Self {
        if self.east - self.west >= 360.0 {
            return GeoRect {
                west: -180.0,
                east: 180.0,
                ..*self
            };
        }
        GeoRect {
            west: wrap_lng(self.west),
            east: wrap_lng(self.east),
            ..*self
        }
    }

    /// Longitudinal extent in degrees, accounting for antimeridian wrap.
    pub fn lng_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east + 360.0 - self.west
        } else {
            self.east - self.west
        }
    }

    pub fn center(&self) -> GeoPoint {
        let lat = 0.5 * (self.south + self.north);
        let lng = wrap_lng(self.west + 0.5 * self.lng_span());
        GeoPoint::new(lat, lng)
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        if !self.is_valid() || p.lat < self.south || p.lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            p.lng >= self.west || p.lng <= self.east
        } else {
            p.lng >= self.west && p.lng <= self.east
        }
    }

    /// Offset of `lng` east of the west edge, in degrees, or `None` if the
    /// longitude lies outside the rectangle.
    pub fn lng_offset(&self, lng: f64) -> Option<f64> {
        let offset = (lng - self.west).rem_euclid(360.0);
        (offset <= self.lng_span()).then_some(offset)
    }
}

/// Wraps a longitude into [-180, 180].
pub fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    let w = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 && lng > 0.0 { 180.0 } else { w }
}

/// Axis-aligned screen rectangle in CSS pixels (inclusive).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        ScreenRect { min, max }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        ScreenRect::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrinks each side by `fraction` of the extent along that axis.
    pub fn inset_fraction(&self, fraction: f64) -> Self {
        let f = fraction.clamp(0.0, 0.5);
        let dx = self.width() * f;
        let dy = self.height() * f;
        ScreenRect::new(
            Vec2::new(self.min.x + dx, self.min.y + dy),
            Vec2::new(self.max.x - dx, self.max.y - dy),
        )
    }
}
