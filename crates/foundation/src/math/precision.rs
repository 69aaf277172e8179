//! Deterministic float keys.
//!
//! Derived state is cached on input equality; plain `f64` equality breaks
//! that for NaN (never equal) and splits `0.0` / `-0.0`.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::bounds::{GeoPoint, GeoRect};

/// Canonicalize a floating-point value for deterministic comparison.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// A float wrapper with total equality, ordering and hashing.
#[derive(Debug, Copy, Clone, Default)]
pub struct StableF64(pub f64);

impl PartialEq for StableF64 {
    fn eq(&self, other: &Self) -> bool {
        stable_total_cmp_f64(self.0, other.0) == Ordering::Equal
    }
}

impl Eq for StableF64 {}

impl PartialOrd for StableF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StableF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        stable_total_cmp_f64(self.0, other.0)
    }
}

impl Hash for StableF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_f64(self.0).to_bits().hash(state);
    }
}

/// Exact, hashable key for a `GeoRect`: `[west, south, east, north]`.
pub fn rect_key(r: &GeoRect) -> [StableF64; 4] {
    [
        StableF64(r.west),
        StableF64(r.south),
        StableF64(r.east),
        StableF64(r.north),
    ]
}

pub fn point_key(p: &GeoPoint) -> [StableF64; 2] {
    [StableF64(p.lat), StableF64(p.lng)]
}
