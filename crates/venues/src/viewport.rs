//! Viewport clipping.
//!
//! The visible set is the filtered set intersected with the part of the map
//! that is not covered by overlay UI.
//!
//! Convention:
//! - Bounds are inclusive on every edge.
//! - Occlusion only ever shrinks the rectangle.
//! - Without a projection nothing is visible.

use foundation::math::{Projection, StableF64, Vec2, rect_key};
use foundation::{GeoRect, wrap_lng};
use tracing::debug;

use crate::venue::Venue;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum OcclusionSide {
    #[default]
    Bottom,
    Left,
}

/// Overlay UI covering part of the map canvas.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Occlusion {
    pub side: OcclusionSide,
    pub px: f64,
}

impl Occlusion {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn bottom(px: f64) -> Self {
        Self {
            side: OcclusionSide::Bottom,
            px,
        }
    }

    pub fn left(px: f64) -> Self {
        Self {
            side: OcclusionSide::Left,
            px,
        }
    }

    pub fn is_none(&self) -> bool {
        !(self.px.is_finite() && self.px > 0.0)
    }

    pub fn key(&self) -> (OcclusionSide, StableF64) {
        (self.side, StableF64(self.px))
    }
}

/// Map bounds plus the overlay covering them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub bounds: GeoRect,
    pub occlusion: Occlusion,
}

impl ViewportState {
    pub fn new(bounds: GeoRect, occlusion: Occlusion) -> Self {
        Self { bounds, occlusion }
    }

    pub fn key(&self) -> ([StableF64; 4], (OcclusionSide, StableF64)) {
        (rect_key(&self.bounds), self.occlusion.key())
    }
}

/// Shrinks `bounds` by the occluded strip.
///
/// Returns `None` when nothing remains visible: invalid bounds, or an
/// occlusion covering the whole axis.
pub fn effective_bounds<P: Projection + ?Sized>(
    bounds: &GeoRect,
    occlusion: Occlusion,
    projection: &P,
) -> Option<GeoRect> {
    if !bounds.is_valid() {
        return None;
    }
    if occlusion.is_none() {
        return Some(*bounds);
    }

    let screen = projection.screen();
    let center = screen.center();
    match occlusion.side {
        OcclusionSide::Bottom => {
            if occlusion.px >= screen.height() {
                return None;
            }
            let edge = projection.unproject(Vec2::new(center.x, screen.max.y - occlusion.px));
            let south = if edge.lat.is_finite() {
                edge.lat.clamp(bounds.south, bounds.north)
            } else {
                bounds.south
            };
            Some(GeoRect { south, ..*bounds })
        }
        OcclusionSide::Left => {
            let width = screen.width();
            if occlusion.px >= width {
                return None;
            }
            let span = bounds.lng_span();
            let edge = projection.unproject(Vec2::new(screen.min.x + occlusion.px, center.y));
            let offset = if edge.lng.is_finite() {
                clamped_lng_offset(bounds, edge.lng)
            } else {
                0.0
            };
            let west = if offset >= span {
                bounds.east
            } else if bounds.crosses_antimeridian() {
                wrap_lng(bounds.west + offset)
            } else {
                (bounds.west + offset).min(bounds.east)
            };
            Some(GeoRect { west, ..*bounds })
        }
    }
}

/// Offset of `lng` east of the west edge, clamped to the rectangle. An edge
/// outside snaps to whichever side it is nearer to.
fn clamped_lng_offset(bounds: &GeoRect, lng: f64) -> f64 {
    let span = bounds.lng_span();
    if let Some(offset) = bounds.lng_offset(lng) {
        return offset.min(span);
    }
    let past_east = (lng - bounds.east).rem_euclid(360.0);
    let before_west = (bounds.west - lng).rem_euclid(360.0);
    if past_east < before_west { span } else { 0.0 }
}

/// Venues from `venues` whose coordinate lies inside the effective bounds.
///
/// Pure and idempotent; input order is preserved.
pub fn clip<'a, P: Projection + ?Sized>(
    venues: impl IntoIterator<Item = &'a Venue>,
    bounds: &GeoRect,
    occlusion: Occlusion,
    projection: Option<&P>,
) -> Vec<&'a Venue> {
    let Some(projection) = projection else {
        return Vec::new();
    };
    let Some(effective) = effective_bounds(bounds, occlusion, projection) else {
        return Vec::new();
    };
    venues
        .into_iter()
        .filter(|v| visible_in(v, &effective))
        .collect()
}

/// Index form of [`clip`] over a candidate subset of `venues`.
pub fn clip_indices<P: Projection + ?Sized>(
    venues: &[Venue],
    candidates: &[usize],
    bounds: &GeoRect,
    occlusion: Occlusion,
    projection: Option<&P>,
) -> Vec<usize> {
    let Some(projection) = projection else {
        return Vec::new();
    };
    let Some(effective) = effective_bounds(bounds, occlusion, projection) else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|&i| venues.get(i).is_some_and(|v| visible_in(v, &effective)))
        .collect()
}

fn visible_in(venue: &Venue, rect: &GeoRect) -> bool {
    if !venue.location.is_valid() {
        debug!(id = %venue.id, "skipping venue with invalid coordinate");
        return false;
    }
    rect.contains(venue.location)
}

#[cfg(test)]
mod tests {
    use super::{Occlusion, clip, effective_bounds};
    use crate::venue::Venue;
    use foundation::math::{Projection, WebMercatorView};
    use foundation::{GeoPoint, GeoRect, VenueId};
    use proptest::prelude::*;

    fn ids(vs: &[&Venue]) -> Vec<VenueId> {
        vs.iter().map(|v| v.id.clone()).collect()
    }

    fn scenario() -> Vec<Venue> {
        vec![
            Venue::new(1u64, "Pizza", GeoPoint::new(50.0, 20.0))
                .with_category_label("Pizza")
                .with_price("$"),
            Venue::new(2u64, "Sushi", GeoPoint::new(10.0, 10.0))
                .with_category_label("Sushi")
                .with_price("$$"),
        ]
    }

    fn view() -> WebMercatorView {
        WebMercatorView::new(GeoPoint::new(50.0, 20.0), 5.0, 400.0, 800.0)
    }

    #[test]
    fn unoccluded_bounds_clip_scenario() {
        let venues = scenario();
        let bounds = GeoRect::new(15.0, 45.0, 25.0, 55.0);
        let out = clip(&venues, &bounds, Occlusion::none(), Some(&view()));
        assert_eq!(ids(&out), vec![VenueId::from(1)]);
    }

    #[test]
    fn missing_projection_yields_nothing() {
        let venues = scenario();
        let bounds = GeoRect::new(-180.0, -90.0, 180.0, 90.0);
        let projection: Option<&WebMercatorView> = None;
        let out = clip(&venues, &bounds, Occlusion::none(), projection);
        assert!(out.is_empty());
    }

    #[test]
    fn bottom_occlusion_raises_south_edge() {
        let v = view();
        let bounds = v.bounds();
        let eff = effective_bounds(&bounds, Occlusion::bottom(400.0), &v).expect("visible");
        assert!(eff.south > bounds.south);
        assert_eq!(eff.north, bounds.north);
        assert!((eff.south - v.center.lat).abs() < 1e-9);
    }

    #[test]
    fn left_occlusion_moves_west_edge() {
        let v = view();
        let bounds = v.bounds();
        let eff = effective_bounds(&bounds, Occlusion::left(200.0), &v).expect("visible");
        assert!((eff.west - v.center.lng).abs() < 1e-9);
        assert_eq!(eff.east, bounds.east);
    }

    #[test]
    fn full_occlusion_hides_everything() {
        let v = view();
        let venues = vec![Venue::new(1u64, "Center", v.center)];
        let out = clip(&venues, &v.bounds(), Occlusion::bottom(800.0), Some(&v));
        assert!(out.is_empty());
        assert!(effective_bounds(&v.bounds(), Occlusion::left(1000.0), &v).is_none());
    }

    #[test]
    fn occlusion_never_enlarges_mismatched_bounds() {
        // Bounds much smaller than what the projection shows.
        let v = view();
        let bounds = GeoRect::new(19.9, 49.9, 20.1, 50.1);
        let eff = effective_bounds(&bounds, Occlusion::bottom(10.0), &v).expect("visible");
        assert!(eff.south >= bounds.south && eff.south <= bounds.north);
        let eff = effective_bounds(&bounds, Occlusion::left(10.0), &v).expect("visible");
        assert!(bounds.lng_offset(eff.west).is_some());
    }

    #[test]
    fn left_edge_outside_small_bounds_snaps_to_nearest_side() {
        let v = view();
        let bounds = GeoRect::new(19.9, 49.9, 20.1, 50.1);
        let venues = vec![Venue::new(1u64, "near west", GeoPoint::new(50.0, 19.94))];

        // Edge still west of the bounds: nothing is cut.
        let eff = effective_bounds(&bounds, Occlusion::left(100.0), &v).expect("visible");
        assert_eq!(eff.west, bounds.west);
        assert_eq!(clip(&venues, &bounds, Occlusion::left(100.0), Some(&v)).len(), 1);

        // Edge inside the bounds, west of the venue.
        assert_eq!(clip(&venues, &bounds, Occlusion::left(197.0), Some(&v)).len(), 1);

        // Edge east of the bounds: only the east edge remains.
        let eff = effective_bounds(&bounds, Occlusion::left(300.0), &v).expect("visible");
        assert_eq!(eff.west, bounds.east);
        assert!(clip(&venues, &bounds, Occlusion::left(300.0), Some(&v)).is_empty());
    }

    #[test]
    fn antimeridian_bounds_clip_both_sides() {
        let v = WebMercatorView::new(GeoPoint::new(0.0, 180.0), 4.0, 512.0, 512.0);
        let venues = vec![
            Venue::new(1u64, "east", GeoPoint::new(0.0, 178.0)),
            Venue::new(2u64, "west", GeoPoint::new(0.0, -178.0)),
            Venue::new(3u64, "far", GeoPoint::new(0.0, 0.0)),
        ];
        let out = clip(&venues, &v.bounds(), Occlusion::none(), Some(&v));
        assert_eq!(ids(&out), vec![VenueId::from(1), VenueId::from(2)]);

        let out = clip(&venues, &v.bounds(), Occlusion::left(256.0), Some(&v));
        assert_eq!(ids(&out), vec![VenueId::from(2)]);
    }

    fn arb_venues() -> impl Strategy<Value = Vec<Venue>> {
        proptest::collection::vec((49.0f64..51.0, 19.0f64..21.0), 0..40).prop_map(|pts| {
            pts.into_iter()
                .enumerate()
                .map(|(i, (lat, lng))| Venue::new(i as u64, "v", GeoPoint::new(lat, lng)))
                .collect()
        })
    }

    fn arb_view() -> impl Strategy<Value = WebMercatorView> {
        (49.5f64..50.5, 19.5f64..20.5, 7.0f64..12.0, 200.0f64..1400.0, 300.0f64..1000.0)
            .prop_map(|(lat, lng, zoom, w, h)| WebMercatorView::new(GeoPoint::new(lat, lng), zoom, w, h))
    }

    proptest! {
        #[test]
        fn clip_is_idempotent(venues in arb_venues(), v in arb_view(), px in 0.0f64..600.0, left in any::<bool>()) {
            let occ = if left { Occlusion::left(px) } else { Occlusion::bottom(px) };
            let bounds = v.bounds();
            let once = clip(&venues, &bounds, occ, Some(&v));
            let twice = clip(once.iter().copied(), &bounds, occ, Some(&v));
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn larger_occlusion_never_grows_visible_set(
            venues in arb_venues(),
            v in arb_view(),
            a in 0.0f64..600.0,
            b in 0.0f64..600.0,
            left in any::<bool>(),
        ) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let occ = |px| if left { Occlusion::left(px) } else { Occlusion::bottom(px) };
            let bounds = v.bounds();
            let wide = ids(&clip(&venues, &bounds, occ(small), Some(&v)));
            let narrow = ids(&clip(&venues, &bounds, occ(large), Some(&v)));
            prop_assert!(narrow.len() <= wide.len());
            for id in &narrow {
                prop_assert!(wide.contains(id));
            }
        }

        #[test]
        fn larger_occlusion_never_grows_visible_set_for_reported_bounds(
            venues in arb_venues(),
            v in arb_view(),
            rect in arb_bounds(),
            a in 0.0f64..600.0,
            b in 0.0f64..600.0,
            left in any::<bool>(),
        ) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let occ = |px| if left { Occlusion::left(px) } else { Occlusion::bottom(px) };
            let wide = ids(&clip(&venues, &rect, occ(small), Some(&v)));
            let narrow = ids(&clip(&venues, &rect, occ(large), Some(&v)));
            for id in &narrow {
                prop_assert!(wide.contains(id));
            }
        }
    }

    /// Bounds independent of the camera, as the map may report them.
    fn arb_bounds() -> impl Strategy<Value = GeoRect> {
        (19.0f64..21.0, 49.0f64..51.0, 0.01f64..2.0, 0.01f64..2.0)
            .prop_map(|(west, south, dx, dy)| GeoRect::new(west, south, west + dx, south + dy))
    }

    #[test]
    fn projection_zoom_is_exposed() {
        assert_eq!(view().zoom(), 5.0);
    }
}
