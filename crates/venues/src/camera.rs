//! Camera requests emitted toward the map.

use foundation::math::{Projection, Vec2};
use foundation::{GeoPoint, ScreenRect};

use crate::viewport::{Occlusion, OcclusionSide};

/// A camera move the map should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraRequest {
    /// Pan so the selected venue sits comfortably inside the unoccluded
    /// area; zoom is left unchanged.
    Nudge { center: GeoPoint },
    /// Center on a deep-linked venue and zoom in.
    Recenter { target: GeoPoint, zoom: f64 },
    /// Fly to a city preset.
    FlyTo { target: GeoPoint, zoom: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPolicy {
    /// Fraction of the unoccluded extent inset on every side.
    pub comfort_inset: f64,
    pub link_min_zoom: f64,
    pub link_zoom_step: f64,
    pub max_zoom: f64,
}

impl Default for CameraPolicy {
    fn default() -> Self {
        Self {
            comfort_inset: 0.15,
            link_min_zoom: 15.0,
            link_zoom_step: 3.0,
            max_zoom: 18.0,
        }
    }
}

impl CameraPolicy {
    /// Central region of the part of `screen` not covered by `occlusion`.
    ///
    /// Returns `None` when the occlusion leaves nothing visible.
    pub fn comfortable_rect(&self, screen: ScreenRect, occlusion: Occlusion) -> Option<ScreenRect> {
        let mut open = screen;
        if !occlusion.is_none() {
            match occlusion.side {
                OcclusionSide::Bottom => open.max.y -= occlusion.px,
                OcclusionSide::Left => open.min.x += occlusion.px,
            }
        }
        if open.width() <= 0.0 || open.height() <= 0.0 {
            return None;
        }
        Some(open.inset_fraction(self.comfort_inset))
    }

    /// Pan request for an interactive selection, or `None` if the venue is
    /// already comfortably visible.
    pub fn nudge<P: Projection + ?Sized>(
        &self,
        projection: &P,
        target: GeoPoint,
        occlusion: Occlusion,
    ) -> Option<CameraRequest> {
        let comfortable = self.comfortable_rect(projection.screen(), occlusion)?;
        let at = projection.project(target);
        if !at.is_finite() || comfortable.contains(at) {
            return None;
        }
        // Shift the camera by the offset between the venue and the middle of
        // the comfortable region.
        let shift: Vec2 = at - comfortable.center();
        let center = projection.unproject(projection.screen().center() + shift);
        Some(CameraRequest::Nudge { center })
    }

    /// Zoom used when a deep link opens a venue. Never below the current
    /// zoom, even when the map is already past `max_zoom`.
    pub fn link_zoom<P: Projection + ?Sized>(&self, projection: Option<&P>) -> f64 {
        match projection {
            Some(p) if p.zoom().is_finite() => (p.zoom() + self.link_zoom_step)
                .max(self.link_min_zoom)
                .min(self.max_zoom.max(p.zoom())),
            _ => self.link_min_zoom,
        }
    }

    pub fn recenter<P: Projection + ?Sized>(
        &self,
        projection: Option<&P>,
        target: GeoPoint,
    ) -> CameraRequest {
        CameraRequest::Recenter {
            target,
            zoom: self.link_zoom(projection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraPolicy, CameraRequest};
    use crate::viewport::Occlusion;
    use foundation::math::{Projection, WebMercatorView};
    use foundation::{GeoPoint, ScreenRect};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn view(zoom: f64) -> WebMercatorView {
        WebMercatorView::new(GeoPoint::new(50.049, 19.944), zoom, 400.0, 800.0)
    }

    #[test]
    fn comfortable_rect_excludes_occluded_strip() {
        let policy = CameraPolicy::default();
        let screen = ScreenRect::from_size(400.0, 800.0);
        let r = policy
            .comfortable_rect(screen, Occlusion::bottom(400.0))
            .expect("open area");
        assert_close(r.min.x, 60.0, 1e-9);
        assert_close(r.max.x, 340.0, 1e-9);
        assert_close(r.min.y, 60.0, 1e-9);
        assert_close(r.max.y, 340.0, 1e-9);

        let r = policy
            .comfortable_rect(ScreenRect::from_size(1000.0, 800.0), Occlusion::left(400.0))
            .expect("open area");
        assert_close(r.min.x, 490.0, 1e-9);
        assert!(policy.comfortable_rect(screen, Occlusion::bottom(800.0)).is_none());
    }

    #[test]
    fn nudge_is_skipped_for_comfortable_venues() {
        let v = view(11.0);
        let policy = CameraPolicy::default();
        assert_eq!(policy.nudge(&v, v.center, Occlusion::none()), None);
    }

    #[test]
    fn nudge_brings_venue_into_comfortable_center() {
        let v = view(11.0);
        let policy = CameraPolicy::default();
        let occ = Occlusion::bottom(400.0);
        // The camera center is hidden behind a half-height sheet.
        let Some(CameraRequest::Nudge { center }) = policy.nudge(&v, v.center, occ) else {
            panic!("expected a nudge");
        };
        let moved = WebMercatorView { center, ..v };
        let at = moved.project(v.center);
        let target = policy
            .comfortable_rect(v.screen(), occ)
            .expect("open area")
            .center();
        assert_close(at.x, target.x, 1e-6);
        assert_close(at.y, target.y, 1e-6);
        assert!(center.lat < v.center.lat);
    }

    #[test]
    fn link_zoom_is_clamped() {
        let policy = CameraPolicy::default();
        assert_eq!(policy.link_zoom(Some(&view(11.0))), 15.0);
        assert_eq!(policy.link_zoom(Some(&view(13.5))), 16.5);
        assert_eq!(policy.link_zoom(Some(&view(17.0))), 18.0);
        assert_eq!(policy.link_zoom::<WebMercatorView>(None), 15.0);
    }

    #[test]
    fn link_zoom_never_zooms_out() {
        let policy = CameraPolicy::default();
        assert_eq!(policy.link_zoom(Some(&view(18.0))), 18.0);
        assert_eq!(policy.link_zoom(Some(&view(20.0))), 20.0);
    }

    #[test]
    fn recenter_targets_the_venue() {
        let policy = CameraPolicy::default();
        let target = GeoPoint::new(10.0, 10.0);
        assert_eq!(
            policy.recenter(Some(&view(14.0)), target),
            CameraRequest::Recenter { target, zoom: 17.0 }
        );
    }
}
