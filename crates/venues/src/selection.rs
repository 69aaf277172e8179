//! Map/list selection sync.
//!
//! Transitions:
//! - `activate`: any state -> `SelectedInteractive`, with a gentle nudge
//!   only when the venue is outside the comfortable region
//! - `resolve_link`: `Idle` or another venue -> `SelectedFromLink`, with
//!   exactly one recenter request
//! - `dismiss`, `link_cleared`, `retain`: -> `Idle`
//!
//! Reselection moves directly between venues; `Idle` is never observable in
//! between.

use foundation::VenueId;
use foundation::math::Projection;
use tracing::debug;

use crate::camera::CameraPolicy;
use crate::effect::Effect;
use crate::sheet::{Layout, SheetSnap, SheetState};
use crate::store::VenueStore;
use crate::venue::Venue;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    SelectedInteractive(VenueId),
    SelectedFromLink(VenueId),
}

impl SelectionState {
    pub fn selected(&self) -> Option<&VenueId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::SelectedInteractive(id) | SelectionState::SelectedFromLink(id) => {
                Some(id)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }
}

/// Owns the selection and the sheet positions it drives.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
    sheet: SheetState,
    policy: CameraPolicy,
    pending_link: Option<String>,
}

impl SelectionCoordinator {
    pub fn new(policy: CameraPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&VenueId> {
        self.state.selected()
    }

    pub fn sheet(&self) -> &SheetState {
        &self.sheet
    }

    pub fn policy(&self) -> &CameraPolicy {
        &self.policy
    }

    /// Deep-link value waiting for the first venue batch.
    pub fn pending_link(&self) -> Option<&str> {
        self.pending_link.as_deref()
    }

    /// Returns `false` when the snap was ignored because details are open.
    pub fn on_list_snapped(&mut self, snap: SheetSnap) -> bool {
        self.sheet.on_list_snapped(snap)
    }

    pub fn on_details_snapped(&mut self, snap: SheetSnap) {
        self.sheet.on_details_snapped(snap);
    }

    /// Marker click or list row activation.
    ///
    /// The nudge is computed against the layout with the details panel
    /// already open.
    pub fn activate<P: Projection + ?Sized>(
        &mut self,
        venue: &Venue,
        projection: Option<&P>,
        layout: Layout,
        side_panel_px: f64,
    ) -> Vec<Effect> {
        if self.selected() == Some(&venue.id) {
            return Vec::new();
        }
        self.state = SelectionState::SelectedInteractive(venue.id.clone());
        self.pending_link = None;
        let mut effects = self.open(venue);
        effects.push(Effect::PushDeepLink(Some(venue.slug.clone())));

        if let Some(projection) = projection {
            let occlusion = self
                .sheet
                .occlusion(layout, projection.screen(), side_panel_px);
            if let Some(request) = self.policy.nudge(projection, venue.location, occlusion) {
                effects.push(Effect::Camera(request));
            }
        }
        effects
    }

    /// Handles a change of the `restaurant` query parameter.
    ///
    /// `None` or a blank value clears a link-driven selection. Values that
    /// arrive before the first batch stay pending until [`Self::on_batch_loaded`].
    pub fn resolve_link<P: Projection + ?Sized>(
        &mut self,
        value: Option<&str>,
        store: &VenueStore,
        projection: Option<&P>,
    ) -> Vec<Effect> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            self.pending_link = None;
            return self.link_cleared();
        };
        if store.generation() == 0 {
            debug!(link = value, "deep link pending until venues load");
            self.pending_link = Some(value.to_string());
            return Vec::new();
        }
        self.pending_link = None;

        let Some(venue) = store.resolve_link(value) else {
            debug!(link = value, "deep link matches no venue");
            return Vec::new();
        };
        if self.selected() == Some(&venue.id) {
            return Vec::new();
        }

        self.state = SelectionState::SelectedFromLink(venue.id.clone());
        let mut effects = self.open(venue);
        effects.push(Effect::Camera(self.policy.recenter(projection, venue.location)));
        if venue.slug != value.replace(' ', "+") {
            effects.push(Effect::PushDeepLink(Some(venue.slug.clone())));
        }
        effects
    }

    /// Called after the store was replaced: resolves a pending link and
    /// drops a selection whose venue disappeared.
    pub fn on_batch_loaded<P: Projection + ?Sized>(
        &mut self,
        store: &VenueStore,
        projection: Option<&P>,
    ) -> Vec<Effect> {
        let mut effects = self.retain(store);
        if let Some(link) = self.pending_link.take() {
            effects.extend(self.resolve_link(Some(link.as_str()), store, projection));
        }
        effects
    }

    /// The deep-link parameter was removed externally (back navigation).
    pub fn link_cleared(&mut self) -> Vec<Effect> {
        if self.state.is_idle() {
            return Vec::new();
        }
        self.state = SelectionState::Idle;
        let restore = self.sheet.close_details();
        vec![Effect::CloseDetails, Effect::RestoreSheetSnap(restore)]
    }

    /// The user closed the details panel.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        if self.state.is_idle() {
            return Vec::new();
        }
        self.state = SelectionState::Idle;
        let restore = self.sheet.close_details();
        vec![
            Effect::CloseDetails,
            Effect::PushDeepLink(None),
            Effect::RestoreSheetSnap(restore),
        ]
    }

    /// Clears the selection if its venue is no longer in `store`.
    pub fn retain(&mut self, store: &VenueStore) -> Vec<Effect> {
        match self.selected() {
            Some(id) if !store.contains(id) => {
                debug!(%id, "selected venue left the batch");
                self.dismiss()
            }
            _ => Vec::new(),
        }
    }

    fn open(&mut self, venue: &Venue) -> Vec<Effect> {
        self.sheet.open_details();
        vec![
            Effect::OpenDetails(venue.id.clone()),
            Effect::SnapDetailsSheet(self.sheet.details()),
        ]
    }
}
