//! Session state container and action dispatcher.
//!
//! Every state change goes through [`Session::dispatch`]. Reducers are
//! synchronous and perform no I/O; side effects are returned as [`Effect`]s
//! for the caller to carry out.
//!
//! Derived state:
//! - `filtered()` is memoized on (store generation, filter)
//! - `visible()` is memoized on the filtered key plus bounds, occlusion and
//!   camera

use foundation::math::{Projection, StableF64, WebMercatorView, point_key, rect_key};
use foundation::{GeoPoint, GeoRect, VenueId};
use runtime::{Event, EventBus, FetchStatus, FetchTicket, FetchTracker, Memo};
use tracing::{debug, warn};

use crate::camera::CameraPolicy;
use crate::category::Category;
use crate::effect::Effect;
use crate::filter::{self, FilterDraft, FilterState};
use crate::onboarding::SurveyAnswers;
use crate::selection::{SelectionCoordinator, SelectionState};
use crate::sheet::{Layout, NARROW_BREAKPOINT_PX, SIDE_PANEL_WIDTH_PX, SheetSnap};
use crate::store::VenueStore;
use crate::venue::{DietaryStyle, PriceTag, Venue};
use crate::viewport::{self, Occlusion, OcclusionSide, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Camera the map starts with.
    pub initial_center: GeoPoint,
    pub initial_zoom: f64,
    pub camera: CameraPolicy,
    pub narrow_breakpoint_px: f64,
    pub side_panel_px: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_center: GeoPoint::new(50.049, 19.944),
            initial_zoom: 11.0,
            camera: CameraPolicy::default(),
            narrow_breakpoint_px: NARROW_BREAKPOINT_PX,
            side_panel_px: SIDE_PANEL_WIDTH_PX,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SheetKind {
    List,
    Details,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    VenuesLoaded {
        ticket: FetchTicket,
        venues: Vec<Venue>,
        fingerprint: Option<String>,
    },
    FetchFailed {
        ticket: FetchTicket,
        message: String,
    },
    QueryChanged(String),
    /// Opens the filter sheet; facet toggles are staged until applied.
    FilterSheetOpened,
    /// Closes the filter sheet, discarding staged edits.
    FilterSheetClosed,
    DietaryStyleToggled(DietaryStyle),
    CategoryToggled(Category),
    FoodCategoryToggled(String),
    PriceToggled(PriceTag),
    /// Clears staged facets, keeping the query.
    FiltersCleared,
    FiltersApplied,
    FiltersReset,
    MapMoved {
        view: WebMercatorView,
        bounds: GeoRect,
    },
    SheetSnapped {
        sheet: SheetKind,
        snap: SheetSnap,
    },
    LayoutChanged {
        width_px: f64,
    },
    VenueActivated(VenueId),
    DeepLinkChanged(Option<String>),
    DetailsDismissed,
    SurveyCompleted(SurveyAnswers),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::VenuesLoaded { .. } => "venues_loaded",
            Action::FetchFailed { .. } => "fetch_failed",
            Action::QueryChanged(_) => "query_changed",
            Action::FilterSheetOpened => "filter_sheet_opened",
            Action::FilterSheetClosed => "filter_sheet_closed",
            Action::DietaryStyleToggled(_) => "dietary_style_toggled",
            Action::CategoryToggled(_) => "category_toggled",
            Action::FoodCategoryToggled(_) => "food_category_toggled",
            Action::PriceToggled(_) => "price_toggled",
            Action::FiltersCleared => "filters_cleared",
            Action::FiltersApplied => "filters_applied",
            Action::FiltersReset => "filters_reset",
            Action::MapMoved { .. } => "map_moved",
            Action::SheetSnapped { .. } => "sheet_snapped",
            Action::LayoutChanged { .. } => "layout_changed",
            Action::VenueActivated(_) => "venue_activated",
            Action::DeepLinkChanged(_) => "deep_link_changed",
            Action::DetailsDismissed => "details_dismissed",
            Action::SurveyCompleted(_) => "survey_completed",
        }
    }
}

/// What the venue list should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Failed(String),
    NoResults,
    Results(usize),
}

type FilteredKey = (u64, FilterState);
type ViewKey = ([StableF64; 2], StableF64, StableF64, StableF64);
type VisibleKey = (FilteredKey, [StableF64; 4], (OcclusionSide, StableF64), Option<ViewKey>);

/// All client state for one map page.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    store: VenueStore,
    fetch: FetchTracker,
    filter: FilterState,
    draft: Option<FilterDraft>,
    bounds: Option<GeoRect>,
    view: Option<WebMercatorView>,
    layout: Layout,
    selection: SelectionCoordinator,
    filtered: Memo<FilteredKey, Vec<usize>>,
    visible: Memo<VisibleKey, Vec<usize>>,
    events: EventBus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            store: VenueStore::new(),
            fetch: FetchTracker::new(),
            filter: FilterState::new(),
            draft: None,
            bounds: None,
            view: None,
            layout: Layout::default(),
            selection: SelectionCoordinator::new(config.camera),
            filtered: Memo::new(),
            visible: Memo::new(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &VenueStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Staged filter edits while the filter sheet is open.
    pub fn draft(&self) -> Option<&FilterState> {
        self.draft.as_ref().map(FilterDraft::staged)
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn selected_venue(&self) -> Option<&Venue> {
        self.selection.selected().and_then(|id| self.store.get(id))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn list_snap(&self) -> SheetSnap {
        self.selection.sheet().list()
    }

    pub fn view(&self) -> Option<&WebMercatorView> {
        self.view.as_ref()
    }

    pub fn fetch_status(&self) -> &FetchStatus {
        self.fetch.status()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Hands the dispatch log to the caller, leaving it empty.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Issues a ticket for a new venue request; older tickets become stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.fetch.begin();
        self.events
            .emit("fetch_started", format!("ticket {}", ticket.seq()));
        ticket
    }

    /// Overlay currently covering the map.
    pub fn occlusion(&self) -> Occlusion {
        let Some(view) = &self.view else {
            return Occlusion::none();
        };
        self.selection
            .sheet()
            .occlusion(self.layout, view.screen(), self.config.side_panel_px)
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.bounds
            .map(|bounds| ViewportState::new(bounds, self.occlusion()))
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let kind = action.kind();
        let effects = self.reduce(action);
        self.events
            .emit(kind, format!("{} effect(s)", effects.len()));
        effects
    }

    fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::VenuesLoaded {
                ticket,
                venues,
                fingerprint,
            } => {
                if !self.fetch.complete(ticket) {
                    warn!(ticket = ticket.seq(), "ignoring stale venue response");
                    return Vec::new();
                }
                self.store.replace(venues, fingerprint);
                self.selection
                    .on_batch_loaded(&self.store, self.view.as_ref())
            }
            Action::FetchFailed { ticket, message } => {
                if self.fetch.fail(ticket, message.as_str()) {
                    warn!(ticket = ticket.seq(), %message, "venue fetch failed");
                } else {
                    warn!(ticket = ticket.seq(), "ignoring stale fetch failure");
                }
                Vec::new()
            }
            Action::QueryChanged(query) => {
                self.filter.set_query(query);
                Vec::new()
            }
            Action::FilterSheetOpened => {
                self.draft = Some(FilterDraft::open(&self.filter));
                Vec::new()
            }
            Action::FilterSheetClosed => {
                self.draft = None;
                Vec::new()
            }
            Action::DietaryStyleToggled(style) => {
                self.facets_mut().toggle_dietary_style(style);
                Vec::new()
            }
            Action::CategoryToggled(category) => {
                self.facets_mut().toggle_category(category);
                Vec::new()
            }
            Action::FoodCategoryToggled(tag) => {
                self.facets_mut().toggle_food_category(tag);
                Vec::new()
            }
            Action::PriceToggled(price) => {
                self.facets_mut().toggle_price(price);
                Vec::new()
            }
            Action::FiltersCleared => {
                match &mut self.draft {
                    Some(draft) => draft.clear(),
                    None => self.filter.clear_facets(),
                }
                Vec::new()
            }
            Action::FiltersApplied => {
                if let Some(draft) = self.draft.take() {
                    let mut applied = draft.commit();
                    // The search box is not part of the sheet.
                    applied.query = std::mem::take(&mut self.filter.query);
                    self.filter = applied;
                }
                Vec::new()
            }
            Action::FiltersReset => {
                self.filter.reset();
                self.draft = None;
                Vec::new()
            }
            Action::MapMoved { view, bounds } => {
                let bounds = bounds.normalized();
                if !view.is_valid() || !bounds.is_valid() {
                    debug!(?bounds, "ignoring invalid map move");
                    return Vec::new();
                }
                self.view = Some(view);
                self.bounds = Some(bounds);
                Vec::new()
            }
            Action::SheetSnapped { sheet, snap } => {
                match sheet {
                    SheetKind::List => {
                        if !self.selection.on_list_snapped(snap) {
                            debug!(?snap, "list snap ignored while details are open");
                        }
                    }
                    SheetKind::Details => self.selection.on_details_snapped(snap),
                }
                Vec::new()
            }
            Action::LayoutChanged { width_px } => {
                self.layout = Layout::for_width(width_px, self.config.narrow_breakpoint_px);
                Vec::new()
            }
            Action::VenueActivated(id) => {
                let Some(venue) = self.store.get(&id) else {
                    debug!(%id, "activated venue is not loaded");
                    return Vec::new();
                };
                self.selection.activate(
                    venue,
                    self.view.as_ref(),
                    self.layout,
                    self.config.side_panel_px,
                )
            }
            Action::DeepLinkChanged(value) => {
                self.selection
                    .resolve_link(value.as_deref(), &self.store, self.view.as_ref())
            }
            Action::DetailsDismissed => self.selection.dismiss(),
            Action::SurveyCompleted(answers) => {
                self.filter = answers.to_filter();
                self.draft = None;
                let mut effects: Vec<Effect> =
                    answers.camera_request().into_iter().map(Effect::Camera).collect();
                effects.push(Effect::PersistOnboarded);
                effects
            }
        }
    }

    fn facets_mut(&mut self) -> &mut FilterState {
        match &mut self.draft {
            Some(draft) => draft.staged_mut(),
            None => &mut self.filter,
        }
    }

    /// Venues matching the active filter, in store order.
    pub fn filtered(&mut self) -> Vec<&Venue> {
        self.refresh_filtered();
        let Session {
            ref store,
            ref filtered,
            ..
        } = *self;
        filtered
            .peek()
            .map(|indices| indices.iter().filter_map(|&i| store.venues().get(i)).collect())
            .unwrap_or_default()
    }

    /// Filtered venues inside the unoccluded part of the map.
    pub fn visible(&mut self) -> Vec<&Venue> {
        self.refresh_filtered();
        let key = self.visible_key();
        let occlusion = self.occlusion();
        let Session {
            ref store,
            ref filtered,
            ref mut visible,
            ref bounds,
            ref view,
            ..
        } = *self;
        let candidates = filtered.peek().map(Vec::as_slice).unwrap_or(&[]);
        let indices = visible.get_or_compute(key, || {
            debug!(candidates = candidates.len(), "recomputing visible venues");
            match bounds {
                Some(bounds) => viewport::clip_indices(
                    store.venues(),
                    candidates,
                    bounds,
                    occlusion,
                    view.as_ref(),
                ),
                None => Vec::new(),
            }
        });
        indices
            .iter()
            .filter_map(|&i| store.venues().get(i))
            .collect()
    }

    pub fn list_status(&mut self) -> ListStatus {
        if self.store.is_empty() {
            if let Some(message) = self.fetch.error() {
                return ListStatus::Failed(message.to_string());
            }
            if self.fetch.is_in_flight() || self.fetch.status() == &FetchStatus::Idle {
                return ListStatus::Loading;
            }
        }
        if self.view.is_none() {
            return ListStatus::Loading;
        }
        match self.visible().len() {
            0 => ListStatus::NoResults,
            n => ListStatus::Results(n),
        }
    }

    /// Hit/miss counters of the (filtered, visible) memo cells.
    pub fn memo_stats(&self) -> ((u64, u64), (u64, u64)) {
        (
            (self.filtered.hits(), self.filtered.misses()),
            (self.visible.hits(), self.visible.misses()),
        )
    }

    fn filtered_key(&self) -> FilteredKey {
        (self.store.generation(), self.filter.clone())
    }

    fn visible_key(&self) -> VisibleKey {
        let bounds = self.bounds.map(|b| rect_key(&b)).unwrap_or_default();
        let view = self.view.map(|v| {
            (
                point_key(&v.center),
                StableF64(v.zoom),
                StableF64(v.width_px),
                StableF64(v.height_px),
            )
        });
        (self.filtered_key(), bounds, self.occlusion().key(), view)
    }

    fn refresh_filtered(&mut self) {
        let key = self.filtered_key();
        let Session {
            ref store,
            filter: ref active,
            ref mut filtered,
            ..
        } = *self;
        filtered.get_or_compute(key, || {
            debug!(generation = store.generation(), "recomputing filtered venues");
            filter::apply_indices(store.venues(), active)
        });
    }
}
