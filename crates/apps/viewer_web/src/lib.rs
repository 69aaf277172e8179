use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use catalog::{
    CmsConfig, GraphqlRequest, InMemoryPreferenceStore, IngestReport, LocalStoragePreferenceStore,
    PreferenceStore, restaurant_param,
};
use foundation::math::WebMercatorView;
use foundation::{GeoPoint, GeoRect, VenueId};
use runtime::FetchTicket;
use venues::{
    Action, Category, DietaryStyle, Effect, PriceTag, Session, SessionConfig, SheetKind, SheetSnap,
};

mod dto;
mod error;

pub use error::ViewerError;

struct ViewerState {
    session: Session,
    cms: Option<CmsConfig>,
    prefs: Box<dyn PreferenceStore>,
}

impl ViewerState {
    fn new() -> Self {
        let prefs: Box<dyn PreferenceStore> = match LocalStoragePreferenceStore::new() {
            Ok(store) => Box::new(store),
            Err(_) => Box::new(InMemoryPreferenceStore::new()),
        };
        Self {
            session: Session::new(SessionConfig::default()),
            cms: None,
            prefs,
        }
    }

    /// Runs an action and performs the effects that belong to this side of
    /// the boundary.
    fn apply(&mut self, action: Action) -> Vec<Effect> {
        let effects = self.session.dispatch(action);
        for event in self.session.take_events() {
            web_sys::console::debug_1(&JsValue::from_str(&format!(
                "#{} {}: {}",
                event.seq, event.kind, event.message
            )));
        }
        if effects.contains(&Effect::PersistOnboarded)
            && let Err(err) = self.prefs.set_onboarded(true)
        {
            warn(&format!("could not persist onboarding flag: {err}"));
        }
        effects
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::new());
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// Dispatches `action` and returns the resulting effects as JSON.
fn dispatch(action: Action) -> Result<String, JsValue> {
    let effects = STATE.with(|state| state.borrow_mut().apply(action));
    Ok(dto::effects_json(&effects).map_err(ViewerError::from)?)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Sets the CMS connection; `environment` defaults to `master`.
#[wasm_bindgen]
pub fn configure(space_id: &str, access_token: &str, environment: Option<String>) {
    let mut config = CmsConfig::new(space_id, access_token);
    if let Some(env) = environment.filter(|e| !e.trim().is_empty()) {
        config.environment = env;
    }
    STATE.with(|state| state.borrow_mut().cms = Some(config));
}

/// Camera the map should be created with: `{lat, lng, zoom}`.
#[wasm_bindgen]
pub fn initial_camera() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        let cfg = s.session.config();
        format!(
            r#"{{"lat":{},"lng":{},"zoom":{}}}"#,
            cfg.initial_center.lat, cfg.initial_center.lng, cfg.initial_zoom
        )
    })
}

/// Fetches the venue batch. `on_effects` receives the effects JSON produced
/// once the response has been applied.
#[wasm_bindgen]
pub fn load_venues(on_effects: js_sys::Function) -> Result<(), JsValue> {
    let (config, ticket) = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let config = s.cms.clone().ok_or(ViewerError::NotConfigured)?;
        Ok::<_, ViewerError>((config, s.session.begin_fetch()))
    })?;

    spawn_local(async move {
        let action = loaded_action(ticket, fetch_venues(&config).await);
        match dispatch(action) {
            Ok(json) => {
                if let Err(err) = on_effects.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    warn(&format!("effects callback failed: {:?}", err));
                }
            }
            Err(err) => warn(&format!("applying venues failed: {:?}", err)),
        }
    });
    Ok(())
}

fn loaded_action(ticket: FetchTicket, result: Result<IngestReport, ViewerError>) -> Action {
    match result {
        Ok(report) => {
            if !report.dropped.is_empty() {
                warn(&format!("{} venue record(s) dropped", report.dropped.len()));
            }
            log(&format!("loaded {} venues", report.venues.len()));
            Action::VenuesLoaded {
                ticket,
                venues: report.venues,
                fingerprint: Some(report.fingerprint),
            }
        }
        Err(err) => {
            warn(&format!("Error fetching venues: {err}"));
            Action::FetchFailed {
                ticket,
                message: err.to_string(),
            }
        }
    }
}

async fn fetch_venues(config: &CmsConfig) -> Result<IngestReport, ViewerError> {
    let resp = Request::post(&config.endpoint())
        .header("Authorization", &config.bearer())
        .json(&GraphqlRequest::venues(config.limit))?
        .send()
        .await?;
    if !resp.ok() {
        return Err(ViewerError::Http(format!("HTTP {}", resp.status())));
    }
    let body = resp.text().await?;
    Ok(catalog::ingest_response(&body)?)
}

/// Map `moveend`: camera plus the visible bounds reported by the map.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn map_moved(
    center_lat: f64,
    center_lng: f64,
    zoom: f64,
    width_px: f64,
    height_px: f64,
    west: f64,
    south: f64,
    east: f64,
    north: f64,
) -> Result<String, JsValue> {
    dispatch(Action::MapMoved {
        view: WebMercatorView::new(GeoPoint::new(center_lat, center_lng), zoom, width_px, height_px),
        bounds: GeoRect::new(west, south, east, north),
    })
}

#[wasm_bindgen]
pub fn layout_changed(width_px: f64) -> Result<String, JsValue> {
    dispatch(Action::LayoutChanged { width_px })
}

/// `sheet` is `"list"` or `"details"`; `index` is the snap point index.
#[wasm_bindgen]
pub fn sheet_snapped(sheet: &str, index: usize) -> Result<String, JsValue> {
    let sheet = match sheet {
        "list" => SheetKind::List,
        "details" => SheetKind::Details,
        other => return Err(JsValue::from_str(&format!("unknown sheet: {other}"))),
    };
    let snap = SheetSnap::from_index(index)
        .ok_or_else(|| JsValue::from_str(&format!("invalid snap index: {index}")))?;
    dispatch(Action::SheetSnapped { sheet, snap })
}

#[wasm_bindgen]
pub fn set_query(query: &str) -> Result<String, JsValue> {
    dispatch(Action::QueryChanged(query.to_string()))
}

#[wasm_bindgen]
pub fn open_filters() -> Result<String, JsValue> {
    dispatch(Action::FilterSheetOpened)
}

#[wasm_bindgen]
pub fn close_filters() -> Result<String, JsValue> {
    dispatch(Action::FilterSheetClosed)
}

#[wasm_bindgen]
pub fn toggle_dietary_style(label: &str) -> Result<String, JsValue> {
    dispatch(Action::DietaryStyleToggled(DietaryStyle::from_label(label)))
}

#[wasm_bindgen]
pub fn toggle_category(label: &str) -> Result<String, JsValue> {
    dispatch(Action::CategoryToggled(Category::from_label(label)))
}

#[wasm_bindgen]
pub fn toggle_food_category(tag: &str) -> Result<String, JsValue> {
    dispatch(Action::FoodCategoryToggled(tag.to_string()))
}

#[wasm_bindgen]
pub fn toggle_price(tag: &str) -> Result<String, JsValue> {
    dispatch(Action::PriceToggled(PriceTag::new(tag)))
}

#[wasm_bindgen]
pub fn clear_filters() -> Result<String, JsValue> {
    dispatch(Action::FiltersCleared)
}

#[wasm_bindgen]
pub fn apply_filters() -> Result<String, JsValue> {
    dispatch(Action::FiltersApplied)
}

#[wasm_bindgen]
pub fn reset_filters() -> Result<String, JsValue> {
    dispatch(Action::FiltersReset)
}

/// Marker click or list row tap.
#[wasm_bindgen]
pub fn activate_venue(id: &str) -> Result<String, JsValue> {
    dispatch(Action::VenueActivated(VenueId::new(id)))
}

/// Called with `location.search` on load and on every history change.
#[wasm_bindgen]
pub fn deep_link_changed(search: &str) -> Result<String, JsValue> {
    dispatch(Action::DeepLinkChanged(restaurant_param(search)))
}

#[wasm_bindgen]
pub fn dismiss_details() -> Result<String, JsValue> {
    dispatch(Action::DetailsDismissed)
}

#[wasm_bindgen]
pub fn has_onboarded() -> bool {
    STATE.with(|state| match state.borrow().prefs.has_onboarded() {
        Ok(flag) => flag,
        Err(err) => {
            warn(&format!("could not read onboarding flag: {err}"));
            false
        }
    })
}

#[wasm_bindgen]
pub fn survey_questions() -> Result<String, JsValue> {
    Ok(dto::questions_json().map_err(ViewerError::from)?)
}

/// `answers_json`: `{city, diet, prices: [], categories: []}` as labels.
#[wasm_bindgen]
pub fn complete_survey(answers_json: &str) -> Result<String, JsValue> {
    let survey: dto::SurveyDto = serde_json::from_str(answers_json).map_err(ViewerError::from)?;
    dispatch(Action::SurveyCompleted(survey.to_answers()))
}

/// List sheet contents: status plus the visible venues.
#[wasm_bindgen]
pub fn list_view() -> Result<String, JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let status = s.session.list_status();
        let visible = s.session.visible();
        let view = dto::ListDto::new(status, &visible);
        Ok(serde_json::to_string(&view).map_err(ViewerError::from)?)
    })
}

/// Details panel contents, or `null` when nothing is selected.
#[wasm_bindgen]
pub fn details_view() -> Result<String, JsValue> {
    STATE.with(|state| {
        let s = state.borrow();
        let venue = s.session.selected_venue().map(dto::VenueDto::from);
        Ok(serde_json::to_string(&venue).map_err(ViewerError::from)?)
    })
}

/// Active filters (or the staged ones while the filter sheet is open) and
/// the number of active facets.
#[wasm_bindgen]
pub fn filter_summary() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        let f = s.session.draft().unwrap_or(s.session.filter());
        format!(
            r#"{{"query":{},"facets":{}}}"#,
            serde_json::Value::from(f.query.as_str()),
            f.facet_count()
        )
    })
}
