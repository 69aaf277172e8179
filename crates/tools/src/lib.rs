//! Offline runs of the session pipeline over a CMS response dump.

use foundation::math::WebMercatorView;
use foundation::{GeoPoint, GeoRect};
use serde::Serialize;
use venues::{
    Action, CameraRequest, Category, DietaryStyle, Effect, ListStatus, PriceTag, Session,
    SheetKind, SheetSnap, Venue,
};

/// Camera and screen used for the viewport clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewArgs {
    pub center: GeoPoint,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
    /// Explicit bounds; derived from the camera when absent.
    pub bounds: Option<GeoRect>,
    pub sheet: SheetSnap,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(50.049, 19.944),
            zoom: 11.0,
            width_px: 390.0,
            height_px: 844.0,
            bounds: None,
            sheet: SheetSnap::Peek,
        }
    }
}

impl ViewArgs {
    fn view(&self) -> WebMercatorView {
        WebMercatorView::new(self.center, self.zoom, self.width_px, self.height_px)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    pub query: Option<String>,
    pub diet: Option<String>,
    pub categories: Vec<String>,
    pub food_categories: Vec<String>,
    pub prices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Venue> for Row {
    fn from(v: &Venue) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.name.clone(),
            category: v.category_display().to_string(),
            price: v.price.as_ref().map(|p| p.as_str().to_string()),
            lat: v.location.lat,
            lng: v.location.lng,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput {
    pub status: String,
    pub filtered: Vec<Row>,
    pub visible: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveOutput {
    pub selected: Option<Row>,
    /// `[lat, lng, zoom]` of the recenter request.
    pub camera: Option<[f64; 3]>,
    pub url: Option<String>,
}

/// Session holding `venues` as a freshly loaded batch.
pub fn loaded_session(venues: Vec<Venue>, fingerprint: Option<String>) -> Session {
    let mut session = Session::default();
    let ticket = session.begin_fetch();
    session.dispatch(Action::VenuesLoaded {
        ticket,
        venues,
        fingerprint,
    });
    session
}

fn show(session: &mut Session, view: &ViewArgs) {
    let v = view.view();
    let bounds = view.bounds.unwrap_or_else(|| v.bounds());
    session.dispatch(Action::LayoutChanged {
        width_px: view.width_px,
    });
    session.dispatch(Action::SheetSnapped {
        sheet: SheetKind::List,
        snap: view.sheet,
    });
    session.dispatch(Action::MapMoved { view: v, bounds });
}

pub fn run_query(venues: Vec<Venue>, filters: &FilterArgs, view: &ViewArgs) -> QueryOutput {
    let mut session = loaded_session(venues, None);
    show(&mut session, view);

    if let Some(query) = &filters.query {
        session.dispatch(Action::QueryChanged(query.clone()));
    }
    if let Some(diet) = &filters.diet {
        session.dispatch(Action::DietaryStyleToggled(DietaryStyle::from_label(diet)));
    }
    for label in &filters.categories {
        session.dispatch(Action::CategoryToggled(Category::from_label(label)));
    }
    for tag in &filters.food_categories {
        session.dispatch(Action::FoodCategoryToggled(tag.clone()));
    }
    for price in &filters.prices {
        session.dispatch(Action::PriceToggled(PriceTag::new(price.as_str())));
    }

    let status = match session.list_status() {
        ListStatus::Loading => "loading".to_string(),
        ListStatus::Failed(message) => format!("failed: {message}"),
        ListStatus::NoResults => "no results".to_string(),
        ListStatus::Results(n) => format!("{n} result(s)"),
    };
    let filtered = session.filtered().into_iter().map(Row::from).collect();
    let visible = session.visible().into_iter().map(Row::from).collect();
    QueryOutput {
        status,
        filtered,
        visible,
    }
}

pub fn run_resolve(venues: Vec<Venue>, link: &str, view: Option<&ViewArgs>) -> ResolveOutput {
    let mut session = loaded_session(venues, None);
    if let Some(view) = view {
        show(&mut session, view);
    }
    let effects = session.dispatch(Action::DeepLinkChanged(Some(link.to_string())));

    let camera = effects.iter().find_map(|e| match e {
        Effect::Camera(CameraRequest::Recenter { target, zoom }) => {
            Some([target.lat, target.lng, *zoom])
        }
        _ => None,
    });
    let url = effects.iter().find_map(|e| match e {
        Effect::PushDeepLink(slug) => Some(catalog::link_search(slug.as_deref())),
        _ => None,
    });
    ResolveOutput {
        selected: session.selected_venue().map(Row::from),
        camera,
        url,
    }
}
