//! JSON shapes exchanged with the page script.

use catalog::link_search;
use serde::{Deserialize, Serialize};
use venues::onboarding::{SurveyQuestion, questions};
use venues::{CameraRequest, Effect, ListStatus, SurveyAnswers, Venue};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectDto {
    /// Pan only; `zoom` is absent.
    EaseTo {
        lat: f64,
        lng: f64,
    },
    FlyTo {
        lat: f64,
        lng: f64,
        zoom: f64,
    },
    OpenDetails {
        id: String,
    },
    CloseDetails,
    /// `search` is the full search string; empty clears the parameter.
    PushUrl {
        search: String,
    },
    SnapListSheet {
        index: usize,
    },
    SnapDetailsSheet {
        index: usize,
    },
    PersistOnboarded,
}

impl From<&Effect> for EffectDto {
    fn from(effect: &Effect) -> Self {
        match effect {
            Effect::Camera(CameraRequest::Nudge { center }) => EffectDto::EaseTo {
                lat: center.lat,
                lng: center.lng,
            },
            Effect::Camera(
                CameraRequest::Recenter { target, zoom } | CameraRequest::FlyTo { target, zoom },
            ) => EffectDto::FlyTo {
                lat: target.lat,
                lng: target.lng,
                zoom: *zoom,
            },
            Effect::OpenDetails(id) => EffectDto::OpenDetails { id: id.to_string() },
            Effect::CloseDetails => EffectDto::CloseDetails,
            Effect::PushDeepLink(slug) => EffectDto::PushUrl {
                search: link_search(slug.as_deref()),
            },
            Effect::RestoreSheetSnap(snap) => EffectDto::SnapListSheet { index: snap.index() },
            Effect::SnapDetailsSheet(snap) => EffectDto::SnapDetailsSheet { index: snap.index() },
            Effect::PersistOnboarded => EffectDto::PersistOnboarded,
        }
    }
}

pub fn effects_json(effects: &[Effect]) -> Result<String, serde_json::Error> {
    let dtos: Vec<EffectDto> = effects.iter().map(EffectDto::from).collect();
    serde_json::to_string(&dtos)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueDto {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub icon: &'static str,
    pub dietary_styles: Vec<String>,
    pub badges: Vec<&'static str>,
    pub food_categories: Vec<String>,
    pub price: Option<String>,
    pub website: Option<String>,
    pub google_maps: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Venue> for VenueDto {
    fn from(v: &Venue) -> Self {
        Self {
            id: v.id.to_string(),
            slug: v.slug.clone(),
            name: v.name.clone(),
            address: v.address.clone(),
            lat: v.location.lat,
            lng: v.location.lng,
            category: v.category_display().to_string(),
            icon: v.category.icon(),
            dietary_styles: v.dietary_styles.iter().map(|s| s.label().to_string()).collect(),
            badges: v.dietary_styles.iter().filter_map(|s| s.badge()).collect(),
            food_categories: v.food_categories.clone(),
            price: v.price.as_ref().map(|p| p.as_str().to_string()),
            website: v.links.website.clone(),
            google_maps: v.links.google_maps.clone(),
            image_url: v.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListDto {
    Loading,
    Failed { message: String },
    NoResults,
    Results { venues: Vec<VenueDto> },
}

impl ListDto {
    pub fn new(status: ListStatus, visible: &[&Venue]) -> Self {
        match status {
            ListStatus::Loading => ListDto::Loading,
            ListStatus::Failed(message) => ListDto::Failed { message },
            ListStatus::NoResults => ListDto::NoResults,
            ListStatus::Results(_) => ListDto::Results {
                venues: visible.iter().copied().map(VenueDto::from).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDto {
    pub prompt: &'static str,
    pub options: Vec<&'static str>,
    pub multiple: bool,
}

impl From<SurveyQuestion> for QuestionDto {
    fn from(q: SurveyQuestion) -> Self {
        Self {
            prompt: q.prompt,
            options: q.options,
            multiple: q.multiple,
        }
    }
}

pub fn questions_json() -> Result<String, serde_json::Error> {
    let dtos: Vec<QuestionDto> = questions().into_iter().map(QuestionDto::from).collect();
    serde_json::to_string(&dtos)
}

/// Survey answers as option labels, one list per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SurveyDto {
    pub city: Option<String>,
    pub diet: Option<String>,
    pub prices: Vec<String>,
    pub categories: Vec<String>,
}

impl SurveyDto {
    pub fn to_answers(&self) -> SurveyAnswers {
        SurveyAnswers::from_labels(
            self.city.as_deref(),
            self.diet.as_deref(),
            self.prices.as_slice(),
            self.categories.as_slice(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectDto, ListDto, SurveyDto, effects_json, questions_json};
    use foundation::{GeoPoint, VenueId};
    use pretty_assertions::assert_eq;
    use venues::{CameraRequest, City, Effect, ListStatus, SheetSnap, Venue};

    #[test]
    fn effects_serialize_as_tagged_objects() {
        let json = effects_json(&[
            Effect::OpenDetails(VenueId::from(7)),
            Effect::PushDeepLink(Some("Pizza+Roma".into())),
            Effect::PushDeepLink(None),
            Effect::RestoreSheetSnap(SheetSnap::Peek),
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"[{"type":"open_details","id":"7"},{"type":"push_url","search":"?restaurant=Pizza+Roma"},{"type":"push_url","search":""},{"type":"snap_list_sheet","index":2}]"#
        );
    }

    #[test]
    fn camera_requests_map_to_map_calls() {
        let nudge = Effect::Camera(CameraRequest::Nudge {
            center: GeoPoint::new(50.0, 20.0),
        });
        assert_eq!(EffectDto::from(&nudge), EffectDto::EaseTo { lat: 50.0, lng: 20.0 });
        let recenter = Effect::Camera(CameraRequest::Recenter {
            target: GeoPoint::new(10.0, 10.0),
            zoom: 15.0,
        });
        assert_eq!(
            EffectDto::from(&recenter),
            EffectDto::FlyTo {
                lat: 10.0,
                lng: 10.0,
                zoom: 15.0
            }
        );
    }

    #[test]
    fn list_view_carries_status_and_venues() {
        let v = Venue::new(1u64, "Pizza", GeoPoint::new(50.0, 20.0))
            .with_category_label("Pizza")
            .with_price("$");
        let json = serde_json::to_value(ListDto::new(ListStatus::Results(1), &[&v])).unwrap();
        assert_eq!(json["status"], "results");
        assert_eq!(json["venues"][0]["name"], "Pizza");
        assert_eq!(json["venues"][0]["icon"], "/assets/svg/emoji/pizza.svg");
        let json = serde_json::to_value(ListDto::new(ListStatus::Failed("boom".into()), &[])).unwrap();
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn survey_payload_parses_into_answers() {
        let dto: SurveyDto =
            serde_json::from_str(r#"{"city":"Łódź","diet":"Bez preferencji","prices":["$$"]}"#)
                .unwrap();
        let answers = dto.to_answers();
        assert_eq!(answers.city, Some(City::Lodz));
        assert_eq!(answers.dietary_style, None);
        assert_eq!(answers.prices.len(), 1);
        assert!(answers.categories.is_empty());
    }

    #[test]
    fn questions_are_exposed() {
        let json: serde_json::Value = serde_json::from_str(&questions_json().unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(4));
        assert_eq!(json[0]["options"][0], "Cała Polska");
    }
}
