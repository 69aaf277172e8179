//! First-run survey: city, diet, price range and categories.

use foundation::GeoPoint;

use crate::camera::CameraRequest;
use crate::category::Category;
use crate::filter::FilterState;
use crate::venue::{DietaryStyle, PriceTag};

/// Answer meaning "the whole country": no camera move.
pub const ANY_CITY: &str = "Cała Polska";
/// Answer meaning "no dietary constraint".
pub const ANY_DIET: &str = "Bez preferencji";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum City {
    Krakow,
    Warsaw,
    Tricity,
    Wroclaw,
    Poznan,
    Lodz,
}

impl City {
    pub const ALL: [City; 6] = [
        City::Krakow,
        City::Warsaw,
        City::Tricity,
        City::Wroclaw,
        City::Poznan,
        City::Lodz,
    ];

    pub fn label(self) -> &'static str {
        match self {
            City::Krakow => "Kraków",
            City::Warsaw => "Warszawa",
            City::Tricity => "Trójmiasto",
            City::Wroclaw => "Wrocław",
            City::Poznan => "Poznań",
            City::Lodz => "Łódź",
        }
    }

    pub fn from_label(label: &str) -> Option<City> {
        let label = label.trim();
        City::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Camera center and zoom for the city.
    pub fn preset(self) -> (GeoPoint, f64) {
        match self {
            City::Krakow => (GeoPoint::new(50.0647, 19.945), 9.0),
            City::Warsaw => (GeoPoint::new(52.2297, 21.0122), 9.0),
            City::Tricity => (GeoPoint::new(54.4295, 18.5876), 10.0),
            City::Wroclaw => (GeoPoint::new(51.1079, 17.0385), 10.0),
            City::Poznan => (GeoPoint::new(52.4064, 16.9252), 10.0),
            City::Lodz => (GeoPoint::new(51.7592, 19.456), 10.0),
        }
    }
}

/// One survey step as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyQuestion {
    pub prompt: &'static str,
    pub options: Vec<&'static str>,
    pub multiple: bool,
}

/// Survey steps in presentation order.
pub fn questions() -> Vec<SurveyQuestion> {
    let cities = std::iter::once(ANY_CITY).chain(City::ALL.into_iter().map(City::label));
    let diets = [ANY_DIET, "Bezglutenowa", "Wegetariańska", "Wegańska"];
    vec![
        SurveyQuestion {
            prompt: "Wybierz dostępne miasto",
            options: cities.collect(),
            multiple: false,
        },
        SurveyQuestion {
            prompt: "Wybierz preferowaną dietę",
            options: diets.to_vec(),
            multiple: false,
        },
        SurveyQuestion {
            prompt: "Wybierz przedział cenowy",
            options: vec!["1–20 zł", "20–40 zł", "40–60 zł", "$", "$$", "$$$"],
            multiple: true,
        },
        SurveyQuestion {
            prompt: "Wybierz kategorie restauracji",
            options: Category::all().filter_map(Category::label).collect(),
            multiple: true,
        },
    ]
}

/// Parsed survey answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyAnswers {
    pub city: Option<City>,
    pub dietary_style: Option<DietaryStyle>,
    pub prices: Vec<PriceTag>,
    pub categories: Vec<Category>,
}

impl SurveyAnswers {
    /// Builds answers from the option labels the user picked.
    ///
    /// "Cała Polska" and unknown cities mean no city; "Bez preferencji"
    /// means no dietary style.
    pub fn from_labels<S: AsRef<str>>(
        city: Option<&str>,
        diet: Option<&str>,
        prices: &[S],
        categories: &[S],
    ) -> Self {
        let dietary_style = diet
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != ANY_DIET)
            .map(DietaryStyle::from_label);
        Self {
            city: city.and_then(City::from_label),
            dietary_style,
            prices: prices.iter().map(|p| PriceTag::new(p.as_ref())).collect(),
            categories: categories
                .iter()
                .map(|c| Category::from_label(c.as_ref()))
                .collect(),
        }
    }

    /// Replaces the filter with the survey's constraints; the query is
    /// cleared.
    pub fn to_filter(&self) -> FilterState {
        FilterState {
            dietary_style: self.dietary_style.clone(),
            categories: self.categories.iter().copied().collect(),
            prices: self.prices.iter().cloned().collect(),
            ..FilterState::default()
        }
    }

    pub fn camera_request(&self) -> Option<CameraRequest> {
        self.city.map(|city| {
            let (target, zoom) = city.preset();
            CameraRequest::FlyTo { target, zoom }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ANY_CITY, ANY_DIET, City, SurveyAnswers, questions};
    use crate::camera::CameraRequest;
    use crate::category::Category;
    use crate::venue::{DietaryStyle, PriceTag};
    use foundation::GeoPoint;
    use pretty_assertions::assert_eq;

    #[test]
    fn city_presets_fly_to_the_city() {
        let a = SurveyAnswers::from_labels::<&str>(Some("Wrocław"), None, &[], &[]);
        assert_eq!(
            a.camera_request(),
            Some(CameraRequest::FlyTo {
                target: GeoPoint::new(51.1079, 17.0385),
                zoom: 10.0,
            })
        );
        let all = SurveyAnswers::from_labels::<&str>(Some(ANY_CITY), None, &[], &[]);
        assert_eq!(all.camera_request(), None);
    }

    #[test]
    fn no_preference_means_no_dietary_constraint() {
        let a = SurveyAnswers::from_labels::<&str>(None, Some(ANY_DIET), &[], &[]);
        assert_eq!(a.dietary_style, None);
        let b = SurveyAnswers::from_labels::<&str>(None, Some("Wegańska"), &[], &[]);
        assert_eq!(b.dietary_style, Some(DietaryStyle::Vegan));
    }

    #[test]
    fn answers_become_filter_facets() {
        let a = SurveyAnswers::from_labels(
            Some("Kraków"),
            Some("Bezglutenowa"),
            &["$", "$$"],
            &["Pizza", "Ramen"],
        );
        let f = a.to_filter();
        assert_eq!(f.query, "");
        assert_eq!(f.dietary_style, Some(DietaryStyle::GlutenFree));
        assert_eq!(
            f.prices.iter().cloned().collect::<Vec<_>>(),
            vec![PriceTag::new("$"), PriceTag::new("$$")]
        );
        assert!(f.categories.contains(&Category::Pizza));
        assert!(f.categories.contains(&Category::Ramen));
        assert_eq!(f.facet_count(), 5);
    }

    #[test]
    fn question_options_cover_every_city() {
        let qs = questions();
        assert_eq!(qs.len(), 4);
        assert_eq!(qs[0].options.len(), City::ALL.len() + 1);
        assert!(qs[1].options.contains(&ANY_DIET));
        assert!(qs[3].multiple);
        assert!(qs[3].options.contains(&"Kuchnia grecka"));
    }
}
