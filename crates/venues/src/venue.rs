use foundation::{GeoPoint, VenueId};

use crate::category::Category;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DietaryStyle {
    GlutenFree,
    Vegetarian,
    Vegan,
    Other(String),
}

impl DietaryStyle {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Bezglutenowa" => DietaryStyle::GlutenFree,
            "Wegetariańska" => DietaryStyle::Vegetarian,
            "Wegańska" => DietaryStyle::Vegan,
            other => DietaryStyle::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DietaryStyle::GlutenFree => "Bezglutenowa",
            DietaryStyle::Vegetarian => "Wegetariańska",
            DietaryStyle::Vegan => "Wegańska",
            DietaryStyle::Other(label) => label,
        }
    }

    /// Badge shown next to the venue name, if any.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            DietaryStyle::GlutenFree => Some("wheat-off"),
            DietaryStyle::Vegetarian => Some("leaf"),
            DietaryStyle::Vegan => Some("seedling"),
            DietaryStyle::Other(_) => None,
        }
    }
}

/// Price bucket as labelled by the CMS ("$", "$$", "20–40 zł", ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceTag(String);

impl PriceTag {
    pub fn new(label: impl Into<String>) -> Self {
        PriceTag(label.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PriceTag {
    fn from(s: &str) -> Self {
        PriceTag::new(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueLinks {
    pub website: Option<String>,
    pub google_maps: Option<String>,
}

/// One restaurant or café as delivered by a fetch batch.
///
/// `location` is always valid for venues produced by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: VenueId,
    pub slug: String,
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub category: Category,
    /// Raw CMS label, kept for display when `category` is `Other`.
    pub category_label: String,
    pub dietary_styles: Vec<DietaryStyle>,
    pub food_categories: Vec<String>,
    pub price: Option<PriceTag>,
    pub links: VenueLinks,
    pub image_url: Option<String>,
}

impl Venue {
    pub fn new(id: impl Into<VenueId>, name: impl Into<String>, location: GeoPoint) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            address: String::new(),
            location,
            category: Category::Other,
            category_label: String::new(),
            dietary_styles: Vec::new(),
            food_categories: Vec::new(),
            price: None,
            links: VenueLinks::default(),
            image_url: None,
        }
    }

    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.category = Category::from_label(&label);
        self.category_label = label;
        self
    }

    pub fn with_price(mut self, price: impl Into<PriceTag>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_dietary_styles(mut self, styles: impl IntoIterator<Item = DietaryStyle>) -> Self {
        self.dietary_styles = styles.into_iter().collect();
        self
    }

    pub fn with_food_categories<S: Into<String>>(
        mut self,
        tags: impl IntoIterator<Item = S>,
    ) -> Self {
        self.food_categories = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn has_dietary_style(&self, style: &DietaryStyle) -> bool {
        self.dietary_styles.iter().any(|s| s == style)
    }

    /// Display label for the category column.
    pub fn category_display(&self) -> &str {
        self.category.label().unwrap_or(&self.category_label)
    }
}

/// URL slug derived from a name: spaces become `+`, as the CMS does.
pub fn slugify(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("+")
}
