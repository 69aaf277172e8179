//! Free-text and facet filtering.
//!
//! Facet semantics:
//! - an empty set (or `None`) is "no constraint"
//! - set facets use exact membership (food-category tags compare
//!   case-insensitively)
//! - active constraints are ANDed

use std::collections::BTreeSet;

use crate::category::Category;
use crate::venue::{DietaryStyle, PriceTag, Venue};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub dietary_style: Option<DietaryStyle>,
    pub categories: BTreeSet<Category>,
    pub food_categories: BTreeSet<String>,
    pub prices: BTreeSet<PriceTag>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty() && !self.has_facets()
    }

    pub fn has_facets(&self) -> bool {
        self.dietary_style.is_some()
            || !self.categories.is_empty()
            || !self.food_categories.is_empty()
            || !self.prices.is_empty()
    }

    /// Number of active facet values, for the filter button badge.
    pub fn facet_count(&self) -> usize {
        usize::from(self.dietary_style.is_some())
            + self.categories.len()
            + self.food_categories.len()
            + self.prices.len()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Selecting the active style again clears it.
    pub fn toggle_dietary_style(&mut self, style: DietaryStyle) {
        if self.dietary_style.as_ref() == Some(&style) {
            self.dietary_style = None;
        } else {
            self.dietary_style = Some(style);
        }
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_food_category(&mut self, tag: impl Into<String>) {
        let tag = tag.into().trim().to_string();
        let existing = self
            .food_categories
            .iter()
            .find(|t| t.to_lowercase() == tag.to_lowercase())
            .cloned();
        match existing {
            Some(t) => {
                self.food_categories.remove(&t);
            }
            None => {
                self.food_categories.insert(tag);
            }
        }
    }

    pub fn toggle_price(&mut self, price: PriceTag) {
        toggle(&mut self.prices, price);
    }

    /// Clears facets but keeps the search text.
    pub fn clear_facets(&mut self) {
        self.dietary_style = None;
        self.categories.clear();
        self.food_categories.clear();
        self.prices.clear();
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.clear_facets();
    }

    pub fn matches(&self, venue: &Venue) -> bool {
        Matcher::new(self).matches(venue)
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// `FilterState` with its text parts normalized once per evaluation.
struct Matcher<'f> {
    filter: &'f FilterState,
    needle: Option<String>,
    food: Vec<String>,
}

impl<'f> Matcher<'f> {
    fn new(filter: &'f FilterState) -> Self {
        let trimmed = filter.query.trim();
        Self {
            filter,
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
            food: filter
                .food_categories
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, venue: &Venue) -> bool {
        if let Some(needle) = &self.needle
            && !venue.name.to_lowercase().contains(needle.as_str())
        {
            return false;
        }

        if let Some(style) = &self.filter.dietary_style
            && !venue.has_dietary_style(style)
        {
            return false;
        }

        if !self.filter.categories.is_empty() && !self.filter.categories.contains(&venue.category) {
            return false;
        }

        if !self.food.is_empty()
            && !venue
                .food_categories
                .iter()
                .any(|t| self.food.contains(&t.trim().to_lowercase()))
        {
            return false;
        }

        if !self.filter.prices.is_empty() {
            let Some(price) = &venue.price else {
                return false;
            };
            if !self.filter.prices.contains(price) {
                return false;
            }
        }

        true
    }
}

/// Indices of the venues matching `filter`, in input order.
pub fn apply_indices(venues: &[Venue], filter: &FilterState) -> Vec<usize> {
    if filter.is_unconstrained() {
        return (0..venues.len()).collect();
    }
    let matcher = Matcher::new(filter);
    venues
        .iter()
        .enumerate()
        .filter(|(_, v)| matcher.matches(v))
        .map(|(i, _)| i)
        .collect()
}

/// Venues matching `filter`, in input order. An empty result is a valid
/// "no results" answer, not an error.
pub fn apply<'a>(venues: &'a [Venue], filter: &FilterState) -> Vec<&'a Venue> {
    apply_indices(venues, filter)
        .into_iter()
        .map(|i| &venues[i])
        .collect()
}

/// Staged filter edits, committed only on apply.
///
/// Mirrors the filter sheet: it opens with a copy of the active filters,
/// edits stay local, closing without applying discards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDraft {
    staged: FilterState,
}

impl FilterDraft {
    pub fn open(current: &FilterState) -> Self {
        Self {
            staged: current.clone(),
        }
    }

    pub fn staged(&self) -> &FilterState {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut FilterState {
        &mut self.staged
    }

    pub fn clear(&mut self) {
        self.staged.clear_facets();
    }

    pub fn commit(self) -> FilterState {
        self.staged
    }
}
