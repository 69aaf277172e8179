use std::collections::HashMap;

use foundation::VenueId;
use tracing::{debug, warn};

use crate::venue::Venue;

/// Venue batch from the most recent successful fetch.
///
/// The batch is immutable: a refetch replaces it wholesale and bumps
/// `generation`, which derived state uses as its cache key.
#[derive(Debug, Default)]
pub struct VenueStore {
    venues: Vec<Venue>,
    by_id: HashMap<VenueId, usize>,
    generation: u64,
    fingerprint: Option<String>,
}

impl VenueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the batch. Returns `false` when `fingerprint` matches the
    /// current batch, in which case nothing changes.
    ///
    /// Duplicate ids keep their first occurrence; venues with invalid
    /// coordinates are dropped.
    pub fn replace(&mut self, batch: Vec<Venue>, fingerprint: Option<String>) -> bool {
        if fingerprint.is_some() && fingerprint == self.fingerprint {
            debug!(generation = self.generation, "venue batch unchanged");
            return false;
        }

        let mut venues = Vec::with_capacity(batch.len());
        let mut by_id = HashMap::with_capacity(batch.len());
        for venue in batch {
            if !venue.location.is_valid() {
                warn!(id = %venue.id, name = %venue.name, "dropping venue with invalid coordinate");
                continue;
            }
            if by_id.contains_key(&venue.id) {
                warn!(id = %venue.id, name = %venue.name, "dropping duplicate venue id");
                continue;
            }
            by_id.insert(venue.id.clone(), venues.len());
            venues.push(venue);
        }

        self.venues = venues;
        self.by_id = by_id;
        self.fingerprint = fingerprint;
        self.generation += 1;
        debug!(
            generation = self.generation,
            count = self.venues.len(),
            "venue store replaced"
        );
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, id: &VenueId) -> Option<&Venue> {
        self.by_id.get(id).map(|&i| &self.venues[i])
    }

    pub fn contains(&self, id: &VenueId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Resolves a deep-link value against slugs and names.
    ///
    /// Spaces in the value are turned back into `+` before comparing with
    /// slugs (query-string decoding turns `+` into spaces). Names are
    /// compared both as given and normalized.
    pub fn resolve_link(&self, value: &str) -> Option<&Venue> {
        let raw = value.trim();
        if raw.is_empty() {
            return None;
        }
        let normalized = raw.replace(' ', "+");
        self.venues
            .iter()
            .find(|v| v.slug == normalized || v.name == raw || v.name == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::VenueStore;
    use crate::venue::Venue;
    use foundation::{GeoPoint, VenueId};

    fn v(id: u64, name: &str, lat: f64, lng: f64) -> Venue {
        Venue::new(id, name, GeoPoint::new(lat, lng))
    }

    #[test]
    fn replace_bumps_generation_and_indexes() {
        let mut store = VenueStore::new();
        assert!(store.is_empty());
        assert!(store.replace(vec![v(1, "A", 50.0, 20.0), v(2, "B", 10.0, 10.0)], None));
        assert_eq!(store.generation(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&VenueId::from(2)).map(|v| v.name.as_str()), Some("B"));

        assert!(store.replace(vec![v(3, "C", 0.0, 0.0)], None));
        assert_eq!(store.generation(), 2);
        assert!(!store.contains(&VenueId::from(1)));
    }

    #[test]
    fn identical_fingerprint_is_a_no_op() {
        let mut store = VenueStore::new();
        assert!(store.replace(vec![v(1, "A", 50.0, 20.0)], Some("abc".into())));
        assert!(!store.replace(vec![], Some("abc".into())));
        assert_eq!(store.generation(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.fingerprint(), Some("abc"));
    }

    #[test]
    fn duplicates_and_invalid_coordinates_are_dropped() {
        let mut store = VenueStore::new();
        store.replace(
            vec![
                v(1, "first", 50.0, 20.0),
                v(1, "second", 51.0, 21.0),
                v(2, "nowhere", f64::NAN, 0.0),
                v(3, "pole", 95.0, 0.0),
            ],
            None,
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&VenueId::from(1)).map(|v| v.name.as_str()), Some("first"));
    }

    #[test]
    fn resolve_link_matches_slug_or_name() {
        let mut store = VenueStore::new();
        store.replace(
            vec![
                v(1, "Bar Mleczny", 50.0, 20.0),
                v(2, "Sushi Zen", 10.0, 10.0).with_slug("sushi-zen"),
            ],
            None,
        );
        assert_eq!(store.resolve_link("sushi-zen").map(|v| v.id.clone()), Some(VenueId::from(2)));
        assert_eq!(store.resolve_link("Bar Mleczny").map(|v| v.id.clone()), Some(VenueId::from(1)));
        assert_eq!(store.resolve_link("Bar+Mleczny").map(|v| v.id.clone()), Some(VenueId::from(1)));
        assert_eq!(store.resolve_link("Sushi Zen").map(|v| v.id.clone()), Some(VenueId::from(2)));
        assert!(store.resolve_link("missing").is_none());
        assert!(store.resolve_link("  ").is_none());
    }
}
