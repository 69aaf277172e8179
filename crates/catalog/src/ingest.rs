//! Turns CMS records into validated venues.
//!
//! Records without a usable id, name or coordinate, and repeated ids, are
//! dropped with a warning; they never fail the batch.

use std::collections::HashSet;

use foundation::{GeoPoint, VenueId};
use tracing::{debug, warn};
use venues::{DietaryStyle, Venue, VenueLinks};

use crate::CatalogError;
use crate::wire::{VenueRecord, parse_response};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub venues: Vec<Venue>,
    pub dropped: Vec<DroppedRecord>,
    /// Content hash of the accepted records; equal batches hash equally.
    pub fingerprint: String,
}

/// Content hash over the canonical JSON of `records`.
pub fn fingerprint(records: &[VenueRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        // Serializing plain data into a Vec cannot fail.
        if let Ok(bytes) = serde_json::to_vec(record) {
            hasher.update(&bytes);
        }
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

pub fn ingest(records: Vec<VenueRecord>) -> IngestReport {
    let mut venues = Vec::with_capacity(records.len());
    let mut accepted = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        match validate(&record, &seen) {
            Ok(venue) => {
                seen.insert(venue.id.clone());
                venues.push(venue);
                accepted.push(record);
            }
            Err(reason) => {
                let id = record.id.as_ref().map(ToString::to_string);
                warn!(
                    id = id.as_deref().unwrap_or("?"),
                    name = record.name.as_deref().unwrap_or("?"),
                    reason,
                    "dropping venue record"
                );
                dropped.push(DroppedRecord {
                    id,
                    name: record.name.clone(),
                    reason,
                });
            }
        }
    }

    let fingerprint = fingerprint(&accepted);
    debug!(
        accepted = venues.len(),
        dropped = dropped.len(),
        %fingerprint,
        "ingested venue batch"
    );
    IngestReport {
        venues,
        dropped,
        fingerprint,
    }
}

/// Parses and ingests a raw GraphQL response body. Items that fail to
/// decode are reported as dropped alongside the validation drops.
pub fn ingest_response(body: &str) -> Result<IngestReport, CatalogError> {
    let parsed = parse_response(body)?;
    let mut report = ingest(parsed.records);
    for bad in parsed.malformed {
        warn!(
            id = bad.id.as_deref().unwrap_or("?"),
            name = bad.name.as_deref().unwrap_or("?"),
            error = %bad.error,
            "dropping malformed venue record"
        );
        report.dropped.push(DroppedRecord {
            id: bad.id,
            name: bad.name,
            reason: "malformed record",
        });
    }
    Ok(report)
}

fn validate(record: &VenueRecord, seen: &HashSet<VenueId>) -> Result<Venue, &'static str> {
    let id = record
        .id
        .as_ref()
        .map(|id| VenueId::new(id.to_string()))
        .ok_or("missing id")?;
    if seen.contains(&id) {
        return Err("duplicate id");
    }
    let name = non_empty(&record.name).ok_or("missing name")?;
    let (Some(lat), Some(lng)) = (record.lat, record.lng) else {
        return Err("missing coordinate");
    };
    let location = GeoPoint::new(lat, lng);
    if !location.is_valid() {
        return Err("invalid coordinate");
    }

    let mut venue = Venue::new(id, name, location)
        .with_category_label(record.kind.as_deref().unwrap_or_default())
        .with_dietary_styles(
            record
                .dietary_styles
                .iter()
                .flatten()
                .filter(|s| !s.trim().is_empty())
                .map(|s| DietaryStyle::from_label(s)),
        )
        .with_food_categories(
            record
                .food_categories
                .iter()
                .flatten()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty()),
        );
    if let Some(price) = non_empty(&record.price) {
        venue = venue.with_price(price);
    }
    if let Some(slug) = non_empty(&record.slug) {
        venue = venue.with_slug(slug);
    }
    venue.address = non_empty(&record.address).unwrap_or_default().to_string();
    venue.image_url = record
        .image
        .as_ref()
        .and_then(|i| non_empty(&i.url))
        .map(str::to_string);
    venue.links = VenueLinks {
        website: non_empty(&record.link).map(str::to_string),
        google_maps: non_empty(&record.google_maps_link).map(str::to_string),
    };
    Ok(venue)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{DroppedRecord, fingerprint, ingest, ingest_response};
    use crate::wire::{RecordId, VenueRecord};
    use foundation::VenueId;
    use pretty_assertions::assert_eq;
    use venues::{Category, DietaryStyle, PriceTag};

    fn record(id: i64, name: &str, lat: f64, lng: f64) -> VenueRecord {
        VenueRecord {
            id: Some(RecordId::Number(id)),
            name: Some(name.to_string()),
            lat: Some(lat),
            lng: Some(lng),
            ..VenueRecord::default()
        }
    }

    #[test]
    fn maps_record_fields_onto_venue() {
        let mut r = record(1, "Pizza Roma", 50.0, 20.0);
        r.kind = Some("Pizza".into());
        r.price = Some(" $ ".into());
        r.dietary_styles = Some(vec!["Wegańska".into(), "".into()]);
        r.food_categories = Some(vec!["Pizza".into()]);
        r.link = Some("https://roma.example".into());
        r.google_maps_link = Some("  ".into());

        let report = ingest(vec![r]);
        assert!(report.dropped.is_empty());
        let v = &report.venues[0];
        assert_eq!(v.id, VenueId::from(1));
        assert_eq!(v.slug, "Pizza+Roma");
        assert_eq!(v.category, Category::Pizza);
        assert_eq!(v.price, Some(PriceTag::new("$")));
        assert_eq!(v.dietary_styles, vec![DietaryStyle::Vegan]);
        assert_eq!(v.links.website.as_deref(), Some("https://roma.example"));
        assert_eq!(v.links.google_maps, None);
    }

    #[test]
    fn unknown_category_is_not_an_error() {
        let mut r = record(1, "Sushi", 10.0, 10.0);
        r.kind = Some("Sushi".into());
        let report = ingest(vec![r]);
        assert_eq!(report.venues[0].category, Category::Other);
        assert_eq!(report.venues[0].category_display(), "Sushi");
    }

    #[test]
    fn invalid_records_are_dropped_with_reasons() {
        let mut no_coord = record(2, "Nowhere", 0.0, 0.0);
        no_coord.lng = None;
        let mut no_name = record(4, "", 50.0, 20.0);
        no_name.name = Some("   ".into());
        let report = ingest(vec![
            record(1, "Ok", 50.0, 20.0),
            no_coord,
            record(3, "Off world", 95.0, 20.0),
            no_name,
            record(1, "Again", 50.0, 20.0),
        ]);
        assert_eq!(report.venues.len(), 1);
        let reasons: Vec<_> = report.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                "missing coordinate",
                "invalid coordinate",
                "missing name",
                "duplicate id"
            ]
        );
        assert_eq!(report.dropped[3].id.as_deref(), Some("1"));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = ingest(vec![record(1, "A", 50.0, 20.0)]);
        let b = ingest(vec![record(1, "A", 50.0, 20.0)]);
        let c = ingest(vec![record(1, "A", 50.0, 20.5)]);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.fingerprint, c.fingerprint);
        assert_eq!(a.fingerprint.len(), 64);
        assert_ne!(fingerprint(&[]), a.fingerprint);
    }

    #[test]
    fn ingests_response_body() {
        let body = r#"{"data":{"foodExpoCollection":{"items":[
            {"id":1,"name":"Pizza","lat":50.0,"lng":20.0,"type":"Pizza","price":"$"},
            {"id":2,"name":"Sushi","lat":10.0,"lng":10.0,"type":"Sushi","price":"$$"}
        ]}}}"#;
        let report = ingest_response(body).unwrap();
        assert_eq!(report.venues.len(), 2);
        assert_eq!(report.venues[1].id, VenueId::from(2));
    }

    #[test]
    fn mistyped_record_is_dropped_next_to_good_one() {
        let body = r#"{"data":{"foodExpoCollection":{"items":[
            {"id":1,"name":"Pizza","lat":50.0,"lng":20.0,"type":"Pizza"},
            {"id":2,"name":"Sushi","lat":"50.1","lng":20.0,"type":"Sushi"}
        ]}}}"#;
        let report = ingest_response(body).unwrap();
        assert_eq!(report.venues.len(), 1);
        assert_eq!(report.venues[0].id, VenueId::from(1));
        assert_eq!(
            report.dropped,
            vec![DroppedRecord {
                id: Some("2".into()),
                name: Some("Sushi".into()),
                reason: "malformed record",
            }]
        );
    }
}
