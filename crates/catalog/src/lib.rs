//! CMS ingestion, deep links, CMS configuration and persisted preferences.

pub mod config;
pub mod deep_link;
pub mod ingest;
pub mod prefs;
pub mod wire;

pub use config::CmsConfig;
pub use deep_link::{RESTAURANT_PARAM, link_search, restaurant_param};
pub use ingest::{DroppedRecord, IngestReport, fingerprint, ingest, ingest_response};
pub use prefs::{InMemoryPreferenceStore, LocalStoragePreferenceStore, PreferenceStore};
pub use wire::{
    GraphqlRequest, MalformedRecord, ParsedResponse, VenueRecord, parse_response, venue_query,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    MissingConfig(&'static str),
    /// The CMS answered with a GraphQL `errors` array.
    Graphql(String),
    Corrupt(String),
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::MissingConfig(var) => write!(f, "missing configuration: {var}"),
            CatalogError::Graphql(msg) => write!(f, "CMS query failed: {msg}"),
            CatalogError::Corrupt(msg) => write!(f, "malformed CMS response: {msg}"),
            CatalogError::StorageUnavailable => write!(f, "browser storage unavailable"),
            CatalogError::Io(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
