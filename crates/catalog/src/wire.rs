//! GraphQL request and response shapes for the venue collection.

use serde::{Deserialize, Serialize};

use crate::CatalogError;

const RECORD_FIELDS: &str = "id name address lat lng image { url } type foodCategories \
                             dietaryStyles price link googleMapsLink slug";

/// Query for the whole venue collection, ordered by id.
pub fn venue_query(limit: u32) -> String {
    format!("query {{ foodExpoCollection(order: [id_ASC], limit: {limit}) {{ items {{ {RECORD_FIELDS} }} }} }}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
}

impl GraphqlRequest {
    pub fn venues(limit: u32) -> Self {
        Self {
            query: venue_query(limit),
        }
    }
}

/// Record ids arrive as numbers from some spaces and strings from others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: Option<String>,
}

/// One venue as returned by the CMS. Every field is optional on the wire;
/// ingestion decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image: Option<ImageRef>,
    #[serde(rename = "type", alias = "category")]
    pub kind: Option<String>,
    pub food_categories: Option<Vec<String>>,
    pub dietary_styles: Option<Vec<String>>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub google_maps_link: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    food_expo_collection: Option<Collection>,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// An item whose fields have the wrong JSON types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub error: String,
}

impl MalformedRecord {
    fn new(item: &serde_json::Value, error: serde_json::Error) -> Self {
        let id = item.get("id").and_then(|id| match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let name = item
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        Self {
            id,
            name,
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub records: Vec<VenueRecord>,
    pub malformed: Vec<MalformedRecord>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Extracts the venue records from a response body.
///
/// A non-empty `errors` array is an error even when partial data is
/// present. Null items are skipped; items that do not decode are returned in
/// `malformed` without failing the rest.
pub fn parse_response(body: &str) -> Result<ParsedResponse, CatalogError> {
    let response: GraphqlResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(CatalogError::Graphql(messages.join("; ")));
    }
    let collection = response
        .data
        .and_then(|d| d.food_expo_collection)
        .ok_or_else(|| CatalogError::Corrupt("missing foodExpoCollection".to_string()))?;

    let mut parsed = ParsedResponse::default();
    for item in collection.items {
        if item.is_null() {
            continue;
        }
        match serde_json::from_value::<VenueRecord>(item.clone()) {
            Ok(record) => parsed.records.push(record),
            Err(err) => parsed.malformed.push(MalformedRecord::new(&item, err)),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{GraphqlRequest, RecordId, parse_response, venue_query};
    use crate::CatalogError;
    use pretty_assertions::assert_eq;

    #[test]
    fn query_orders_by_id_with_limit() {
        let q = venue_query(500);
        assert!(q.contains("foodExpoCollection(order: [id_ASC], limit: 500)"));
        assert!(q.contains("googleMapsLink"));
        let body = serde_json::to_string(&GraphqlRequest::venues(10)).unwrap();
        assert!(body.starts_with("{\"query\":\"query {"));
    }

    #[test]
    fn parses_records_with_aliases_and_mixed_ids() {
        let body = r#"{"data":{"foodExpoCollection":{"items":[
            {"id":1,"name":"Pizza","lat":50.0,"lng":20.0,"type":"Pizza","price":"$",
             "foodCategories":["Pizza"],"image":{"url":"https://img/1.png"},"slug":"Pizza"},
            {"id":"2","name":"Sushi","lat":10.0,"lng":10.0,"category":"Sushi"},
            null
        ]}}}"#;
        let parsed = parse_response(body).unwrap();
        assert!(parsed.malformed.is_empty());
        let records = parsed.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(RecordId::Number(1)));
        assert_eq!(records[0].kind.as_deref(), Some("Pizza"));
        assert_eq!(
            records[0].image.as_ref().and_then(|i| i.url.as_deref()),
            Some("https://img/1.png")
        );
        assert_eq!(records[1].id, Some(RecordId::Text("2".into())));
        assert_eq!(records[1].kind.as_deref(), Some("Sushi"));
        assert_eq!(records[1].dietary_styles, None);
    }

    #[test]
    fn mistyped_item_does_not_fail_the_batch() {
        let body = r#"{"data":{"foodExpoCollection":{"items":[
            {"id":1,"name":"Pizza","lat":50.0,"lng":20.0},
            {"id":"7","name":"Kebab","lat":"50.1","lng":20.0},
            42
        ]}}}"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.malformed.len(), 2);
        assert_eq!(parsed.malformed[0].id.as_deref(), Some("7"));
        assert_eq!(parsed.malformed[0].name.as_deref(), Some("Kebab"));
        assert_eq!(parsed.malformed[1].id, None);
    }

    #[test]
    fn graphql_errors_are_surfaced() {
        let body = r#"{"data":null,"errors":[{"message":"bad token"},{"message":"again"}]}"#;
        assert_eq!(
            parse_response(body),
            Err(CatalogError::Graphql("bad token; again".into()))
        );
    }

    #[test]
    fn malformed_body_is_corrupt() {
        assert!(matches!(parse_response("<html>"), Err(CatalogError::Corrupt(_))));
        assert!(matches!(
            parse_response(r#"{"data":{}}"#),
            Err(CatalogError::Corrupt(_))
        ));
    }
}
