//! Key/value extraction shared by query strings, urlencoded bodies and
//! multipart text parts.

use url::form_urlencoded;

use crate::ingest::error::IngestError;
use crate::records::MultiMap;

/// The field that names the destination; never part of a payload.
pub const URL_FIELD: &str = "url";

/// Decode `application/x-www-form-urlencoded` bytes (or a raw query string),
/// keeping every value of repeated keys in order.
pub fn parse_pairs(input: &[u8]) -> MultiMap {
    let mut map = MultiMap::new();
    for (key, value) in form_urlencoded::parse(input) {
        map.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    map
}

/// Append query string pairs after the body's own values for each key,
/// so body values come first.
pub fn merge_query(fields: &mut MultiMap, query: &MultiMap) {
    for (key, values) in query {
        fields.entry(key.clone()).or_default().extend(values.iter().cloned());
    }
}

/// Remove `url` from `fields` and return its first value, which must be
/// non-empty.
pub fn take_url(fields: &mut MultiMap) -> Result<String, IngestError> {
    fields
        .remove(URL_FIELD)
        .and_then(|values| values.into_iter().next())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| IngestError::bad_request("no url supplied"))
}

/// Serialize a payload map as JSON text.
pub fn to_payload(fields: &MultiMap) -> Result<String, IngestError> {
    serde_json::to_string(fields).map_err(|e| IngestError::internal("error encoding payload", e))
}
