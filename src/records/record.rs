//! The canonical capture record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key → ordered values, as produced by query strings, forms and headers.
/// Keys are kept sorted so the serialized form is stable.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// Lifecycle marker for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Accepted and stored, not yet relayed.
    #[default]
    Pending,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RecordStatus::Pending),
            other => Err(format!("unknown record status: {other}")),
        }
    }
}

/// One captured request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Correlation id, also the primary key.
    pub id: String,
    pub method: String,
    /// Media type essence; empty for GET.
    pub content_type: String,
    /// Destination supplied by the caller.
    pub url: String,
    /// Request headers minus the excluded set.
    pub headers: MultiMap,
    /// Multipart field names whose files were stored, in part order.
    pub file_keys: Vec<String>,
    /// JSON text: a [`MultiMap`] for forms and query strings, the raw body for JSON.
    #[serde(with = "raw_json")]
    pub payload: String,
    pub status: RecordStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Start a record for a request that has just arrived.
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            method: method.into(),
            content_type: String::new(),
            url: String::new(),
            headers: MultiMap::new(),
            file_keys: Vec::new(),
            payload: "{}".to_string(),
            status: RecordStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as accepted at `now`; called once, just before persistence.
    pub fn mark_pending(&mut self, now: DateTime<Utc>) {
        self.status = RecordStatus::Pending;
        self.created_at = now;
        self.updated_at = now;
    }
}

/// Serializes a JSON text field as embedded JSON rather than as a string.
mod raw_json {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::value::RawValue;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(value.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(raw.get().to_string())
    }
}
