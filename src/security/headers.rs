//! Header filtering for captured requests.
//!
//! # Responsibilities
//! - Drop headers that change between the client and the gateway
//!   (length, agent, content type, accept) before a record is stored
//! - Drop any additional headers named in configuration
//!
//! # Design Decisions
//! - The baseline is always part of the exclusion set, whatever the config says
//! - Names compare case-insensitively (HeaderName is lower-case)
//! - Multi-value headers keep their original value order

use std::collections::HashSet;

use axum::http::header::{self, HeaderMap, HeaderName, InvalidHeaderName};

use crate::records::MultiMap;

/// Headers never copied into a record.
pub const BASELINE_EXCLUDED: [HeaderName; 4] = [
    header::CONTENT_LENGTH,
    header::USER_AGENT,
    header::CONTENT_TYPE,
    header::ACCEPT,
];

/// Removes excluded headers from a request's header map.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    excluded: HashSet<HeaderName>,
}

impl HeaderFilter {
    /// Build the exclusion set from configured names plus the baseline.
    pub fn new<S: AsRef<str>>(configured: &[S]) -> Result<Self, InvalidHeaderName> {
        let mut excluded: HashSet<HeaderName> = BASELINE_EXCLUDED.into_iter().collect();
        for name in configured {
            excluded.insert(HeaderName::from_bytes(name.as_ref().as_bytes())?);
        }
        Ok(Self { excluded })
    }

    /// Whether `name` is dropped.
    pub fn is_excluded(&self, name: &HeaderName) -> bool {
        self.excluded.contains(name)
    }

    /// Number of distinct excluded names.
    pub fn excluded_len(&self) -> usize {
        self.excluded.len()
    }

    /// Copy every non-excluded header, keeping per-header value order.
    /// Values that are not valid UTF-8 are stored lossily.
    pub fn filter(&self, headers: &HeaderMap) -> MultiMap {
        let mut kept = MultiMap::new();
        for name in headers.keys() {
            if self.is_excluded(name) {
                continue;
            }
            let values = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            kept.insert(name.as_str().to_string(), values);
        }
        kept
    }
}

impl Default for HeaderFilter {
    fn default() -> Self {
        Self {
            excluded: BASELINE_EXCLUDED.into_iter().collect(),
        }
    }
}
