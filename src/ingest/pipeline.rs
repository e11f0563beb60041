//! Request classification and normalization.
//!
//! # Responsibilities
//! - Classify a request by method, then by media type
//! - Extract the payload, the destination url and any attachments
//! - Validate and store attachments
//! - Build and persist exactly one record per accepted request
//!
//! # Design Decisions
//! - Validation happens before any write: a rejected request leaves no
//!   files and no record behind
//! - Every attachment of a multipart request is checked before the first
//!   one is written; files are then written in part order
//! - A file store failure aborts the request; files already written for
//!   it stay where they are (the store contract has no delete)

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{header, Method, Request},
};
use chrono::Utc;
use http_body_util::Limited;

use crate::files::store::check_key;
use crate::files::FileStore;
use crate::http::request::CorrelationId;
use crate::ingest::error::IngestError;
use crate::ingest::form::{merge_query, parse_pairs, take_url, to_payload};
use crate::ingest::settings::IngestSettings;
use crate::observability::metrics;
use crate::records::{MultiMap, Record, RecordStore};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const APPLICATION_JSON: &str = "application/json";

/// A file part waiting to be written.
struct Upload {
    field: String,
    file_name: String,
    contents: Bytes,
}

/// The ingestion pipeline: one inbound request in, one stored record out.
pub struct Ingestor {
    settings: IngestSettings,
    records: Arc<dyn RecordStore>,
    files: Arc<dyn FileStore>,
}

impl Ingestor {
    pub fn new(settings: IngestSettings, records: Arc<dyn RecordStore>, files: Arc<dyn FileStore>) -> Self {
        Self {
            settings,
            records,
            files,
        }
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// Turn one request into a persisted record.
    pub async fn ingest(&self, rq_id: &CorrelationId, request: Request<Body>) -> Result<Record, IngestError> {
        let method = request.method().clone();
        tracing::info!("Got a {} request", method);

        if !matches!(method, Method::GET | Method::POST | Method::PUT | Method::PATCH) {
            return Err(IngestError::NotImplemented);
        }

        let mut record = Record::new(rq_id.as_str(), method.as_str());
        let query = parse_pairs(request.uri().query().unwrap_or_default().as_bytes());
        record.headers = self.settings.headers.filter(request.headers());

        if method == Method::GET {
            classify_query(&mut record, query)?;
        } else {
            self.classify_body(&mut record, rq_id, request, &query).await?;
        }

        record.mark_pending(Utc::now());

        if let Err(e) = self.records.add(&record).await {
            tracing::error!(error = %e, "Record save failed");
            return Err(IngestError::internal("record save failed", e));
        }

        tracing::info!(
            content_type = %record.content_type,
            files = record.file_keys.len(),
            "Record stored"
        );
        Ok(record)
    }

    async fn classify_body(
        &self,
        record: &mut Record,
        rq_id: &CorrelationId,
        request: Request<Body>,
        query: &MultiMap,
    ) -> Result<(), IngestError> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let media_type: mime::Mime = content_type
            .parse()
            .map_err(|e| IngestError::bad_request(format!("error parsing Content-Type: {e}")))?;
        let essence = media_type.essence_str().to_ascii_lowercase();

        if !self.settings.allows(&essence) {
            return Err(IngestError::bad_request("no or unsupported Content-Type supplied"));
        }
        record.content_type = essence.clone();

        match essence.as_str() {
            MULTIPART_FORM_DATA => self.classify_multipart(record, rq_id, request, query).await,
            FORM_URLENCODED => self.classify_urlencoded(record, request.into_body(), query).await,
            APPLICATION_JSON => self.classify_json(record, request.into_body(), query).await,
            _ => {
                // Allowed but not interpreted: keep the empty payload.
                record.url = take_url(&mut query.clone())?;
                Ok(())
            }
        }
    }

    async fn classify_multipart(
        &self,
        record: &mut Record,
        rq_id: &CorrelationId,
        request: Request<Body>,
        query: &MultiMap,
    ) -> Result<(), IngestError> {
        let (parts, body) = request.into_parts();
        let body = Body::new(Limited::new(body, self.settings.multipart_max_memory));
        let mut multipart = Multipart::from_request(Request::from_parts(parts, body), &())
            .await
            .map_err(|e| IngestError::bad_request(format!("error parsing multipart formdata, {e}")))?;

        let multipart_error =
            |e: axum::extract::multipart::MultipartError| IngestError::bad_request(format!("error parsing multipart formdata, {e}"));

        let mut fields = MultiMap::new();
        let mut uploads: Vec<Upload> = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().filter(|f| !f.is_empty()).map(str::to_string);

            match file_name {
                Some(file_name) => {
                    let contents = field.bytes().await.map_err(multipart_error)?;
                    if uploads.iter().any(|u| u.field == name) {
                        tracing::debug!(key = %name, "Ignoring repeated file field");
                        continue;
                    }
                    uploads.push(Upload {
                        field: name,
                        file_name,
                        contents,
                    });
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    fields.entry(name).or_default().push(value);
                }
            }
        }

        if uploads.is_empty() {
            return Err(IngestError::bad_request(format!(
                "no file submitted but Content-Type {MULTIPART_FORM_DATA} used"
            )));
        }

        merge_query(&mut fields, query);
        record.url = take_url(&mut fields)?;
        record.payload = to_payload(&fields)?;

        let staged = uploads
            .into_iter()
            .map(|upload| self.stage(rq_id, upload))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, upload) in staged {
            let size = upload.contents.len();
            if let Err(e) = self.files.save(&key, upload.contents).await {
                tracing::error!(key = %key, error = %e, "Error saving file");
                return Err(IngestError::internal(
                    format!("error saving file for key: {}", upload.field),
                    e,
                ));
            }
            metrics::record_file_stored(size);
            tracing::debug!(key = %key, source = %upload.file_name, bytes = size, "Stored file");
            record.file_keys.push(upload.field);
        }

        Ok(())
    }

    /// Validate one upload and derive its storage key.
    fn stage(&self, rq_id: &CorrelationId, upload: Upload) -> Result<(String, Upload), IngestError> {
        if check_key(&upload.field).is_err() {
            return Err(IngestError::bad_request(format!("invalid file key: {:?}", upload.field)));
        }

        let check = self.settings.extensions.check(&upload.file_name);
        if !check.allowed {
            return Err(IngestError::bad_request(format!(
                "file extension not allowed for key {}: {}",
                upload.field, upload.file_name
            )));
        }

        let key = format!("{}-{}.{}", rq_id, upload.field, check.extension);
        Ok((key, upload))
    }

    async fn classify_urlencoded(&self, record: &mut Record, body: Body, query: &MultiMap) -> Result<(), IngestError> {
        let bytes = read_body(body, self.settings.max_body_size).await?;
        if std::str::from_utf8(&bytes).is_err() {
            return Err(IngestError::bad_request("error parsing formdata, body is not UTF-8"));
        }

        let mut fields = parse_pairs(&bytes);
        merge_query(&mut fields, query);
        record.url = take_url(&mut fields)?;
        record.payload = to_payload(&fields)?;
        Ok(())
    }

    async fn classify_json(&self, record: &mut Record, body: Body, query: &MultiMap) -> Result<(), IngestError> {
        // JSON bodies pass through untouched, so the destination comes from the query string.
        record.url = take_url(&mut query.clone())?;

        let bytes = read_body(body, self.settings.max_body_size).await?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&bytes)
            .map_err(|e| IngestError::bad_request(format!("error parsing JSON body: {e}")))?;

        record.payload = String::from_utf8(bytes.to_vec())
            .map_err(|e| IngestError::bad_request(format!("error parsing JSON body: {e}")))?;
        Ok(())
    }
}

/// GET: the query string is the payload, minus `url`.
fn classify_query(record: &mut Record, mut query: MultiMap) -> Result<(), IngestError> {
    record.url = take_url(&mut query)?;
    record.payload = to_payload(&query)?;
    Ok(())
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, IngestError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| IngestError::bad_request(format!("error reading request body: {e}")))
}
