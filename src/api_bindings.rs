//! Contains bindings for the Elasticsearch API,
//! used to make working with requests and responses more ergonomic

use serde::{Deserialize, Serialize};

/// An open JSON object: an order-irrelevant mapping from string keys to
/// arbitrary JSON values. Used both as a generic request payload and as
/// the decoded `_source` of a document.
pub type Obj = serde_json::Map<String, serde_json::Value>;

/// Shard-count summary attached to document and search responses.
/// Document responses omit `skipped`; it defaults to zero there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shards {
    pub total: i64,
    pub successful: i64,
    #[serde(default)]
    pub skipped: i64,
    pub failed: i64,
}

/// A single document operation result or search hit.
/// Source: `https://www.elastic.co/guide/en/elasticsearch/reference/current/docs-index_.html#docs-index-api-response-body`
///
/// Every field tolerates absence so that the same shape decodes the
/// responses of index, get and delete operations as well as search hits.
/// The `error`/`status` pair is only populated on degraded responses
/// that carry a plain error message alongside document fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentResult {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    pub result: String,
    pub found: bool,
    #[serde(rename = "_shards")]
    pub shards: Shards,
    #[serde(rename = "_seq_no")]
    pub seq_no: i64,
    #[serde(rename = "_primary_term")]
    pub primary_term: i64,
    #[serde(rename = "_source")]
    pub source: Obj,
    pub error: Option<String>,
    pub status: Option<u16>,
}

/// Hits metadata block of a search response.
/// `total` is the ES6-era integer count; servers reporting the newer
/// object form should be decoded through a caller-defined shape instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct HitsMeta<T = DocumentResult> {
    #[serde(default)]
    pub total: i64,
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<T>,
}

// Not derived: the hit type itself never needs a default value
impl<T> Default for HitsMeta<T> {
    fn default() -> Self {
        Self {
            total: 0,
            max_score: None,
            hits: Vec::new(),
        }
    }
}

/// A search response, generic over the hit shape so that callers can
/// decode their own `_source` types.
/// Source: `https://www.elastic.co/guide/en/elasticsearch/reference/current/search-search.html#search-api-response-body`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResults<T = DocumentResult> {
    #[serde(default)]
    pub took: i64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_shards", default)]
    pub shards: Shards,
    #[serde(default)]
    pub hits: HitsMeta<T>,
    pub error: Option<String>,
    pub status: Option<u16>,
}

/// A named index template: the template body is sent to
/// `_template/<name>` and applied by the server to future indices.
/// The name determines the remote resource path and must be non-empty
/// before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTemplate {
    pub name: String,
    pub template: Obj,
}

/// Structured cause of a failed operation, as reported under the `error`
/// key of an error response body.
/// Source: `https://www.elastic.co/guide/en/elasticsearch/reference/current/common-options.html#common-options-error-options`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCause {
    #[serde(default)]
    pub root_cause: Vec<ErrorCause>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub reason: Option<String>,
    pub index_uuid: Option<String>,
    pub shard: Option<String>,
    pub index: Option<String>,
}

/// Normalized failure payload for a non-200 response.
/// `message` always carries the raw response body text; `cause` and
/// `status` are filled in when the body parses as the structured
/// Elasticsearch error shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    pub cause: Option<ErrorCause>,
    pub status: Option<u16>,
}

/// Wire shape of a structured error body, kept private: consumers only
/// ever see the normalized [`ErrorResponse`]
#[derive(Deserialize)]
struct WireErrorBody {
    error: ErrorCause,
    status: Option<u16>,
}

impl ErrorResponse {
    /// Normalizes a raw non-200 response body.
    /// The body text is preserved verbatim; the structured fields are
    /// best-effort and absent when the body is not the documented error
    /// shape (some endpoints return a plain string under `error`).
    pub fn from_raw(body: &[u8]) -> Self {
        let message = String::from_utf8_lossy(body).into_owned();
        match serde_json::from_slice::<WireErrorBody>(body) {
            Ok(wire) => Self {
                message,
                cause: Some(wire.error),
                status: wire.status,
            },
            Err(_) => Self {
                message,
                cause: None,
                status: None,
            },
        }
    }
}
