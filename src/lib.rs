#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc)]

//! A minimal low-level client for Elasticsearch-compatible search servers.
//!
//! The crate exposes a single [`Client`] that performs generic GET/PUT/POST
//! requests against `<server>/<path>` and a set of typed wrappers that
//! marshal request bodies to JSON and unmarshal responses into the bindings
//! in [`api_bindings`]. It intentionally covers only a small slice of the
//! Elasticsearch API surface: indexing documents, applying index templates,
//! and running searches with caller-defined result shapes.
//!
//! The client holds no per-call state and can be cloned and shared across
//! tasks; connection pooling and timeouts are owned by the underlying
//! `reqwest` client. There are no retries and no backoff; a failed call
//! surfaces immediately and the caller owns retry policy.

pub mod api_bindings;
pub mod client;
pub mod config;

pub use crate::api_bindings::{
    DocumentResult, ErrorCause, ErrorResponse, HitsMeta, IndexTemplate, Obj, SearchResults, Shards,
};
pub use crate::client::{
    new_client, Client, RawResponse, RequestError, ServerReply, TemplateError, TransportError,
};
pub use crate::config::{
    default_http_client, default_logger, Configuration, DEFAULT_ELASTIC_SERVER,
};
