//! Contains the client itself: the low-level request executor and the
//! typed convenience wrappers built on top of it

use crate::api_bindings::{DocumentResult, ErrorResponse, IndexTemplate};
use crate::config::{default_http_client, default_logger, Configuration, DEFAULT_ELASTIC_SERVER};
use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slog::Logger;
use std::process;
use thiserror::Error;

/// Client for an Elasticsearch-compatible search server.
/// Holds the server address, the HTTP client and the logger and nothing
/// else; each call allocates its own request/response state, so a single
/// instance can be cloned and used from any number of tasks concurrently.
#[derive(Clone)]
pub struct Client {
    server: String,
    http: reqwest::Client,
    logger: Logger,
}

/// Instantiates a new client, filling in defaults for any configuration
/// field that was not supplied (see [`Configuration`]).
///
/// Never performs network I/O; returning a client does not guarantee the
/// server is reachable. If the default logger or the default HTTP client
/// cannot be built there is no way to proceed, and the process terminates
/// with a non-zero status.
pub fn new_client(config: Configuration) -> Client {
    let Configuration {
        elastic_server,
        http_client,
        logger,
    } = config;

    let default_logger_applied = logger.is_none();
    let logger = logger.unwrap_or_else(default_logger);

    let default_server_applied = elastic_server.is_none();
    let server = elastic_server
        .unwrap_or_else(|| DEFAULT_ELASTIC_SERVER.to_owned())
        .trim_end_matches('/')
        .to_owned();

    let default_http_applied = http_client.is_none();
    let http = match http_client {
        Some(client) => client,
        None => match default_http_client() {
            Ok(client) => client,
            Err(err) => {
                slog::crit!(
                    logger,
                    "could not build the default HTTP client";
                    "error" => ?err,
                );
                process::exit(1);
            }
        },
    };

    slog::info!(
        logger,
        "created search server client";
        "server" => &server,
        "default_server" => default_server_applied,
        "default_http_client" => default_http_applied,
        "default_logger" => default_logger_applied,
    );

    Client {
        server,
        http,
        logger,
    }
}

/// Raw product of a single HTTP round trip: the status code and the
/// fully-read response body. Interpreting a non-2xx status is left to
/// the caller.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Outcome of an exchange that received an HTTP response from the server.
/// A non-200 status is not an error at the client level: the server was
/// reachable and answered, and the rejection payload is preserved for the
/// caller to inspect.
#[derive(Debug, Clone)]
pub enum ServerReply<T> {
    /// The server returned 200 and the body decoded into the expected shape
    Success { status: StatusCode, body: T },
    /// The server returned a non-200 status;
    /// the raw body is preserved inside the error payload
    Rejected {
        status: StatusCode,
        error: ErrorResponse,
    },
}

impl<T> ServerReply<T> {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Rejected { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Decoded body of a successful exchange, if there was one
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::Rejected { .. } => None,
        }
    }

    /// Rejection payload of a failed exchange, if there was one
    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Success { .. } => None,
            Self::Rejected { error, .. } => Some(error),
        }
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not parse the request URL built from the server address and path")]
    InvalidUrl(#[source] url::ParseError),
    #[error("sending the request to the search server failed")]
    Failed(#[source] reqwest::Error),
    #[error("reading the response body failed")]
    BodyReadFailure(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("performing the request failed")]
    Transport(#[from] TransportError),
    #[error("serializing the request body to JSON failed")]
    Serialize(#[source] serde_json::Error),
    #[error("decoding the response body into the expected shape failed")]
    Decode {
        #[source]
        source: serde_json::Error,
        /// Raw response body, preserved for diagnostics
        body: String,
    },
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("the index template has an empty name")]
    MissingName,
    #[error("sending the index template failed")]
    Request(#[from] RequestError),
    #[error("applying index template {name} failed with status code {status}")]
    Rejected {
        name: String,
        status: StatusCode,
        error: ErrorResponse,
    },
}

impl Client {
    /// Base URL of the search server this client talks to
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Performs a single HTTP round trip against `<server>/<path>`.
    ///
    /// The Content-Type header is set to JSON for PUT/POST only. An `Err`
    /// means the exchange never completed (bad URL, transport failure, or
    /// body-read failure) and there is no status to report; non-2xx
    /// statuses are returned normally. The response body is read to
    /// completion before returning, so the connection is always released
    /// back to the pool.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        let target = format!("{}/{}", self.server, path);
        let url = reqwest::Url::parse(&target).map_err(TransportError::InvalidUrl)?;

        let is_write = method == Method::PUT || method == Method::POST;
        let mut builder = self.http.request(method, url);
        if is_write {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        let response = builder
            .body(body)
            .send()
            .await
            .map_err(TransportError::Failed)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::BodyReadFailure)?;

        Ok(RawResponse { status, body })
    }

    /// Retrieves raw data from the server; no decoding is attempted,
    /// so the caller can unmarshal the bytes into a shape of its choice
    /// depending on the returned status code
    pub async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.request(Method::GET, path, Vec::new()).await
    }

    /// PUTs a raw JSON body and decodes the response
    pub async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<ServerReply<DocumentResult>, RequestError> {
        self.exchange(Method::PUT, path, body).await
    }

    /// POSTs a raw JSON body and decodes the response
    pub async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<ServerReply<DocumentResult>, RequestError> {
        self.exchange(Method::POST, path, body).await
    }

    /// Serializes the object to JSON and PUTs it.
    /// A serialization failure short-circuits before any network call.
    pub async fn put_json<T>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ServerReply<DocumentResult>, RequestError>
    where
        T: Serialize,
    {
        let encoded = self.encode(body)?;
        self.put(path, encoded).await
    }

    /// Serializes the object to JSON and POSTs it.
    /// A serialization failure short-circuits before any network call.
    pub async fn post_json<T>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ServerReply<DocumentResult>, RequestError>
    where
        T: Serialize,
    {
        let encoded = self.encode(body)?;
        self.post(path, encoded).await
    }

    /// Serializes the object to JSON, POSTs it, and on a 200 response
    /// decodes the body directly into a caller-supplied shape, typically
    /// a [`crate::api_bindings::SearchResults`] instantiated with a custom
    /// hit type. On a non-200 status the raw body is preserved in the
    /// rejection payload and no decode is attempted.
    pub async fn post_json_decoded<T, R>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ServerReply<R>, RequestError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let encoded = self.encode(body)?;
        self.exchange(Method::POST, path, encoded).await
    }

    /// Sends a named index template to `_template/<name>`.
    ///
    /// Unlike the other wrappers this treats any non-200 response as a
    /// hard error naming the template and the status code, with the
    /// rejection payload attached for inspection.
    pub async fn send_template(
        &self,
        template: &IndexTemplate,
    ) -> Result<DocumentResult, TemplateError> {
        if template.name.is_empty() {
            return Err(TemplateError::MissingName);
        }

        slog::info!(
            self.logger,
            "sending index template";
            "name" => &template.name,
        );

        let path = format!("_template/{}", template.name);
        match self.put_json(&path, &template.template).await? {
            ServerReply::Success { body, .. } => Ok(body),
            ServerReply::Rejected { status, error } => {
                slog::error!(
                    self.logger,
                    "index template was rejected by the search server";
                    "name" => &template.name,
                    "status" => %status,
                );
                Err(TemplateError::Rejected {
                    name: template.name.clone(),
                    status,
                    error,
                })
            }
        }
    }

    /// Shared round-trip-and-decode path for the typed wrappers.
    /// Only a 200 response is decoded into the expected shape; any other
    /// status yields a rejection carrying the raw body.
    async fn exchange<R>(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> Result<ServerReply<R>, RequestError>
    where
        R: DeserializeOwned,
    {
        let raw = self.request(method, path, body).await?;

        if raw.status != StatusCode::OK {
            return Ok(ServerReply::Rejected {
                status: raw.status,
                error: ErrorResponse::from_raw(&raw.body),
            });
        }

        match serde_json::from_slice::<R>(&raw.body) {
            Ok(decoded) => Ok(ServerReply::Success {
                status: raw.status,
                body: decoded,
            }),
            Err(err) => {
                slog::error!(
                    self.logger,
                    "could not decode response body from the search server";
                    "path" => path,
                    "error" => ?err,
                );
                Err(RequestError::Decode {
                    source: err,
                    body: String::from_utf8_lossy(&raw.body).into_owned(),
                })
            }
        }
    }

    fn encode<T>(&self, body: &T) -> Result<Vec<u8>, RequestError>
    where
        T: Serialize,
    {
        serde_json::to_vec(body).map_err(|err| {
            slog::error!(
                self.logger,
                "could not serialize request body to JSON";
                "error" => ?err,
            );
            RequestError::Serialize(err)
        })
    }
}
