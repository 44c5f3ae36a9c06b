//! Contains the construction-time configuration for the client
//! and the explicit factories used to fill in missing pieces

use serde::Deserialize;
use slog::Logger;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;
use std::process;
use std::time::Duration;

/// Conventional address of a search server reachable from inside a
/// container network, used when no server is configured
pub const DEFAULT_ELASTIC_SERVER: &str = "http://elasticsearch:9200";

const DEFAULT_MAX_IDLE_PER_HOST: usize = 10;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration consumed once by [`crate::client::new_client`].
/// Every field is optional and independently defaulted;
/// an all-`None` configuration produces a working client
/// pointed at [`DEFAULT_ELASTIC_SERVER`].
///
/// The struct can be embedded in a service's own file/env configuration;
/// the handle fields are skipped during deserialization and can be
/// filled in afterwards.
#[derive(Clone, Default, Deserialize)]
pub struct Configuration {
    /// Base URL of the search server, without a trailing slash
    pub elastic_server: Option<String>,
    /// HTTP client to perform requests with;
    /// see [`default_http_client`] for the defaulted pool/timeout values
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
    /// Logger for the client's diagnostic output
    #[serde(skip)]
    pub logger: Option<Logger>,
}

/// Builds the default developer-oriented logger:
/// human-readable terminal output on stderr at debug severity.
///
/// There is no way for the process to proceed without a functioning
/// logger, so a build failure here is written to stderr
/// and terminates the process with a non-zero status.
pub fn default_logger() -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(Severity::Debug);
    builder.destination(Destination::Stderr);
    match builder.build() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("could not build the default terminal logger: {}", err);
            process::exit(1);
        }
    }
}

/// Builds the default HTTP client:
/// at most 10 idle connections per host, a 10 second connect timeout
/// (which also bounds the TLS handshake), and a 60 second overall
/// per-request timeout
pub fn default_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(DEFAULT_MAX_IDLE_PER_HOST)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
}
