//! API error definitions.

use thiserror::Error;

/// Defines errors that may occur while talking to the tr8n service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with an explicit `error` field; the message is
    /// surfaced verbatim.
    #[error("{0}")]
    Server(String),
    /// The service answered with a non-success HTTP status.
    #[error("HTTP error {0} contacting API")]
    Status(reqwest::StatusCode),
    /// Connection failure, timeout, or a malformed response body.
    #[error("URL error contacting API: {0}")]
    Transport(#[from] reqwest::Error),
}
