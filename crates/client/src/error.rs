//! Error types for the Backroom client.

use thiserror::Error;

/// Errors that can occur when talking to the back-office API.
///
/// HTTP error *statuses* are deliberately not errors here: most session
/// methods hand the response back and let the caller branch on status,
/// mirroring how the UI layers consume this SDK. Only failures that
/// produce no response at all surface through this enum.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An endpoint path could not be joined onto the API base.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}
