//! Error types for the Salesforce REST transport.

/// Errors returned by [`SalesforceClient`](super::SalesforceClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status. `message` is the raw response body,
    /// which Salesforce normally fills with a JSON array of error objects.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The instance URL could not be used as a request base.
    #[error("invalid instance URL: {0}")]
    InvalidUrl(String),

    /// The server answered successfully but the body was not what the
    /// endpoint promises.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// HTTP status of an [`Error::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
