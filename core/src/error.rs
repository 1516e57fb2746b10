//! Error types for the Orderdaily API client.
//!
//! # Design
//! The `Display` text of each variant is the message the platform documents
//! for that failure, so callers can surface `err.to_string()` directly.
//! Configuration and parameter problems are reported before any request is
//! built; status-code variants come from `response::interpret`.

use thiserror::Error;

/// Errors returned by `Client` builders, response parsing and `Session`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Application is not defined.")]
    MissingApplicationName,

    #[error("Main API Key is not defined.")]
    MissingMainApiKey,

    #[error("Partner API Key is not defined.")]
    MissingPartnerApiKey,

    /// A caller-supplied parameter is outside its accepted set of values.
    #[error("Invalid {0} parameter.")]
    InvalidParameter(&'static str),

    /// The response body is not valid JSON. Checked before the status code.
    #[error("Invalid JSON response.")]
    InvalidJson,

    /// HTTP 400.
    #[error("API endpoint not found.")]
    EndpointNotFound,

    /// HTTP 403.
    #[error("API key invalid. Please check if your configuration is correct.")]
    Unauthorized,

    /// HTTP 404.
    #[error("Item not found.")]
    NotFound,

    /// HTTP 422, only for requests that carry a JSON body.
    #[error("Data can't be processed.")]
    Unprocessable,

    /// HTTP 500 that persisted through the re-attempt.
    #[error("Server error. Code: {status}")]
    ServerError { status: u16 },

    #[error("Unknown error. Code: {status}")]
    Unknown { status: u16 },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Status code carried by variants that come from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::EndpointNotFound => Some(400),
            Self::Unauthorized => Some(403),
            Self::NotFound => Some(404),
            Self::Unprocessable => Some(422),
            Self::ServerError { status } | Self::Unknown { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
