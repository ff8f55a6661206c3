//! Error types for message dispatch failures.
//!
//! Every failure the pipeline can raise on its own is a [`BridgeError`]. Each
//! variant maps to exactly one client-facing [`ErrorModel`], so callers never
//! see a raw parse or lookup failure.

use thiserror::Error;

use super::outcome::ErrorModel;

/// Client-facing text for undecodable messages.
pub const MALFORMED_MESSAGE: &str = "Invalid formatted message.";

/// Client-facing text for messages without a target path.
pub const MISSING_URL: &str = "Missing URL";

/// Client-facing text for paths no route matches.
pub const RESOURCE_NOT_FOUND: &str = "Resource not found.";

/// Status reported for rejected messages.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status reported for unmatched paths.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Errors surfaced while validating and routing a message.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The message could not be decoded into the expected mapping.
    #[error("malformed message: {message}")]
    MalformedMessage {
        /// Description of the decoding failure.
        message: String,
        /// Decoder error, when one was produced.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The decoded message carries no target path.
    #[error("message has no url")]
    MissingUrl,

    /// No registered route matches the requested path.
    #[error("no route matches path '{path}'")]
    ResourceNotFound {
        /// Path that failed to resolve.
        path: String,
    },
}

impl BridgeError {
    /// Creates a malformed message error from a decoder error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedMessage {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed message error with a custom description.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a missing URL error.
    #[must_use]
    pub const fn missing_url() -> Self {
        Self::MissingUrl
    }

    /// Creates a resource not found error for `path`.
    #[must_use]
    pub fn resource_not_found(path: impl Into<String>) -> Self {
        Self::ResourceNotFound { path: path.into() }
    }

    /// Returns the status code reported to the client.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MalformedMessage { .. } | Self::MissingUrl => STATUS_BAD_REQUEST,
            Self::ResourceNotFound { .. } => STATUS_NOT_FOUND,
        }
    }

    /// Returns the client-facing message.
    ///
    /// Unlike the `Display` output this never includes decoder details or the
    /// requested path.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::MalformedMessage { .. } => MALFORMED_MESSAGE,
            Self::MissingUrl => MISSING_URL,
            Self::ResourceNotFound { .. } => RESOURCE_NOT_FOUND,
        }
    }

    /// Converts the error into the uniform client-facing shape.
    #[must_use]
    pub fn error_model(&self) -> ErrorModel {
        ErrorModel::new(self.client_message(), self.status_code())
    }
}

impl From<&BridgeError> for ErrorModel {
    fn from(error: &BridgeError) -> Self {
        error.error_model()
    }
}

impl From<BridgeError> for ErrorModel {
    fn from(error: BridgeError) -> Self {
        error.error_model()
    }
}
