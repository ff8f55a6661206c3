//! Message decoding and field extraction.
//!
//! A transport delivers one text payload per request. [`DecodedMessage::parse`]
//! turns that payload into a typed envelope; its accessors apply the defaults
//! clients rely on (method `get`, empty body).
//!
//! ```json
//! {"url": "/api/items/7/", "method": "PUT", "data": {"name": "x"}, "token": "abc"}
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::BridgeError;
use super::method::RequestMethod;

/// Structured body carried by a message.
pub type MessageBody = Map<String, Value>;

/// Typed view of a decoded message.
///
/// Every key is optional. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DecodedMessage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    data: Option<MessageBody>,
    #[serde(default)]
    token: Option<String>,
}

impl DecodedMessage {
    /// Decodes a raw message.
    ///
    /// The payload must be a JSON object whose `url`, `method` and `token`
    /// keys, when present, hold strings and whose `data` key holds an object.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MalformedMessage` if the payload is blank, is not
    /// valid JSON, is not an object, or holds a field of the wrong type.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BridgeError::malformed("empty message"));
        }

        let value: Value = serde_json::from_str(trimmed).map_err(BridgeError::from_json_error)?;
        if !value.is_object() {
            return Err(BridgeError::malformed("message is not an object"));
        }
        serde_json::from_value(value).map_err(BridgeError::from_json_error)
    }

    /// Returns the target path, if the message names one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the normalized method, defaulting to `get`.
    #[must_use]
    pub fn method(&self) -> RequestMethod {
        self.method
            .as_deref()
            .map_or(RequestMethod::Get, RequestMethod::parse)
    }

    /// Returns the body, defaulting to an empty mapping.
    #[must_use]
    pub fn body(&self) -> MessageBody {
        self.data.clone().unwrap_or_default()
    }

    /// Returns the token to forward, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Requires a non-empty path and splits the message into its fields.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingUrl` if `url` is absent or empty.
    pub fn into_validated(self) -> Result<ValidatedRequest, BridgeError> {
        let method = self.method();
        let path = self
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(BridgeError::missing_url)?;
        Ok(ValidatedRequest {
            method,
            path,
            body: self.data.unwrap_or_default(),
            token: self.token,
        })
    }
}

/// Fields of a message that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Normalized method.
    pub method: RequestMethod,
    /// Non-empty target path.
    pub path: String,
    /// Body mapping, empty when the message carried none.
    pub body: MessageBody,
    /// Token to forward as an authorization header.
    pub token: Option<String>,
}
