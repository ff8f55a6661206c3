//! Synthetic request construction.
//!
//! A [`RequestFactory`] turns a [`ValidatedRequest`] into the request object a
//! handler receives. No transport is involved: the request only carries what
//! a handler needs to look at.
//!
//! ## Rules
//!
//! - `get` requests keep their body as a structured mapping; every other
//!   method receives the body serialized to JSON text.
//! - A non-empty token becomes an `Authorization: <scheme> <token>` header
//!   (scheme `JWT` by default), overriding any default header of the same
//!   name.
//! - The content type is always `application/json`.

use http::header::{
    AUTHORIZATION, AsHeaderName, CONTENT_TYPE, InvalidHeaderName, InvalidHeaderValue,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use wsbridge_config::{BridgeConfig, DEFAULT_AUTH_SCHEME};

use super::dispatcher::DISPATCH_TARGET;
use super::message::{MessageBody, ValidatedRequest};
use super::method::RequestMethod;

const APPLICATION_JSON: &str = "application/json";

/// Errors raised while turning configured default headers into a header map.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// A configured header name is not a valid HTTP header name.
    #[error("invalid default header name {name:?}: {source}")]
    Name {
        /// Name as configured.
        name: String,
        /// Underlying parse error.
        source: InvalidHeaderName,
    },
    /// A configured header value contains bytes not allowed in a header.
    #[error("invalid value for default header {name}: {source}")]
    Value {
        /// Name of the header.
        name: String,
        /// Underlying parse error.
        source: InvalidHeaderValue,
    },
}

/// Body attached to a synthetic request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured mapping, used by `get` requests.
    Query(MessageBody),
    /// Body serialized to JSON text.
    Encoded(String),
}

impl RequestBody {
    fn for_method(method: &RequestMethod, body: MessageBody) -> Self {
        if method.encodes_body() {
            Self::Encoded(Value::Object(body).to_string())
        } else {
            Self::Query(body)
        }
    }

    /// Returns the serialized body, if the body was encoded.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Query(_) => None,
            Self::Encoded(text) => Some(text.as_str()),
        }
    }

    /// Returns the body as a JSON value, decoding it when necessary.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if an encoded body is not valid JSON.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Query(map) => Ok(Value::Object(map.clone())),
            Self::Encoded(text) => serde_json::from_str(text),
        }
    }
}

/// Request handed to a matched handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRequest {
    method: RequestMethod,
    path: String,
    body: RequestBody,
    headers: HeaderMap,
}

impl SyntheticRequest {
    /// Normalized method.
    #[must_use]
    pub const fn method(&self) -> &RequestMethod {
        &self.method
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Body, structured or encoded depending on the method.
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as text.
    ///
    /// Values that are not visible ASCII are reported as absent.
    #[must_use]
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Builds synthetic requests from validated messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFactory {
    defaults: HeaderMap,
    auth_scheme: String,
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self::new(HeaderMap::new())
    }
}

impl RequestFactory {
    /// Creates a factory whose requests start from `defaults`.
    #[must_use]
    pub fn new(defaults: HeaderMap) -> Self {
        Self {
            defaults,
            auth_scheme: DEFAULT_AUTH_SCHEME.to_owned(),
        }
    }

    /// Creates a factory from the configured scheme and default headers.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] when a configured name or value cannot be used
    /// as an HTTP header.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, HeaderError> {
        let mut defaults = HeaderMap::with_capacity(config.default_headers().len());
        for (name, value) in config.default_headers() {
            let header = HeaderName::try_from(name.as_str()).map_err(|source| HeaderError::Name {
                name: name.clone(),
                source,
            })?;
            let value = HeaderValue::from_str(value).map_err(|source| HeaderError::Value {
                name: header.to_string(),
                source,
            })?;
            defaults.insert(header, value);
        }
        Ok(Self {
            defaults,
            auth_scheme: config.auth_scheme().to_owned(),
        })
    }

    /// Replaces the scheme written before forwarded tokens.
    #[must_use]
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    /// Default headers of every request built by this factory.
    #[must_use]
    pub const fn defaults(&self) -> &HeaderMap {
        &self.defaults
    }

    /// Returns a factory whose defaults also carry the token header.
    ///
    /// An absent or empty token leaves the defaults unchanged, as does a token
    /// that cannot be carried in a header value. `self` is never modified.
    #[must_use]
    pub fn for_token(&self, token: Option<&str>) -> Self {
        let mut factory = self.clone();
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return factory;
        };
        match HeaderValue::from_str(&format!("{} {token}", self.auth_scheme)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                factory.defaults.insert(AUTHORIZATION, value);
            }
            Err(error) => warn!(
                target: DISPATCH_TARGET,
                %error,
                "token is not a valid header value; authorization omitted"
            ),
        }
        factory
    }

    /// Builds the request for a validated message.
    #[must_use]
    pub fn build(&self, request: ValidatedRequest) -> SyntheticRequest {
        let ValidatedRequest {
            method,
            path,
            body,
            token,
        } = request;
        let mut headers = self.for_token(token.as_deref()).defaults;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        SyntheticRequest {
            body: RequestBody::for_method(&method, body),
            method,
            path,
            headers,
        }
    }
}
