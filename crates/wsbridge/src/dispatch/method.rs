//! Request method normalization.

use std::fmt;

/// Method carried by a message, normalized to lower case.
///
/// Well-known verbs get their own variant. Anything else is kept as an
/// [`Extension`](Self::Extension) and passed through so the handler can
/// decide whether it supports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    /// `get`, the default when a message names no method.
    #[default]
    Get,
    /// `post`.
    Post,
    /// `put`.
    Put,
    /// `patch`.
    Patch,
    /// `delete`.
    Delete,
    /// `head`.
    Head,
    /// `options`.
    Options,
    /// `trace`.
    Trace,
    /// Any other verb, lower-cased.
    Extension(String),
}

impl RequestMethod {
    /// Parses a method name case-insensitively.
    ///
    /// The name is only lower-cased: surrounding whitespace is kept, so
    /// `" delete "` is an extension verb. Unrecognized names, the empty string
    /// included, become [`RequestMethod::Extension`]; parsing never fails.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "get" => Self::Get,
            "post" => Self::Post,
            "put" => Self::Put,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "head" => Self::Head,
            "options" => Self::Options,
            "trace" => Self::Trace,
            _ => Self::Extension(normalized),
        }
    }

    /// Returns the lower-case method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Trace => "trace",
            Self::Extension(name) => name.as_str(),
        }
    }

    /// Returns `true` when the body travels as a serialized string.
    ///
    /// Only `get` keeps its body as a structured mapping.
    #[must_use]
    pub const fn encodes_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
