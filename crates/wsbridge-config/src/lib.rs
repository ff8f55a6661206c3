//! Shared configuration for the message bridge.
//!
//! [`BridgeConfig`] gathers the knobs the dispatcher and its telemetry need:
//! the log filter and output format, the scheme used when a token is
//! forwarded as an `Authorization` header, and the default headers every
//! synthetic request starts from. Values are read from TOML; any key left out
//! falls back to the defaults in this crate.
//!
//! ```toml
//! log_filter = "wsbridge=debug"
//! log_format = "compact"
//! auth_scheme = "Bearer"
//!
//! [default_headers]
//! x-forwarded-proto = "wss"
//! ```

mod defaults;
mod logging;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_AUTH_SCHEME, DEFAULT_LOG_FILTER, default_auth_scheme_string, default_headers,
    default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Filter expression handed to the tracing subscriber.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Scheme written before a forwarded token, e.g. `JWT abc`.
    #[serde(default = "default_auth_scheme_string")]
    pub auth_scheme: String,
    /// Headers merged beneath the token-derived `Authorization` header.
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            auth_scheme: default_auth_scheme_string(),
            default_headers: default_headers(),
        }
    }
}

impl BridgeConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or
    /// contains unknown keys or ill-typed values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: None,
            source: Box::new(source),
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source: Box::new(source),
        })
    }

    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the scheme prefixed to forwarded tokens.
    #[must_use]
    pub fn auth_scheme(&self) -> &str {
        self.auth_scheme.as_str()
    }

    /// Returns the default headers for synthetic requests.
    #[must_use]
    pub const fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid.
    #[error("invalid configuration{}: {source}", describe_path(.path.as_deref()))]
    Parse {
        /// File the text came from, when it was read from disk.
        path: Option<PathBuf>,
        /// Underlying TOML error.
        #[source]
        source: Box<toml::de::Error>,
    },
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|value| format!(" in {}", value.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_text_yields_defaults() {
        let config = BridgeConfig::from_toml_str("").expect("parse empty config");
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.auth_scheme(), "JWT");
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.default_headers().is_empty());
    }

    #[rstest]
    #[case::json("log_format = \"json\"", LogFormat::Json)]
    #[case::compact("log_format = \"compact\"", LogFormat::Compact)]
    fn log_format_reads_snake_case_names(#[case] text: &str, #[case] expected: LogFormat) {
        let config = BridgeConfig::from_toml_str(text).expect("parse config");
        assert_eq!(config.log_format(), expected);
    }

    #[test]
    fn parse_error_omits_path_for_inline_text() {
        let error = BridgeConfig::from_toml_str("log_filter = ").expect_err("must fail");
        let message = error.to_string();
        assert!(message.starts_with("invalid configuration:"), "{message}");
    }
}
