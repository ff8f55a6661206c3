use std::collections::BTreeMap;

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Scheme prefixed to forwarded tokens in the `Authorization` header.
pub const DEFAULT_AUTH_SCHEME: &str = "JWT";

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned authorization scheme used by serde.
#[must_use]
pub fn default_auth_scheme_string() -> String {
    DEFAULT_AUTH_SCHEME.to_owned()
}

/// Synthetic requests carry no extra headers unless configured.
#[must_use]
pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::new()
}
