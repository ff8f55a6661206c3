//! Output format of the bridge's log events.
//!
//! `log_format` in the configuration file selects how the subscriber built by
//! `wsbridge::telemetry` renders dispatch events: one JSON object per line
//! for log collectors, or a compact line for a terminal. The file spells the
//! formats in snake case; parsing from text with [`str::parse`] also accepts
//! any letter case.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, with event fields at the top level.
    #[default]
    Json,
    /// Single human-readable line per event.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
