//! The single result of a dispatch lifecycle.

use serde::{Deserialize, Serialize};

/// Uniform client-facing description of a failed message.
///
/// Serializes as `{"error": "...", "status_code": 400}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorModel {
    /// Human-readable error message.
    pub error: String,
    /// Status code describing the failure class.
    pub status_code: u16,
}

impl ErrorModel {
    /// Creates an error model from a message and status code.
    #[must_use]
    pub fn new(error: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            status_code,
        }
    }
}

/// Outcome of dispatching one message.
///
/// Holds either the handler's return value, untouched, or the error that
/// stopped the pipeline. Handler-level statuses such as a 405 are part of `R`
/// and are not inspected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// The matched handler ran and produced this value.
    Handled(R),
    /// The pipeline stopped before a handler was invoked.
    Failed(ErrorModel),
}

impl<R> Outcome<R> {
    /// Returns `true` when a handler produced the outcome.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Returns the handler value, if any.
    #[must_use]
    pub fn handled(self) -> Option<R> {
        match self {
            Self::Handled(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Returns the error model, if the pipeline failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorModel> {
        match self {
            Self::Handled(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Converts into a `Result`, with the error model as the error.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorModel`] when the pipeline failed.
    pub fn into_result(self) -> Result<R, ErrorModel> {
        match self {
            Self::Handled(value) => Ok(value),
            Self::Failed(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_model_serializes_with_wire_keys() {
        let json = serde_json::to_string(&ErrorModel::new("Missing URL", 400)).expect("serialize");
        assert_eq!(json, r#"{"error":"Missing URL","status_code":400}"#);
    }

    #[test]
    fn outcome_holds_exactly_one_side() {
        let handled: Outcome<u8> = Outcome::Handled(7);
        assert!(handled.is_handled());
        assert!(handled.error().is_none());
        assert_eq!(handled.handled(), Some(7));

        let failed: Outcome<u8> = Outcome::Failed(ErrorModel::new("Resource not found.", 404));
        assert!(!failed.is_handled());
        assert_eq!(failed.error().map(|error| error.status_code), Some(404));
        assert_eq!(
            failed.into_result(),
            Err(ErrorModel::new("Resource not found.", 404))
        );
    }
}
