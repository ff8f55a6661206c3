//! Bridge from message transports to path-routed handlers.
//!
//! A persistent connection such as a WebSocket delivers self-describing JSON
//! messages. For each one the bridge decides whether it is a well-formed
//! request, resolves its `url` against a route table, builds an equivalent
//! [`SyntheticRequest`] and calls the matched handler, all in-process.
//!
//! ```text
//! raw text ─▶ decode ─▶ check fields ─▶ resolve route ─▶ build request ─▶ handler
//!               │            │               │
//!               └────────────┴───────────────┴──▶ {"error": ..., "status_code": ...}
//! ```
//!
//! The crate owns the pipeline only. Routing engines plug in through
//! [`RouteResolver`], handlers through [`Handler`], and the transport simply
//! passes text in and takes an [`Outcome`] out. [`RouteTable`] covers hosts
//! that need a small routing engine of their own.
//!
//! ```rust
//! use wsbridge::{Dispatcher, Outcome, RouteParams, RouteTable, SyntheticRequest};
//!
//! # fn main() -> Result<(), wsbridge::RoutePatternError> {
//! let table = RouteTable::new().route(
//!     "/api/items/{id}/",
//!     |request: SyntheticRequest, params: &RouteParams| {
//!         format!("{} {}", request.method(), params.get("id").unwrap_or_default())
//!     },
//! )?;
//! let dispatcher = Dispatcher::new(table);
//!
//! let outcome = dispatcher.dispatch(r#"{"url": "/api/items/7/", "method": "PUT"}"#);
//! assert_eq!(outcome, Outcome::Handled("put 7".to_owned()));
//! # Ok(())
//! # }
//! ```

pub use http;

pub mod dispatch;
pub mod routing;
pub mod telemetry;

pub use dispatch::{
    BridgeError, DecodedMessage, DispatchStage, Dispatcher, ErrorModel, HeaderError, Outcome,
    OutcomeWriter, RequestBody, RequestFactory, RequestMethod, SyntheticRequest,
    ValidatedMessage, ValidatedRequest, WriteError,
};
pub use routing::{
    Handler, ResolvedRoute, RouteParams, RoutePatternError, RouteResolver, RouteTable,
    SharedHandler,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
