//! Message validation and dispatch.
//!
//! This module turns one transport message into one [`Outcome`]. It decodes
//! the message, checks its fields, resolves the target path through a
//! [`RouteResolver`](crate::routing::RouteResolver), builds a
//! [`SyntheticRequest`] and invokes the matched handler.
//!
//! ## Protocol
//!
//! Clients send a single JSON object:
//!
//! ```json
//! {"url":"/api/mock/","method":"post","data":{"good":1},"token":"abc"}
//! ```
//!
//! Every key is optional at decode time. `method` defaults to `get` and
//! `data` to an empty object; `url` is required by validation.
//!
//! ## Errors
//!
//! Failures are reported to the client in one shape:
//!
//! ```json
//! {"error":"Resource not found.","status_code":404}
//! ```
//!
//! | Failure | `error` | `status_code` |
//! |---------|---------|---------------|
//! | payload is not a JSON object of the expected shape | `Invalid formatted message.` | 400 |
//! | `url` absent or empty | `Missing URL` | 400 |
//! | no route matches `url` | `Resource not found.` | 404 |
//!
//! Anything a handler returns, including its own error statuses, is passed
//! back unchanged.

mod dispatcher;
mod errors;
mod message;
mod method;
mod outcome;
mod request;
mod response;

pub use self::dispatcher::{DispatchStage, Dispatcher, ValidatedMessage};
pub use self::errors::{
    BridgeError, MALFORMED_MESSAGE, MISSING_URL, RESOURCE_NOT_FOUND, STATUS_BAD_REQUEST,
    STATUS_NOT_FOUND,
};
pub use self::message::{DecodedMessage, MessageBody, ValidatedRequest};
pub use self::method::RequestMethod;
pub use self::outcome::{ErrorModel, Outcome};
pub use self::request::{HeaderError, RequestBody, RequestFactory, SyntheticRequest};
pub use self::response::{OutcomeWriter, WriteError};
