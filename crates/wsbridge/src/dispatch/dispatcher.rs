//! Message validation and handler dispatch.
//!
//! The [`Dispatcher`] runs one message through the pipeline:
//!
//! ```text
//! Start → Decoding → FieldChecking → RouteResolving → Dispatching → Done
//!            │             │               │
//!            └─────────────┴───────────────┴──▶ Errored
//! ```
//!
//! The first failing stage decides the outcome; later stages never run. The
//! dispatcher holds only immutable state, so one instance can serve any
//! number of threads as long as its resolver and handlers can.

use std::fmt;

use tracing::{debug, warn};

use wsbridge_config::BridgeConfig;

use super::errors::BridgeError;
use super::message::{DecodedMessage, ValidatedRequest};
use super::outcome::Outcome;
use super::request::{HeaderError, RequestFactory};
use crate::routing::{ResolvedRoute, RouteResolver};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Stages of the dispatch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    /// Nothing has run yet.
    Start,
    /// Decoding the raw message.
    Decoding,
    /// Checking required fields.
    FieldChecking,
    /// Resolving the path to a route.
    RouteResolving,
    /// Building the request and invoking the handler.
    Dispatching,
    /// The handler returned.
    Done,
    /// A stage failed; the outcome is an error.
    Errored,
}

impl DispatchStage {
    /// Returns the stage that raises `error`.
    #[must_use]
    pub const fn raising(error: &BridgeError) -> Self {
        match error {
            BridgeError::MalformedMessage { .. } => Self::Decoding,
            BridgeError::MissingUrl => Self::FieldChecking,
            BridgeError::ResourceNotFound { .. } => Self::RouteResolving,
        }
    }

    /// Returns the canonical stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Decoding => "decoding",
            Self::FieldChecking => "field_checking",
            Self::RouteResolving => "route_resolving",
            Self::Dispatching => "dispatching",
            Self::Done => "done",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A message that passed validation, with the route it resolved to.
#[derive(Debug, Clone)]
pub struct ValidatedMessage<R> {
    /// Validated fields.
    pub request: ValidatedRequest,
    /// Route matched for the request path.
    pub route: ResolvedRoute<R>,
}

/// Runs messages through validation, routing and handler invocation.
#[derive(Debug, Clone)]
pub struct Dispatcher<Res> {
    resolver: Res,
    factory: RequestFactory,
}

impl<Res> Dispatcher<Res>
where
    Res: RouteResolver,
{
    /// Creates a dispatcher with default request settings.
    #[must_use]
    pub fn new(resolver: Res) -> Self {
        Self {
            resolver,
            factory: RequestFactory::default(),
        }
    }

    /// Creates a dispatcher using the configured scheme and default headers.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] when a configured default header is not a
    /// valid HTTP header.
    pub fn from_config(resolver: Res, config: &BridgeConfig) -> Result<Self, HeaderError> {
        Ok(Self {
            resolver,
            factory: RequestFactory::from_config(config)?,
        })
    }

    /// Replaces the request factory.
    #[must_use]
    pub fn with_factory(mut self, factory: RequestFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Route resolver used by this dispatcher.
    #[must_use]
    pub const fn resolver(&self) -> &Res {
        &self.resolver
    }

    /// Returns the request factory for a message carrying `token`.
    #[must_use]
    pub fn request_factory(&self, token: Option<&str>) -> RequestFactory {
        self.factory.for_token(token)
    }

    /// Resolves `path`, translating a miss into the bridge error model.
    ///
    /// Resolution has no side effects; calling this twice for the same path
    /// returns equivalent routes.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::ResourceNotFound` when no route matches.
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute<Res::Output>, BridgeError> {
        match self.resolver.resolve(path) {
            Some(route) => {
                debug!(
                    target: DISPATCH_TARGET,
                    path,
                    positional = route.params.positional().len(),
                    named = route.params.named().len(),
                    "route matched"
                );
                Ok(route)
            }
            None => Err(BridgeError::resource_not_found(path)),
        }
    }

    /// Decodes and validates a message and resolves its route.
    ///
    /// No handler is invoked.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing stage: a malformed message, a
    /// missing URL, or an unmatched path.
    pub fn validate(&self, raw: &str) -> Result<ValidatedMessage<Res::Output>, BridgeError> {
        debug!(target: DISPATCH_TARGET, stage = %DispatchStage::Decoding, "decoding message");
        let message = DecodedMessage::parse(raw)?;

        let request = message.into_validated()?;

        debug!(
            target: DISPATCH_TARGET,
            stage = %DispatchStage::RouteResolving,
            method = %request.method,
            path = %request.path,
            "resolving route"
        );
        let route = self.resolve(&request.path)?;

        Ok(ValidatedMessage { request, route })
    }

    /// Returns `true` when the message would reach a handler.
    ///
    /// Repeated calls give the same answer and never invoke a handler.
    #[must_use]
    pub fn is_valid(&self, raw: &str) -> bool {
        self.validate(raw).is_ok()
    }

    /// Dispatches one message.
    ///
    /// Returns the handler's value verbatim, or the error model of the first
    /// failing stage.
    pub fn dispatch(&self, raw: &str) -> Outcome<Res::Output> {
        let ValidatedMessage { request, route } = match self.validate(raw) {
            Ok(validated) => validated,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    stage = %DispatchStage::raising(&error),
                    status = error.status_code(),
                    %error,
                    "message rejected"
                );
                return Outcome::Failed(error.error_model());
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            stage = %DispatchStage::Dispatching,
            method = %request.method,
            path = %request.path,
            "invoking handler"
        );
        let synthetic = self.factory.build(request);
        let output = route.handler.call(synthetic, &route.params);
        debug!(target: DISPATCH_TARGET, stage = %DispatchStage::Done, "handler returned");

        Outcome::Handled(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::header::AUTHORIZATION;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::dispatch::errors::{MALFORMED_MESSAGE, MISSING_URL, RESOURCE_NOT_FOUND};
    use crate::dispatch::outcome::ErrorModel;
    use crate::dispatch::request::SyntheticRequest;
    use crate::routing::{RouteParams, RouteTable};

    /// Echoes what the handler saw so tests can inspect the synthetic request.
    #[derive(Debug, PartialEq)]
    struct Seen {
        method: String,
        path: String,
        body: Value,
        authorization: Option<String>,
        params: RouteParams,
    }

    fn echo(request: SyntheticRequest, params: &RouteParams) -> Seen {
        Seen {
            method: request.method().to_string(),
            path: request.path().to_owned(),
            body: request.body().to_value().unwrap_or(Value::Null),
            authorization: request.header(AUTHORIZATION).map(str::to_owned),
            params: params.clone(),
        }
    }

    #[fixture]
    fn dispatcher() -> Dispatcher<RouteTable<Seen>> {
        let table = RouteTable::new()
            .route("/api/mock/", echo)
            .and_then(|table| table.route("/api/items/{id}/", echo))
            .expect("build table");
        Dispatcher::new(table)
    }

    fn failure(outcome: Outcome<Seen>) -> ErrorModel {
        match outcome {
            Outcome::Failed(error) => error,
            Outcome::Handled(seen) => panic!("expected failure, handler saw {seen:?}"),
        }
    }

    fn handled(outcome: Outcome<Seen>) -> Seen {
        match outcome {
            Outcome::Handled(seen) => seen,
            Outcome::Failed(error) => panic!("expected success, got {error:?}"),
        }
    }

    #[rstest]
    #[case::garbage("errormsg")]
    #[case::truncated("{")]
    #[case::array("[]")]
    fn malformed_messages_fail_decoding(
        dispatcher: Dispatcher<RouteTable<Seen>>,
        #[case] raw: &str,
    ) {
        assert_eq!(
            failure(dispatcher.dispatch(raw)),
            ErrorModel::new(MALFORMED_MESSAGE, 400)
        );
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::empty(json!({"url": ""}))]
    #[case::null(json!({"url": null, "method": "post"}))]
    fn messages_without_url_fail_field_check(
        dispatcher: Dispatcher<RouteTable<Seen>>,
        #[case] message: Value,
    ) {
        assert_eq!(
            failure(dispatcher.dispatch(&message.to_string())),
            ErrorModel::new(MISSING_URL, 400)
        );
    }

    #[rstest]
    fn unmatched_url_is_not_found(dispatcher: Dispatcher<RouteTable<Seen>>) {
        let outcome = dispatcher.dispatch(r#"{"url": "/api/nonexistent/"}"#);
        assert_eq!(failure(outcome), ErrorModel::new(RESOURCE_NOT_FOUND, 404));
    }

    #[rstest]
    fn valid_message_reaches_handler(dispatcher: Dispatcher<RouteTable<Seen>>) {
        let seen = handled(dispatcher.dispatch(r#"{"url": "/api/mock/"}"#));
        assert_eq!(seen.method, "get");
        assert_eq!(seen.path, "/api/mock/");
        assert_eq!(seen.body, json!({}));
        assert_eq!(seen.authorization, None);
    }

    #[rstest]
    fn forwards_token_and_encoded_body(dispatcher: Dispatcher<RouteTable<Seen>>) {
        let raw = json!({
            "url": "/api/items/7/",
            "method": "POST",
            "data": {"good": 1},
            "token": "abc"
        })
        .to_string();

        let seen = handled(dispatcher.dispatch(&raw));

        assert_eq!(seen.method, "post");
        assert_eq!(seen.body, json!({"good": 1}));
        assert_eq!(seen.authorization.as_deref(), Some("JWT abc"));
        assert_eq!(seen.params.get("id"), Some("7"));
    }

    #[rstest]
    #[case::absent(json!({"url": "/api/mock/"}))]
    #[case::null(json!({"url": "/api/mock/", "token": null}))]
    #[case::empty(json!({"url": "/api/mock/", "token": ""}))]
    fn missing_token_adds_no_authorization(
        dispatcher: Dispatcher<RouteTable<Seen>>,
        #[case] message: Value,
    ) {
        let seen = handled(dispatcher.dispatch(&message.to_string()));
        assert_eq!(seen.authorization, None);
    }

    #[rstest]
    fn is_valid_matches_pipeline(dispatcher: Dispatcher<RouteTable<Seen>>) {
        assert!(dispatcher.is_valid(r#"{"url": "/api/mock/"}"#));
        assert!(!dispatcher.is_valid(r#"{"url": "/api/nonexistent/"}"#));
        assert!(!dispatcher.is_valid("{"));
        assert!(!dispatcher.is_valid("{}"));
    }

    #[test]
    fn is_valid_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let table = RouteTable::new()
            .route("/api/mock/", move |_request: SyntheticRequest, _params: &RouteParams| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .expect("build table");
        let dispatcher = Dispatcher::new(table);

        assert!(dispatcher.is_valid(r#"{"url": "/api/mock/"}"#));
        assert!(dispatcher.is_valid(r#"{"url": "/api/mock/"}"#));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(dispatcher.dispatch(r#"{"url": "/api/mock/"}"#).is_handled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn resolution_is_idempotent(dispatcher: Dispatcher<RouteTable<Seen>>) {
        let first = dispatcher.resolve("/api/items/3/").expect("first resolution");
        let second = dispatcher.resolve("/api/items/3/").expect("second resolution");
        assert!(first.same_as(&second));
    }

    #[rstest]
    fn validate_exposes_request_and_route(dispatcher: Dispatcher<RouteTable<Seen>>) {
        let validated = dispatcher
            .validate(r#"{"url": "/api/items/9/", "method": "Delete"}"#)
            .expect("validate");
        assert_eq!(validated.request.method.as_str(), "delete");
        assert_eq!(validated.route.params.get("id"), Some("9"));

        let factory = dispatcher.request_factory(Some("tok"));
        let request = factory.build(validated.request);
        let seen = validated.route.handler.call(request, &validated.route.params);
        assert_eq!(seen.authorization.as_deref(), Some("JWT tok"));
    }

    #[rstest]
    #[case::malformed(BridgeError::malformed("x"), DispatchStage::Decoding)]
    #[case::missing(BridgeError::missing_url(), DispatchStage::FieldChecking)]
    #[case::not_found(BridgeError::resource_not_found("/x/"), DispatchStage::RouteResolving)]
    fn errors_map_to_raising_stage(#[case] error: BridgeError, #[case] stage: DispatchStage) {
        assert_eq!(DispatchStage::raising(&error), stage);
    }

    #[test]
    fn dispatcher_reads_config() {
        let config = BridgeConfig {
            auth_scheme: "Bearer".to_owned(),
            ..BridgeConfig::default()
        };
        let table = RouteTable::new().route("/api/mock/", echo).expect("build table");
        let dispatcher = Dispatcher::from_config(table, &config).expect("valid config");

        let seen = handled(dispatcher.dispatch(r#"{"url": "/api/mock/", "token": "abc"}"#));

        assert_eq!(seen.authorization.as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn dispatcher_is_shareable_across_threads() {
        let table = RouteTable::new().route("/api/mock/", echo).expect("build table");
        let dispatcher = Arc::new(Dispatcher::new(table));

        let workers: Vec<_> = (0..4)
            .map(|index| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    let raw = json!({"url": "/api/mock/", "token": format!("t{index}")});
                    handled(dispatcher.dispatch(&raw.to_string()))
                })
            })
            .collect();

        for (index, worker) in workers.into_iter().enumerate() {
            let seen = worker.join().expect("worker");
            assert_eq!(seen.authorization, Some(format!("JWT t{index}")));
        }
    }
}
