//! Handler abstraction invoked for matched routes.

use std::sync::Arc;

use super::RouteParams;
use crate::dispatch::SyntheticRequest;

/// Callable invoked with a synthetic request and the route's parameters.
///
/// The returned value is opaque to the bridge and is handed back to the
/// caller unchanged. Closures of the form
/// `Fn(SyntheticRequest, &RouteParams) -> R` implement this trait.
pub trait Handler: Send + Sync {
    /// Value produced by the handler.
    type Output;

    /// Handles one request.
    fn call(&self, request: SyntheticRequest, params: &RouteParams) -> Self::Output;
}

impl<F, R> Handler for F
where
    F: Fn(SyntheticRequest, &RouteParams) -> R + Send + Sync,
{
    type Output = R;

    fn call(&self, request: SyntheticRequest, params: &RouteParams) -> R {
        self(request, params)
    }
}

/// Reference-counted handler shared between routes and resolutions.
pub type SharedHandler<R> = Arc<dyn Handler<Output = R>>;
