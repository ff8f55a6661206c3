//! Route resolution seams.
//!
//! The bridge does not own a routing engine. It asks a [`RouteResolver`] to
//! map a path to a [`ResolvedRoute`]: a shared [`Handler`] plus the parameters
//! extracted from the path. [`RouteTable`] is a small resolver for callers
//! that have no engine of their own.
//!
//! ## Data Flow
//!
//! ```text
//! path ──▶ RouteResolver::resolve ──▶ Some(handler + params) | None
//! ```
//!
//! Resolvers must be deterministic: resolving the same path twice yields the
//! same handler and parameters.

mod handler;
mod table;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use handler::{Handler, SharedHandler};
pub use table::{RoutePatternError, RouteTable};

/// Parameters extracted from a path by a resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl RouteParams {
    /// Builds a parameter set.
    #[must_use]
    pub const fn new(positional: Vec<String>, named: BTreeMap<String, String>) -> Self {
        Self { positional, named }
    }

    /// Unnamed captures in path order.
    #[must_use]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Named captures.
    #[must_use]
    pub const fn named(&self) -> &BTreeMap<String, String> {
        &self.named
    }

    /// Looks up a named capture.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Returns `true` when nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Handler and parameters matched for a path.
pub struct ResolvedRoute<R> {
    /// Handler to invoke.
    pub handler: SharedHandler<R>,
    /// Parameters extracted from the path.
    pub params: RouteParams,
}

impl<R> ResolvedRoute<R> {
    /// Pairs a handler with its parameters.
    #[must_use]
    pub const fn new(handler: SharedHandler<R>, params: RouteParams) -> Self {
        Self { handler, params }
    }

    /// Returns `true` when both routes point at the same handler instance
    /// with equal parameters.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler) && self.params == other.params
    }
}

impl<R> Clone for ResolvedRoute<R> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            params: self.params.clone(),
        }
    }
}

impl<R> fmt::Debug for ResolvedRoute<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResolvedRoute")
            .field("handler", &Arc::as_ptr(&self.handler).cast::<()>())
            .field("params", &self.params)
            .finish()
    }
}

/// Capability that maps a path to a handler.
///
/// Implementations must be safe to call concurrently and must not keep
/// per-call state.
pub trait RouteResolver: Send + Sync {
    /// Value produced by the resolver's handlers.
    type Output;

    /// Returns the matching route, or `None` when no route matches.
    fn resolve(&self, path: &str) -> Option<ResolvedRoute<Self::Output>>;
}

impl<T> RouteResolver for Arc<T>
where
    T: RouteResolver + ?Sized,
{
    type Output = T::Output;

    fn resolve(&self, path: &str) -> Option<ResolvedRoute<Self::Output>> {
        (**self).resolve(path)
    }
}
