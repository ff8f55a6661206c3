//! Ordered table of path patterns.
//!
//! # Pattern syntax
//!
//! Patterns are `/`-separated segments. A literal segment must match exactly,
//! `{name}` captures a named parameter and `{}` captures a positional one.
//! Captures never match an empty segment. Trailing slashes are significant,
//! so `/api/mock/` does not match `/api/mock`.
//!
//! Routes are tried in registration order and the first match wins. The table
//! is immutable once built.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::{Handler, ResolvedRoute, RouteParams, RouteResolver, SharedHandler};
use crate::dispatch::SyntheticRequest;

/// Errors raised when a route pattern cannot be compiled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutePatternError {
    /// The pattern does not start with `/`.
    #[error("route pattern '{pattern}' must start with '/'")]
    NotAbsolute {
        /// Offending pattern.
        pattern: String,
    },
    /// A segment mixes braces with literal text or leaves a brace unclosed.
    #[error("route pattern '{pattern}' has an invalid segment '{segment}'")]
    InvalidSegment {
        /// Offending pattern.
        pattern: String,
        /// Segment that failed to parse.
        segment: String,
    },
    /// The same parameter name is captured twice.
    #[error("route pattern '{pattern}' captures '{name}' more than once")]
    DuplicateParameter {
        /// Offending pattern.
        pattern: String,
        /// Repeated parameter name.
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Named(String),
    Positional,
}

#[derive(Debug, Clone)]
struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    fn compile(raw: &str) -> Result<Self, RoutePatternError> {
        if !raw.starts_with('/') {
            return Err(RoutePatternError::NotAbsolute {
                pattern: raw.to_owned(),
            });
        }

        let mut segments = Vec::new();
        for part in raw.split('/') {
            let segment = parse_segment(raw, part)?;
            if let Segment::Named(name) = &segment
                && segments.contains(&segment)
            {
                return Err(RoutePatternError::DuplicateParameter {
                    pattern: raw.to_owned(),
                    name: name.clone(),
                });
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut positional = Vec::new();
        let mut named = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Named(_) | Segment::Positional if part.is_empty() => return None,
                Segment::Named(name) => {
                    named.insert(name.clone(), part.to_owned());
                }
                Segment::Positional => positional.push(part.to_owned()),
            }
        }
        Some(RouteParams::new(positional, named))
    }
}

fn parse_segment(pattern: &str, part: &str) -> Result<Segment, RoutePatternError> {
    let invalid = || RoutePatternError::InvalidSegment {
        pattern: pattern.to_owned(),
        segment: part.to_owned(),
    };

    match part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
        Some("") => Ok(Segment::Positional),
        Some(name) if is_parameter_name(name) => Ok(Segment::Named(name.to_owned())),
        Some(_) => Err(invalid()),
        None if part.contains(['{', '}']) => Err(invalid()),
        None => Ok(Segment::Literal(part.to_owned())),
    }
}

fn is_parameter_name(name: &str) -> bool {
    name.chars()
        .all(|character| character.is_ascii_alphanumeric() || character == '_')
}

struct Route<R> {
    pattern: RoutePattern,
    handler: SharedHandler<R>,
}

/// Ordered collection of routes implementing [`RouteResolver`].
pub struct RouteTable<R> {
    routes: Vec<Route<R>>,
}

impl<R> RouteTable<R> {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a closure for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`RoutePatternError`] if the pattern cannot be compiled.
    pub fn route<F>(self, pattern: &str, handler: F) -> Result<Self, RoutePatternError>
    where
        F: Fn(SyntheticRequest, &RouteParams) -> R + Send + Sync + 'static,
    {
        self.route_shared(pattern, Arc::new(handler))
    }

    /// Registers any [`Handler`] for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`RoutePatternError`] if the pattern cannot be compiled.
    pub fn route_handler<H>(self, pattern: &str, handler: H) -> Result<Self, RoutePatternError>
    where
        H: Handler<Output = R> + 'static,
    {
        self.route_shared(pattern, Arc::new(handler))
    }

    /// Registers an already shared handler for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`RoutePatternError`] if the pattern cannot be compiled.
    pub fn route_shared(
        mut self,
        pattern: &str,
        handler: SharedHandler<R>,
    ) -> Result<Self, RoutePatternError> {
        let pattern = RoutePattern::compile(pattern)?;
        self.routes.push(Route { pattern, handler });
        Ok(self)
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RouteTable<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_list()
            .entries(self.routes.iter().map(|route| route.pattern.raw.as_str()))
            .finish()
    }
}

impl<R> RouteResolver for RouteTable<R> {
    type Output = R;

    fn resolve(&self, path: &str) -> Option<ResolvedRoute<R>> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(path)
                .map(|params| ResolvedRoute::new(Arc::clone(&route.handler), params))
        })
    }
}
