//! Request middleware combinators.
//!
//! A [`Middleware`] wraps a continuation [`Handler`] in a new handler,
//! typically mutating the [`RequestDescriptor`] before delegating. Chains
//! are built with [`Middleware::then`] (outer-to-inner: `m1.then(m2)`
//! behaves as `|h| m1(m2(h))`) and terminated with [`Middleware::apply`],
//! whose argument is usually the transport call.
//!
//! Composition is associative and order-preserving; a middleware invokes
//! its continuation at most once, and any error short-circuits the chain
//! as an `Err` without reaching the transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tern_core::{HttpResponse, RequestDescriptor};

use crate::error::ClientResult;

/// Boxed future used by handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A terminal or partially-wrapped request handler.
pub type Handler =
    Arc<dyn Fn(RequestDescriptor) -> BoxFuture<ClientResult<HttpResponse>> + Send + Sync>;

/// A composable request transformation step.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<dyn Fn(Handler) -> Handler + Send + Sync>,
}

impl Middleware {
    /// Creates a middleware from a handler-wrapping function.
    pub fn new(wrap: impl Fn(Handler) -> Handler + Send + Sync + 'static) -> Self {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// The identity middleware; `identity().then(m)` behaves as `m`.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|next| next)
    }

    /// Chains `next` inside this middleware.
    ///
    /// `m1.then(m2).apply(h)` evaluates as `m1(m2(h))`: `m1`'s transform
    /// runs first on the descriptor's way toward the terminal handler.
    #[must_use]
    pub fn then(self, next: Middleware) -> Middleware {
        Middleware {
            wrap: Arc::new(move |handler: Handler| (self.wrap)((next.wrap)(handler))),
        }
    }

    /// Applies the full chain to a terminal handler.
    #[must_use]
    pub fn apply(&self, terminal: Handler) -> Handler {
        (self.wrap)(terminal)
    }
}

/// Builds a middleware from a fallible descriptor mutation.
///
/// The mutation runs before the continuation; an `Err` short-circuits the
/// chain and the continuation is never invoked.
pub fn map_request<F>(f: F) -> Middleware
where
    F: Fn(&mut RequestDescriptor) -> ClientResult<()> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Middleware::new(move |next: Handler| {
        let f = Arc::clone(&f);
        Arc::new(move |mut descriptor: RequestDescriptor| match f(&mut descriptor) {
            Ok(()) => next(descriptor),
            Err(err) => Box::pin(std::future::ready(Err(err))),
        })
    })
}

/// Source of a value for [`set_attr`].
#[derive(Clone)]
pub enum AttrSource {
    /// A literal value, written unconditionally.
    Literal(Value),
    /// A value computed from the descriptor; `None` leaves the descriptor
    /// untouched.
    Computed(Arc<dyn Fn(&RequestDescriptor) -> Option<Value> + Send + Sync>),
}

impl AttrSource {
    /// Creates a computed source from a closure.
    pub fn computed(
        f: impl Fn(&RequestDescriptor) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::Computed(Arc::new(f))
    }
}

impl From<Value> for AttrSource {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// Attribute-setting middleware factory.
///
/// Computes a value per request and, when it is non-null, writes it at the
/// dotted `path` inside the descriptor, creating intermediate objects as
/// needed. A null/`None` value passes the descriptor through unchanged.
/// This is the single building block used for headers, method, credentials
/// and content bodies.
pub fn set_attr(path: &str, source: impl Into<AttrSource>) -> Middleware {
    let path = path.to_string();
    let source = source.into();
    map_request(move |descriptor| {
        let value = match &source {
            AttrSource::Literal(Value::Null) => None,
            AttrSource::Literal(v) => Some(v.clone()),
            AttrSource::Computed(f) => f(descriptor).filter(|v| !v.is_null()),
        };
        if let Some(value) = value {
            descriptor.set_path(&path, value);
        }
        Ok(())
    })
}
