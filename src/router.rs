//! Radix-tree request router.
//!
//! One [`matchit`] tree per HTTP method. Paths are matched exactly and
//! case-sensitively; a miss is a `404`. `HEAD` falls back to `GET`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application route table. Build it once at startup and hand it to
/// [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or is already registered for
    /// `method`. Routes are static, so this only fires on a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::Get, ..)`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Option<BoxedHandler> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        Some(Arc::clone(matched.value))
    }

    /// Routes one request to its handler, or answers `404 Not Found`.
    ///
    /// `HEAD` without its own route runs the `GET` handler; hyper drops the
    /// body on the wire.
    pub async fn dispatch(&self, req: Request) -> Response {
        let handler = self.lookup(req.method(), req.path()).or_else(|| match req.method() {
            Method::Head => self.lookup(Method::Get, req.path()),
            _ => None,
        });
        match handler {
            Some(handler) => handler.call(req).await,
            None => Response::status(Status::NotFound),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
