//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler. The router is itself a [`Handler`], so a whole application
//! can be wrapped by middleware in one go:
//!
//! ```rust,no_run
//! # use reqlog::{Method, Request, ResponseWriter, Router, TracingSink, with_logging};
//! # fn list(_: &mut dyn ResponseWriter, _: &Request) {}
//! let app = with_logging(Router::new().get("/items", list), TracingSink);
//! ```

use std::collections::HashMap;

use http::header::{ALLOW, CONTENT_TYPE, HeaderValue, X_CONTENT_TYPE_OPTIONS};
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxFuture, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;

type BoxedHandler = Box<dyn Handler>;

/// The application router.
///
/// Build it once at startup; pass it (wrapped or not) to
/// [`Server::serve`](crate::Server::serve). Each registration returns `self`
/// so calls chain naturally.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

/// Outcome of matching a method + path pair.
enum Route<'a> {
    Found(&'a dyn Handler, HashMap<String, String>),
    /// The path exists, but not for this method. Holds the `Allow` list.
    MethodNotAllowed(String),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use reqlog::{Method, Request, ResponseWriter, Router};
    /// # fn get_user(_: &mut dyn ResponseWriter, _: &Request) {}
    /// # fn delete_user(_: &mut dyn ResponseWriter, _: &Request) {}
    /// Router::new()
    ///     .on(Method::DELETE, "/users/{id}", delete_user)
    ///     .on(Method::GET,    "/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Box::new(handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn route(&self, method: &Method, path: &str) -> Route<'_> {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Route::Found(&**matched.value, params);
        }

        let mut allowed: Vec<&str> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.as_str())
            .collect();
        if allowed.is_empty() {
            return Route::NotFound;
        }
        allowed.sort_unstable();
        Route::MethodNotAllowed(allowed.join(", "))
    }
}

impl Handler for Router {
    fn serve<'a>(&'a self, w: &'a mut dyn ResponseWriter, req: &'a Request) -> BoxFuture<'a> {
        match self.route(req.method(), req.path()) {
            Route::Found(handler, params) => Box::pin(async move {
                let req = req.with_params(params);
                handler.serve(w, &req).await;
            }),
            Route::MethodNotAllowed(allow) => {
                debug!(method = %req.method(), path = req.path(), "no route for method");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    w.headers_mut().insert(ALLOW, value);
                }
                plain_error(w, StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed\n");
                Box::pin(std::future::ready(()))
            }
            Route::NotFound => {
                debug!(method = %req.method(), path = req.path(), "no route");
                plain_error(w, StatusCode::NOT_FOUND, "404 page not found\n");
                Box::pin(std::future::ready(()))
            }
        }
    }
}

fn plain_error(w: &mut dyn ResponseWriter, status: StatusCode, body: &str) {
    let headers = w.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    w.write_header(status);
    // The buffered writer cannot fail on an error page.
    let _ = w.write(body.as_bytes());
}
