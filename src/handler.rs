//! Handler trait.
//!
//! # One capability, many shapes
//!
//! Everything that can answer a request implements [`Handler`]: a plain
//! function, a [`Router`](crate::Router), or a middleware such as
//! [`Logging`](crate::middleware::Logging) that wraps another handler. Because
//! the wrapper and the wrapped share the same trait, wrappers nest freely and
//! the server never knows which one it is talking to.
//!
//! ```text
//! Server ──► Logging<Router, TracingSink> ──► Router ──► fn create(w, req)
//!                 │                                          │
//!                 └── StatusCapture(&mut Response) ◄─────────┘  writes go through
//! ```
//!
//! The response is *written*, not returned. A handler receives
//! `&mut dyn ResponseWriter` and the request, and is done when its future
//! resolves.

use std::future::Future;
use std::pin::Pin;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated future borrowing the writer and request for `'a`.
///
/// `Send` lets tokio move an in-flight request between worker threads.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Answers one request by writing to a [`ResponseWriter`].
///
/// Synchronous functions with the signature below implement it automatically:
///
/// ```text
/// fn name(w: &mut dyn ResponseWriter, req: &Request)
/// ```
///
/// Handlers that need to `.await` implement the trait themselves:
///
/// ```rust
/// use std::time::Duration;
/// use reqlog::{BoxFuture, Handler, Request, ResponseWriter};
///
/// struct Slow;
///
/// impl Handler for Slow {
///     fn serve<'a>(&'a self, w: &'a mut dyn ResponseWriter, _req: &'a Request) -> BoxFuture<'a> {
///         Box::pin(async move {
///             tokio::time::sleep(Duration::from_millis(5)).await;
///             let _ = w.write(b"done");
///         })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn serve<'a>(&'a self, w: &'a mut dyn ResponseWriter, req: &'a Request) -> BoxFuture<'a>;
}

impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn serve<'a>(&'a self, w: &'a mut dyn ResponseWriter, req: &'a Request) -> BoxFuture<'a> {
        // The function runs to completion before the future is handed back;
        // the returned future is only there to fit the trait.
        self(w, req);
        Box::pin(std::future::ready(()))
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::response::Response;

    fn teapot(w: &mut dyn ResponseWriter, _req: &Request) {
        w.write_header(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn plain_functions_are_handlers() {
        let mut res = Response::new();
        let req = Request::default();

        teapot.serve(&mut res, &req).await;

        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn annotated_closures_are_handlers() {
        let greeting = String::from("hi ");
        let handler = move |w: &mut dyn ResponseWriter, req: &Request| {
            let _ = w.write(greeting.as_bytes());
            let _ = w.write(req.path().as_bytes());
        };

        let mut res = Response::new();
        let req = Request::builder().uri("/there").build();
        handler.serve(&mut res, &req).await;

        assert_eq!(res.body(), b"hi /there");
    }
}
