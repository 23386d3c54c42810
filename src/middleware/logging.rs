//! Per-request access logging.

use std::time::{Duration, Instant};

use tracing::Level;

use crate::handler::{BoxFuture, Handler};
use crate::middleware::capture::StatusCapture;
use crate::request::Request;
use crate::response::ResponseWriter;
use crate::sink::LogSink;

/// One completed request, as handed to a [`LogSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub method: String,
    /// Percent-decoded, without the query string.
    pub path: String,
    pub proto: String,
    pub remote_addr: String,
    /// `0` when the handler neither set a status nor wrote a body.
    pub status: u16,
    pub latency: Duration,
}

impl LogEntry {
    fn new(req: &Request, status: u16, latency: Duration) -> Self {
        Self {
            method: req.method().as_str().to_owned(),
            path: req.decoded_path().into_owned(),
            proto: req.proto().to_owned(),
            remote_addr: req.remote_addr().to_string(),
            status,
            latency,
        }
    }
}

/// Wraps `handler` so that every request it completes is logged to `sink`.
///
/// The returned handler behaves exactly like `handler`; the only addition is
/// one `Info` entry per request, emitted after `handler` has returned.
///
/// ```rust,no_run
/// use reqlog::{Method, Request, ResponseWriter, Router, Server, StatusCode, TracingSink, with_logging};
///
/// fn create(w: &mut dyn ResponseWriter, _req: &Request) {
///     w.write_header(StatusCode::CREATED);
///     let _ = w.write(b"Success!");
/// }
///
/// # async fn run() -> Result<(), reqlog::Error> {
/// let app = Router::new().on(Method::POST, "/api/data", create);
/// Server::bind("0.0.0.0:8080").serve(with_logging(app, TracingSink)).await
/// # }
/// ```
pub fn with_logging<H, S>(handler: H, sink: S) -> Logging<H, S>
where
    H: Handler,
    S: LogSink,
{
    Logging { inner: handler, sink }
}

/// Handler returned by [`with_logging`].
#[derive(Clone, Debug)]
pub struct Logging<H, S> {
    inner: H,
    sink: S,
}

impl<H, S> Handler for Logging<H, S>
where
    H: Handler,
    S: LogSink,
{
    fn serve<'a>(&'a self, w: &'a mut dyn ResponseWriter, req: &'a Request) -> BoxFuture<'a> {
        Box::pin(async move {
            let started_at = Instant::now();
            let mut capture = StatusCapture::new(w);

            self.inner.serve(&mut capture, req).await;

            let status = capture.status().map_or(0, |s| s.as_u16());
            let entry = LogEntry::new(req, status, started_at.elapsed());
            self.sink.log(Level::INFO, &entry);
        })
    }
}
