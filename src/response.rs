//! The response-writer capability and the buffered writer the server uses.
//!
//! Handlers never build a response value and return it. They receive a
//! `&mut dyn ResponseWriter` and push the response through it: headers first,
//! then a status line, then body bytes. That shape is what lets middleware sit
//! between a handler and the connection and *watch* the response go by (see
//! [`middleware::StatusCapture`](crate::middleware::StatusCapture)).
//!
//! # The write contract
//!
//! ```text
//! headers_mut()   ← free to edit until the status is committed
//! write_header()  ← commits status + a snapshot of the headers, first call wins
//!                    (1xx codes never commit; this writer cannot send them)
//! write()         ← commits 200 OK if nothing was committed yet, then appends
//! ```

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::{debug, warn};

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// Everything a handler can do to an outgoing response.
///
/// `Send` is a supertrait so that `&mut dyn ResponseWriter` may be held
/// across `.await` points inside a handler future that tokio moves between
/// worker threads.
pub trait ResponseWriter: Send {
    /// Headers that will be sent with the response.
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the response headers. Edits made after the status
    /// has been committed do not reach the client.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code. Only the first final (non-1xx) call has any
    /// effect on the wire.
    fn write_header(&mut self, status: StatusCode);

    /// Appends body bytes, committing `200 OK` first if no status was set.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Pushes buffered bytes towards the client, where the writer supports it.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// The in-memory [`ResponseWriter`] handed to handlers by the server.
///
/// The body is buffered and sent as a single `Full<Bytes>` once the handler
/// returns. Outside the server it doubles as a recorder: build one with
/// [`Response::new`], pass it to a handler, then inspect [`status`](Self::status),
/// [`headers`](ResponseWriter::headers) and [`body`](Self::body).
///
/// ```rust
/// use reqlog::{Response, ResponseWriter, StatusCode};
///
/// let mut res = Response::new();
/// res.write_header(StatusCode::CREATED);
/// res.write(b"Success!").unwrap();
///
/// assert_eq!(res.status(), StatusCode::CREATED);
/// assert_eq!(res.body(), b"Success!");
/// ```
#[derive(Debug, Default)]
pub struct Response {
    headers: HeaderMap,
    committed: Option<Committed>,
    body: BytesMut,
}

/// Status line and headers as they were when the status was committed.
#[derive(Debug)]
struct Committed {
    status: StatusCode,
    headers: HeaderMap,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status the client will see. `200 OK` while nothing is committed,
    /// matching what [`into_inner`](Self::into_inner) sends in that case.
    pub fn status(&self) -> StatusCode {
        self.committed.as_ref().map_or(StatusCode::OK, |c| c.status)
    }

    /// Whether a status has been committed, explicitly or by a body write.
    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the recorded response into the hyper response sent on the wire.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let (status, headers) = match self.committed {
            Some(c) => (c.status, c.headers),
            None => (StatusCode::OK, self.headers),
        };
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = headers;
        res
    }

    fn commit(&mut self, status: StatusCode) {
        self.committed = Some(Committed { status, headers: self.headers.clone() });
    }
}

impl ResponseWriter for Response {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        // Interim responses are dropped: the final status is still to come.
        if status.is_informational() {
            debug!(status = status.as_u16(), "informational status not sent");
            return;
        }
        if let Some(c) = &self.committed {
            warn!(
                committed = c.status.as_u16(),
                ignored = status.as_u16(),
                "superfluous write_header call"
            );
            return;
        }
        self.commit(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.committed.is_none() {
            self.commit(StatusCode::OK);
        }
        if !body_allowed(self.status()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "request method or response status code does not allow body",
            ));
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// RFC 9110 §15: `204` and `304` responses carry no content.
fn body_allowed(status: StatusCode) -> bool {
    status != StatusCode::NO_CONTENT && status != StatusCode::NOT_MODIFIED
}
