//! A pass-through [`ResponseWriter`] that remembers the status code.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// Forwards every call to the wrapped writer and records the effective status.
///
/// The status is recorded from the first [`write_header`](ResponseWriter::write_header)
/// call with a final (non-1xx) code, or set to `200 OK` by the first
/// [`write`](ResponseWriter::write) if the handler never chose one. Nothing else is observed or changed: headers, body
/// bytes, return values and errors all pass straight through.
pub struct StatusCapture<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: Option<StatusCode>,
}

impl<'w> StatusCapture<'w> {
    pub fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self { inner, status: None }
    }

    /// The captured status, or `None` if the handler neither set a status
    /// nor wrote any body bytes.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl ResponseWriter for StatusCapture<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        // Mirror the platform rule: later calls are forwarded but do not
        // change what the client receives, and 1xx codes are never final.
        if !status.is_informational() {
            self.status.get_or_insert(status);
        }
        self.inner.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
