//! Destinations for request log entries.
//!
//! The middleware only decides *what* gets logged. Where an entry ends up,
//! how it is formatted and whether it is filtered out are the sink's business.
//!
//! | Sink | Use |
//! |---|---|
//! | [`TracingSink`] | production: one `tracing` event per request |
//! | [`MemorySink`] | tests: keeps every entry for later assertions |

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::Level;

use crate::middleware::LogEntry;

/// Accepts one structured entry at a severity level.
///
/// Called concurrently from every in-flight request, hence `Send + Sync`.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, level: Level, entry: &LogEntry);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, level: Level, entry: &LogEntry) {
        (**self).log(level, entry);
    }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// Emits each entry as a `tracing` event with message `Request`.
///
/// Field names are fixed for downstream consumers: `method`, `path`, `proto`,
/// `remoteAddr`, `status` and `latency`. `status` is recorded as an integer.
/// `latency` is recorded with the `Debug` form of [`Duration`](std::time::Duration),
/// e.g. `41.2µs` or `1.5ms`: readable, but a string to machine consumers. Sinks
/// that need a number should implement [`LogSink`] and read
/// [`LogEntry::latency`] directly, which keeps nanosecond resolution.
///
/// Install any subscriber to pick the event up:
///
/// ```rust,no_run
/// tracing_subscriber::fmt()
///     .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
///     .init();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

// `tracing::event!` needs its level at compile time.
macro_rules! request_event {
    ($level:expr, $entry:expr) => {
        tracing::event!(
            $level,
            method = %$entry.method,
            path = %$entry.path,
            proto = %$entry.proto,
            remoteAddr = %$entry.remote_addr,
            status = $entry.status,
            latency = ?$entry.latency,
            "Request"
        )
    };
}

impl LogSink for TracingSink {
    fn log(&self, level: Level, entry: &LogEntry) {
        if level == Level::ERROR {
            request_event!(Level::ERROR, entry);
        } else if level == Level::WARN {
            request_event!(Level::WARN, entry);
        } else if level == Level::INFO {
            request_event!(Level::INFO, entry);
        } else if level == Level::DEBUG {
            request_event!(Level::DEBUG, entry);
        } else {
            request_event!(Level::TRACE, entry);
        }
    }
}

// ── MemorySink ────────────────────────────────────────────────────────────────

/// Records every entry in memory. Clones share the same record.
///
/// ```rust
/// use reqlog::{Handler, MemorySink, Request, Response, ResponseWriter, with_logging};
///
/// fn ok(w: &mut dyn ResponseWriter, _req: &Request) {
///     let _ = w.write(b"ok");
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sink = MemorySink::new();
/// let app = with_logging(ok, sink.clone());
///
/// app.serve(&mut Response::new(), &Request::default()).await;
///
/// let entries = sink.entries();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].1.status, 200);
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<(Level, LogEntry)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far, oldest first.
    pub fn entries(&self) -> Vec<(Level, LogEntry)> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns everything logged so far.
    pub fn take(&self) -> Vec<(Level, LogEntry)> {
        std::mem::take(&mut *self.lock())
    }

    // A panicking test thread must not hide the entries from the others.
    fn lock(&self) -> MutexGuard<'_, Vec<(Level, LogEntry)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, entry: &LogEntry) {
        self.lock().push((level, entry.clone()));
    }
}
