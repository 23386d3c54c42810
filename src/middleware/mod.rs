//! Middleware layer.
//!
//! Middleware is a [`Handler`](crate::Handler) that wraps another handler and
//! is the right place for cross-cutting concerns. Wrapping never changes what
//! the client receives.
//!
//! Built-in middleware:
//! - [`with_logging`]: one structured entry per request with method, path,
//!   protocol, peer address, status and latency
//!
//! [`StatusCapture`] is the writer wrapper `with_logging` uses to see the
//! status go by. It is public so other middleware can observe responses the
//! same way.

mod capture;
mod logging;

pub use capture::StatusCapture;
pub use logging::{LogEntry, Logging, with_logging};
