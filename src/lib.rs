//! # reqlog
//!
//! Request logging for HTTP services: wrap a handler, get one structured
//! entry per request with the method, path, protocol, peer address, status
//! and latency. The handler, and the bytes the client receives, stay exactly
//! as they were.
//!
//! ## How it works
//!
//! Handlers write their response through a [`ResponseWriter`]. The logging
//! wrapper slips a [`StatusCapture`](middleware::StatusCapture) between the
//! handler and the real writer. The capture forwards every call and notes the
//! status on the way past. When the handler returns, the wrapper sends one
//! [`LogEntry`] to a [`LogSink`].
//!
//! ```text
//! request ──► Logging ──► your handler
//!               │              │  write_header / write
//!               │        StatusCapture ──► Response ──► client
//!               └──► sink.log(Info, LogEntry { status, latency, … })
//! ```
//!
//! What reqlog leaves to others:
//!
//! - **Formatting and transport**: whatever `tracing` subscriber you install
//! - **Level filtering**: `RUST_LOG` / `EnvFilter` on that subscriber
//! - **Request and response bodies**: never captured
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reqlog::{Request, ResponseWriter, Router, Server, StatusCode, TracingSink, with_logging};
//!
//! #[tokio::main]
//! async fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     let app = Router::new().post("/api/data", create);
//!
//!     Server::bind("0.0.0.0:8080")
//!         .serve(with_logging(app, TracingSink))
//!         .await
//!         .unwrap();
//! }
//!
//! fn create(w: &mut dyn ResponseWriter, _req: &Request) {
//!     w.write_header(StatusCode::CREATED);
//!     let _ = w.write(b"Success!");
//! }
//! ```
//!
//! Every request then produces an event like
//!
//! ```text
//! INFO reqlog::sink: Request method=POST path=/api/data proto=HTTP/1.1 remoteAddr=192.0.2.1:1234 status=201 latency=41.2µs
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod sink;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use http::{HeaderMap, Method, StatusCode, Version};
pub use middleware::{LogEntry, Logging, with_logging};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseWriter};
pub use router::Router;
pub use server::Server;
pub use sink::{LogSink, MemorySink, TracingSink};
