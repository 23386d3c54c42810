//! A router wrapped with request logging.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example with_logging
//!
//! Try:
//!   curl -X POST http://localhost:8080/api/data
//!   curl http://localhost:8080/users/42
//!   curl http://localhost:8080/nope
//!
//! Each request prints one line such as
//!   INFO reqlog::sink: Request method=POST path=/api/data proto=HTTP/1.1 remoteAddr=127.0.0.1:52814 status=201 latency=38.1µs

use reqlog::{Request, ResponseWriter, Router, Server, StatusCode, TracingSink, with_logging};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .post("/api/data", create)
        .get("/users/{id}", get_user);

    Server::bind("0.0.0.0:8080")
        .serve(with_logging(app, TracingSink))
        .await
        .expect("server error");
}

// POST /api/data → 201
fn create(w: &mut dyn ResponseWriter, _req: &Request) {
    w.write_header(StatusCode::CREATED);
    let _ = w.write(b"Success!");
}

// GET /users/{id} → 200, status implied by the first write
fn get_user(w: &mut dyn ResponseWriter, req: &Request) {
    let id = req.param("id").unwrap_or("unknown");
    let _ = w.write(format!(r#"{{"id":"{id}","name":"alice"}}"#).as_bytes());
}
