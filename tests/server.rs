//! End-to-end: a logged router served over a real TCP socket.

use std::collections::HashMap;
use std::net::SocketAddr;

use reqlog::{MemorySink, Request, ResponseWriter, Router, Server, StatusCode, with_logging};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn create(w: &mut dyn ResponseWriter, _req: &Request) {
    w.write_header(StatusCode::CREATED);
    let _ = w.write(b"Success!");
}

fn echo(w: &mut dyn ResponseWriter, req: &Request) {
    let _ = w.write(req.body());
}

fn silent(_w: &mut dyn ResponseWriter, _req: &Request) {}

fn interim_then_body(w: &mut dyn ResponseWriter, _req: &Request) {
    w.write_header(StatusCode::CONTINUE);
    let _ = w.write(b"ok");
}

fn interim_only(w: &mut dyn ResponseWriter, _req: &Request) {
    w.write_header(StatusCode::CONTINUE);
}

fn file(w: &mut dyn ResponseWriter, req: &Request) {
    let _ = w.write(req.param("name").unwrap_or_default().as_bytes());
}

fn status_from_path(w: &mut dyn ResponseWriter, req: &Request) {
    let status = req.param("code")
        .and_then(|c| c.parse().ok())
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or(StatusCode::BAD_REQUEST);
    w.write_header(status);
}

struct TestServer {
    addr: SocketAddr,
    sink: MemorySink,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), reqlog::Error>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let sink = MemorySink::new();

        let app = Router::new()
            .post("/api/data", create)
            .put("/echo", echo)
            .get("/silent", silent)
            .get("/info", interim_then_body)
            .get("/interim", interim_only)
            .get("/files/{name}", file)
            .get("/status/{code}", status_from_path);
        let app = with_logging(app, sink.clone());

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(Server::from_listener(listener).serve_with_shutdown(app, async {
            let _ = stopped.await;
        }));

        Self { addr, sink, stop, task }
    }

    async fn send(&self, raw: &str) -> (SocketAddr, String) {
        send(self.addr, raw).await
    }

    async fn shutdown(self) {
        self.stop.send(()).unwrap();
        self.task.await.unwrap().unwrap();
    }
}

/// Sends one raw HTTP/1.x request and reads until the server closes.
async fn send(addr: SocketAddr, raw: &str) -> (SocketAddr, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let local = stream.local_addr().unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    (local, response)
}

#[tokio::test]
async fn logs_one_entry_per_request() {
    let server = TestServer::start().await;

    let (client, response) = server
        .send("POST /api/data HTTP/1.1\r\nhost: localhost\r\ncontent-length: 4\r\nconnection: close\r\n\r\nping")
        .await;

    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "{response}");
    assert!(response.ends_with("\r\n\r\nSuccess!"), "{response}");

    let entries = server.sink.entries();
    assert_eq!(entries.len(), 1);
    let (level, entry) = &entries[0];
    assert_eq!(*level, tracing::Level::INFO);
    assert_eq!(entry.method, "POST");
    assert_eq!(entry.path, "/api/data");
    assert_eq!(entry.proto, "HTTP/1.1");
    assert_eq!(entry.remote_addr, client.to_string());
    assert_eq!(entry.status, 201);

    server.shutdown().await;
}

#[tokio::test]
async fn body_reaches_client_unchanged() {
    let server = TestServer::start().await;

    let (_, response) = server
        .send("PUT /echo?x=1 HTTP/1.1\r\nhost: localhost\r\ncontent-length: 11\r\nconnection: close\r\n\r\nhello world")
        .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.ends_with("\r\n\r\nhello world"), "{response}");

    let entry = &server.sink.entries()[0].1;
    assert_eq!(entry.path, "/echo");
    assert_eq!(entry.status, 200);

    server.shutdown().await;
}

#[tokio::test]
async fn unrouted_requests_are_logged_too() {
    let server = TestServer::start().await;

    let (_, response) = server
        .send("GET /missing HTTP/1.0\r\nhost: localhost\r\n\r\n")
        .await;

    assert!(response.starts_with("HTTP/1."), "{response}");
    assert!(response.contains(" 404 Not Found\r\n"), "{response}");

    let entry = &server.sink.entries()[0].1;
    assert_eq!(entry.proto, "HTTP/1.0");
    assert_eq!(entry.status, 404);

    server.shutdown().await;
}

#[tokio::test]
async fn silent_handler_logs_zero_but_sends_ok() {
    let server = TestServer::start().await;

    let (_, response) = server
        .send("GET /silent HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert_eq!(server.sink.entries()[0].1.status, 0);

    server.shutdown().await;
}

#[tokio::test]
async fn interim_status_matches_the_wire() {
    let server = TestServer::start().await;

    let (_, response) = server
        .send("GET /info HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.ends_with("\r\n\r\nok"), "{response}");
    assert_eq!(server.sink.entries()[0].1.status, 200);

    let (_, response) = server
        .send("GET /interim HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert_eq!(server.sink.entries()[1].1.status, 0);

    server.shutdown().await;
}

#[tokio::test]
async fn logged_path_is_decoded() {
    let server = TestServer::start().await;

    let (_, response) = server
        .send("GET /files/a%20b HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");

    let entry = &server.sink.entries()[0].1;
    assert_eq!(entry.path, "/files/a b");
    assert_eq!(entry.status, 200);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clients_each_get_one_entry() {
    const CODES: [u16; 4] = [200, 201, 404, 503];
    const N: usize = 32;

    let server = TestServer::start().await;

    let mut clients = tokio::task::JoinSet::new();
    for i in 0..N {
        let addr = server.addr;
        let code = CODES[i % CODES.len()];
        clients.spawn(async move {
            let raw = format!(
                "GET /status/{code} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n"
            );
            let (local, response) = send(addr, &raw).await;
            assert!(response.starts_with(&format!("HTTP/1.1 {code} ")), "{response}");
            (local.to_string(), code)
        });
    }

    let mut expected = HashMap::new();
    while let Some(joined) = clients.join_next().await {
        let (local, code) = joined.unwrap();
        expected.insert(local, code);
    }
    assert_eq!(expected.len(), N);

    let entries = server.sink.entries();
    assert_eq!(entries.len(), N);
    for (_, entry) in &entries {
        assert_eq!(expected.remove(&entry.remote_addr), Some(entry.status), "{entry:?}");
        assert_eq!(entry.path, format!("/status/{}", entry.status));
    }
    assert!(expected.is_empty());

    server.shutdown().await;
}
