//! Incoming HTTP request type.

use std::borrow::Cow;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;

/// An incoming HTTP request with its body fully read.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: SocketAddr,
    params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from the parts hyper hands the server.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            remote_addr,
            params: HashMap::new(),
        }
    }

    /// Starts a request by hand, for tests or for hosts other than [`Server`](crate::Server).
    pub fn builder() -> RequestBuilder {
        RequestBuilder { req: Self::default() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }

    /// The path with `%XX` escapes decoded: `/a%20b` becomes `/a b`.
    ///
    /// Malformed escapes are kept as written and invalid UTF-8 is replaced
    /// with `U+FFFD`.
    pub fn decoded_path(&self) -> Cow<'_, str> {
        percent_decode_str(self.path()).decode_utf8_lossy()
    }

    pub fn version(&self) -> Version { self.version }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Address of the peer that sent the request.
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    /// Protocol as written on a request line: `"HTTP/1.1"`, `"HTTP/2.0"`, …
    pub fn proto(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/?",
        }
    }

    /// First value of header `name`, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A copy of this request carrying the params of the route it matched.
    pub(crate) fn with_params(&self, params: HashMap<String, String>) -> Self {
        Self { params, ..self.clone() }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            remote_addr: SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 1234)),
            params: HashMap::new(),
        }
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`].
///
/// Defaults to `GET /` over `HTTP/1.1` from `192.0.2.1:1234`, an RFC 5737
/// documentation address that can never collide with a real peer.
///
/// ```rust
/// use reqlog::{Method, Request};
///
/// let req = Request::builder()
///     .method(Method::POST)
///     .uri("/api/data")
///     .body("payload")
///     .build();
///
/// assert_eq!(req.path(), "/api/data");
/// assert_eq!(req.proto(), "HTTP/1.1");
/// assert_eq!(req.remote_addr().to_string(), "192.0.2.1:1234");
/// ```
pub struct RequestBuilder {
    req: Request,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.req.method = method;
        self
    }

    /// # Panics
    ///
    /// Panics if `uri` is not a valid request target.
    pub fn uri(mut self, uri: &'static str) -> Self {
        self.req.uri = Uri::from_static(uri);
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.req.version = version;
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.req.remote_addr = addr;
        self
    }

    pub fn header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.req.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.req.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        self.req
    }
}
