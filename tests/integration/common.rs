use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use fetch_tap::{
    config::ForwardConfig,
    proxy::HttpForwarder,
    server::serve,
    telemetry::{MemorySink, SinkRegistry, TracingSink},
    Interceptor,
};
use reqwest::redirect::Policy;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/// Bytes that claim to be gzip but are not; a decompressing hop would choke on them.
pub const FAKE_GZIP_BODY: &[u8] = b"\x1f\x8b definitely not deflate";

/// Number of pieces `/drip` sends, and the pause before each one after the first.
pub const DRIP_CHUNKS: u8 = 8;
pub const DRIP_INTERVAL: Duration = Duration::from_millis(150);

/// A running tap plus the in-memory sink it logs to.
pub struct Tap {
    pub addr: SocketAddr,
    pub sink: MemorySink,
}

impl Tap {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub struct TapOptions {
    pub upstream: Option<SocketAddr>,
    pub timeout: Duration,
}

impl Default for TapOptions {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout: Duration::from_secs(10),
        }
    }
}

pub async fn spawn_tap(options: TapOptions) -> Tap {
    let sink = MemorySink::new();
    let registry = SinkRegistry::new()
        .with_sink(Box::new(sink.clone()))
        .with_sink(Box::new(TracingSink::new()));

    let forwarder = HttpForwarder::new(&ForwardConfig {
        timeout: options.timeout,
        ..Default::default()
    });

    let upstream = options
        .upstream
        .map(|addr| format!("http://{}", addr).parse::<Uri>().unwrap());
    let interceptor = Arc::new(Interceptor::new(registry, Arc::new(forwarder), upstream));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, interceptor, std::future::pending()));

    Tap { addr, sink }
}

/// Starts the upstream the tap forwards to. Unrouted paths are echoed.
pub async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/echo", any(echo))
        .route("/status/:code", get(status))
        .route("/redirect", get(redirect))
        .route("/gzip", get(fake_gzip))
        .route("/slow", get(slow))
        .route("/drip", get(drip))
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Client that sends every `http://` request through the tap.
pub fn proxied_client(tap: &Tap) -> reqwest::Client {
    reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(tap.url()).unwrap())
        .redirect(Policy::none())
        .build()
        .unwrap()
}

/// Client that talks to whatever URL it is given, no proxy.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

/// Writes `request` to `addr` byte for byte and reads until the peer closes.
///
/// Returns the status code and the body. The request should carry
/// `connection: close`.
pub async fn send_raw(addr: SocketAddr, request: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, body.to_string())
}

/// The full body `/drip` produces.
pub fn drip_body() -> String {
    (0..DRIP_CHUNKS).map(|n| format!("chunk-{}\n", n)).collect()
}

/// Header pairs as the upstream reported them.
pub fn echoed_headers(echo: &Value) -> Vec<(String, String)> {
    serde_json::from_value(echo["headers"].clone()).unwrap()
}

/// Header pairs as the tap logged them.
pub fn logged_headers(record: &fetch_tap::DiagnosticRecord) -> Vec<(String, String)> {
    record
        .headers
        .iter()
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect()
}

async fn echo(request: Request) -> Json<Value> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let headers: Vec<(String, String)> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn status(Path(code): Path<u16>) -> Response {
    let mut response = Response::new(Body::from(format!("status {}", code)));
    *response.status_mut() = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let headers = response.headers_mut();
    headers.append("x-multi", HeaderValue::from_static("one"));
    headers.append("x-multi", HeaderValue::from_static("two"));
    response
}

async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/echo")])
}

async fn fake_gzip() -> impl IntoResponse {
    (
        [
            (header::CONTENT_ENCODING, "gzip"),
            (header::CONTENT_TYPE, "application/octet-stream"),
        ],
        FAKE_GZIP_BODY,
    )
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

async fn drip() -> Body {
    let chunks = futures_util::stream::unfold(0u8, |n| async move {
        if n == DRIP_CHUNKS {
            return None;
        }
        if n > 0 {
            tokio::time::sleep(DRIP_INTERVAL).await;
        }
        Some((Ok::<_, std::io::Error>(format!("chunk-{}\n", n)), n + 1))
    });
    Body::from_stream(chunks)
}
