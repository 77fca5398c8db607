use axum::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use std::time::Duration;

use crate::config::ForwardConfig;

pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Builds the pooled client used for every forwarded request.
///
/// A plain hyper client sends the request line and headers it is given and
/// never follows redirects or decodes bodies. The only header it may add is
/// `host`, and only when the request arrived without one (HTTP/2 clients).
pub fn build_client(config: &ForwardConfig) -> UpstreamClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);
    http.set_keepalive(Some(Duration::from_secs(60)));

    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_timer(TokioTimer::new())
        .pool_max_idle_per_host(32)
        .build(https)
}
