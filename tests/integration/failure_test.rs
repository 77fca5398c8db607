use super::common::{direct_client, proxied_client, spawn_tap, spawn_upstream, unused_addr, TapOptions};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[test_log::test(tokio::test)]
async fn unreachable_target_surfaces_as_bad_gateway() {
    let tap = spawn_tap(TapOptions::default()).await;
    let client = proxied_client(&tap);
    let dead = unused_addr().await;
    let url = format!("http://{}/anything", dead);

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "upstream_error");
    assert!(!body["error"]["message"].as_str().unwrap().is_empty());

    // Logged before the forward was attempted, and only once: no retry.
    let records = tap.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, url);
}

#[test_log::test(tokio::test)]
async fn slow_upstream_surfaces_as_gateway_timeout() {
    let upstream = spawn_upstream().await;
    let tap = spawn_tap(TapOptions {
        timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .await;
    let client = proxied_client(&tap);

    let response = client
        .get(format!("http://{}/slow", upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "upstream_timeout");
    assert_eq!(tap.sink.len(), 1);
}

#[test_log::test(tokio::test)]
async fn origin_form_without_upstream_is_rejected_unlogged() {
    let tap = spawn_tap(TapOptions::default()).await;

    let response = direct_client()
        .get(format!("{}/index.html", tap.url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "unresolvable_target");
    assert!(tap.sink.is_empty());
}
