use std::time::Duration;

use extractor_engine::{probe_url, FailureKind, PROBE_TIMEOUT};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn head_request_reports_status_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let probe = probe_url(&format!("{}/", server.uri()), PROBE_TIMEOUT)
        .await
        .expect("probe ok");
    assert_eq!(probe.status_code, 200);
    assert_eq!(probe.content_type, "text/html");
}

#[tokio::test]
async fn error_status_still_counts_as_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let probe = probe_url(&server.uri(), PROBE_TIMEOUT).await.expect("probe ok");
    assert_eq!(probe.status_code, 503);
    assert_eq!(probe.content_type, "Unknown");
}

#[tokio::test]
async fn redirects_are_reported_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let probe = probe_url(&format!("{}/old", server.uri()), PROBE_TIMEOUT)
        .await
        .expect("probe ok");
    assert_eq!(probe.status_code, 301);
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let err = probe_url("not a url", PROBE_TIMEOUT).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let err = probe_url(&server.uri(), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}
