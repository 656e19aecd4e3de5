//! Per-component failures are recovered, never propagated.

use mosaic_engine::{BuildError, JoinEnvelope, JsonEnvelope, PageBuilder};
use mosaic_types::{ComponentError, FetchError};
use wiremock::MockServer;

use crate::common::{Recording, components, mount_body, mount_status, test_fetcher};

#[tokio::test]
async fn failing_status_is_recovered_and_siblings_render() {
    let server = MockServer::start().await;
    mount_body(&server, "/header", "<header/>", 0).await;
    mount_status(&server, "/broken", 500).await;
    mount_body(&server, "/footer", "<footer/>", 0).await;

    let base = server.uri();
    let config = components(&[
        format!("{base}/header"),
        format!("{base}/broken"),
        format!("{base}/footer"),
    ]);
    let builder = PageBuilder::new()
        .with_template("{{body}}")
        .with_config(&config)
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(Recording::new(JoinEnvelope::new("|")));

    let page = builder.build(None).await.unwrap();
    assert_eq!(page, "<header/>||<footer/>");

    let errors = builder.envelope().errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ComponentError::Fetch { index: 1, source: FetchError::Status { status: 500, .. }, .. }
    ));
    assert!(errors[0].to_string().contains("HTTP 500"), "{}", errors[0]);
}

#[tokio::test]
async fn unreachable_host_is_recovered() {
    // Nothing listens on the discard port.
    let builder = PageBuilder::new()
        .with_template("[{{body}}]")
        .with_config(&components(&["http://127.0.0.1:9/gone".to_string()]))
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(Recording::new(JoinEnvelope::default()));

    assert_eq!(builder.build(None).await.unwrap(), "[]");
    let errors = builder.envelope().errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ComponentError::Fetch { source: FetchError::Transport { .. }, .. }
    ));
}

#[tokio::test]
async fn parse_failure_is_recovered() {
    let server = MockServer::start().await;
    mount_body(&server, "/good.json", r#"{"title": "Home"}"#, 0).await;
    mount_body(&server, "/bad.json", "unparseable body", 0).await;

    let base = server.uri();
    let config = components(&[format!("{base}/good.json"), format!("{base}/bad.json")]);
    let builder = PageBuilder::new()
        .with_template("{{title}}")
        .with_config(&config)
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(Recording::new(JsonEnvelope));

    assert_eq!(builder.build(None).await.unwrap(), "Home");

    let errors = builder.envelope().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].index(), 1);
    assert!(matches!(&errors[0], ComponentError::Parse { .. }));
    assert!(errors[0].url().ends_with("/bad.json"));
}

#[tokio::test]
async fn missing_template_rejects_only_on_build() {
    let server = MockServer::start().await;
    mount_body(&server, "/x", "x", 0).await;

    let builder = PageBuilder::new()
        .with_config(&components(&[format!("{}/x", server.uri())]))
        .unwrap()
        .with_fetcher(test_fetcher());

    assert_eq!(builder.build(None).await, Err(BuildError::MissingTemplate));
    assert!(server.received_requests().await.unwrap().is_empty());
}
