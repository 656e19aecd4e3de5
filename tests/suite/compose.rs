//! End-to-end page composition against a mock HTTP server.

use std::time::{Duration, Instant};

use mosaic_engine::{JoinEnvelope, JsonEnvelope, PageBuilder, Params};
use wiremock::MockServer;

use crate::common::{components, mount_body, test_fetcher};

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[tokio::test]
async fn renders_in_declaration_order_not_arrival_order() {
    let server = MockServer::start().await;
    mount_body(&server, "/slow", "100ms response", 100).await;
    mount_body(&server, "/fast", "25ms response", 25).await;
    mount_body(&server, "/medium", "50ms response", 50).await;

    let base = server.uri();
    let config = components(&[
        format!("{base}/slow"),
        format!("{base}/fast"),
        format!("{base}/medium"),
    ]);

    let builder = PageBuilder::new()
        .with_template("{{body}}")
        .with_config(&config)
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(JoinEnvelope::default());

    let page = builder.build(None).await.unwrap();
    assert_eq!(page, "100ms response,25ms response,50ms response");
}

#[tokio::test]
async fn expands_params_into_request_urls() {
    let server = MockServer::start().await;
    mount_body(&server, "/users/42.json", r#"{"name": "Janet"}"#, 0).await;
    mount_body(&server, "/users/7.json", r#"{"name": "Squeak"}"#, 0).await;

    let config = components(&["{{base}}/users/{{id}}.json".to_string()]);
    let builder = PageBuilder::new()
        .with_template("Hello, {{name}}.")
        .with_config(&config)
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(JsonEnvelope);

    let base = server.uri();
    let first = builder
        .build(Some(&params(&[("base", base.as_str()), ("id", "42")])))
        .await
        .unwrap();
    let second = builder
        .build(Some(&params(&[("base", base.as_str()), ("id", "7")])))
        .await
        .unwrap();

    assert_eq!(first, "Hello, Janet.");
    assert_eq!(second, "Hello, Squeak.");

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(paths, ["/users/42.json", "/users/7.json"]);
}

#[tokio::test]
async fn components_are_fetched_concurrently() {
    let server = MockServer::start().await;
    for route in ["/a", "/b", "/c", "/d"] {
        mount_body(&server, route, route, 300).await;
    }

    let base = server.uri();
    let endpoints: Vec<String> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|route| format!("{base}{route}"))
        .collect();
    let builder = PageBuilder::new()
        .with_template("<main>{{body}}</main>")
        .with_config(&components(&endpoints))
        .unwrap()
        .with_fetcher(test_fetcher());

    let started = Instant::now();
    let page = builder.build(None).await.unwrap();

    assert_eq!(page, "<main>/a/b/c/d</main>");
    assert!(
        started.elapsed() < Duration::from_millis(1000),
        "took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn json_components_fill_named_placeholders() {
    let server = MockServer::start().await;
    mount_body(&server, "/header.json", r#"{"title": "Mosaic", "lang": "en"}"#, 40).await;
    mount_body(&server, "/stats.json", r#"{"visits": 3, "title": "Stats"}"#, 0).await;

    let base = server.uri();
    let config = components(&[
        format!("{base}/header.json"),
        format!("{base}/stats.json"),
    ]);
    let builder = PageBuilder::new()
        .with_template(r#"<html lang="{{lang}}"><h1>{{title}}</h1><p>{{visits}}</p></html>"#)
        .with_config(&config)
        .unwrap()
        .with_fetcher(test_fetcher())
        .with_envelope(JsonEnvelope);

    let page = builder.build(None).await.unwrap();
    assert_eq!(page, r#"<html lang="en"><h1>Stats</h1><p>3</p></html>"#);
}
