//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use mosaic_engine::Envelope;
use mosaic_providers::{HttpFetcher, HttpSettings};
use mosaic_types::{CombineError, ComponentError, ParseError, RenderContext};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetcher with short timeouts suitable for a local mock server.
pub fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new(&HttpSettings {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        user_agent: "mosaic-test/1.0".to_string(),
        ..HttpSettings::default()
    })
    .expect("test HTTP client must build")
}

/// Mount a `GET route` that answers 200 with `body` after `delay_ms`.
pub async fn mount_body(server: &MockServer, route: &str, body: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

/// Mount a `GET route` that answers with a bare status code.
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Component config document for the given endpoints.
pub fn components(endpoints: &[String]) -> String {
    let entries: Vec<_> = endpoints
        .iter()
        .map(|endpoint| serde_json::json!({ "endpoint": endpoint }))
        .collect();
    serde_json::json!({ "components": entries }).to_string()
}

/// Wraps another envelope and records every recovered component error.
pub struct Recording<E> {
    inner: E,
    errors: Mutex<Vec<ComponentError>>,
}

impl<E> Recording<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn errors(&self) -> Vec<ComponentError> {
        self.errors.lock().unwrap().clone()
    }
}

impl<E: Envelope> Envelope for Recording<E> {
    type Parsed = E::Parsed;

    fn parse(&self, body: String) -> Result<Self::Parsed, ParseError> {
        self.inner.parse(body)
    }

    fn combine(&self, parsed: Vec<Option<Self::Parsed>>) -> Result<RenderContext, CombineError> {
        self.inner.combine(parsed)
    }

    fn recover_error(&self, error: &ComponentError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
