//! HTTP fetch capability for Mosaic.
//!
//! [`HttpFetcher`] implements [`mosaic_engine::Fetch`] on top of a shared
//! `reqwest` client. It issues a single GET per component URL and maps
//! failures to [`FetchError`]:
//!
//! | Condition | Error |
//! |-----------|-------|
//! | URL does not parse | `Transport` (no request issued) |
//! | Non-2xx status | `Status` |
//! | Request or connect timeout | `Timeout` |
//! | Anything else (DNS, TLS, reset, body decode) | `Transport` |
//!
//! Caching, retries and auth are deliberately absent; wrap the fetcher if
//! a deployment needs them.

use std::time::Duration;

use mosaic_engine::{Fetch, FetchFut};
use mosaic_types::FetchError;
use reqwest::redirect::Policy;
use serde::Deserialize;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_REDIRECTS: usize = 5;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

fn default_user_agent() -> String {
    concat!("mosaic/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Client settings, usually read from the `[http]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Default: 10.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Refuse plain `http://` component URLs.
    #[serde(default)]
    pub https_only: bool,
    /// Default: 5. Zero disables redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            https_only: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Fetches component bodies over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, reqwest::Error> {
        let redirect = if settings.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(settings.max_redirects)
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .https_only(settings.https_only)
            .redirect(redirect)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: format!("invalid URL: {e}"),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "Component request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, &e))
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFut<'a> {
        Box::pin(self.get(url))
    }
}

fn map_reqwest_error(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
        };
    }
    if let Some(status) = err.status() {
        return FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
