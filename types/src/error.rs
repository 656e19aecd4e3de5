//! Error taxonomy for the page composition pipeline.
//!
//! | Error | Raised | Propagates |
//! |-------|--------|------------|
//! | [`ConfigError`] | builder construction | yes, synchronously |
//! | [`BuildError`] | `build()` invocation | yes, from the returned future |
//! | [`ComponentError`] | per component during fan-out | never; routed to `recover_error` |

use thiserror::Error;

/// Malformed component configuration, detected when the builder is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid component config at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("invalid component config shape: {message}")]
    Shape { message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => ConfigError::Shape {
                message: err.to_string(),
            },
            Category::Io | Category::Syntax | Category::Eof => ConfigError::Syntax {
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            },
        }
    }
}

/// Failure of a page render that cannot be absorbed by the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("page builder has no template")]
    MissingTemplate,
    #[error("envelope combine failed: {0}")]
    Combine(#[from] CombineError),
}

/// Failure reported by a fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn other(message: impl Into<String>) -> Self {
        FetchError::Other(message.into())
    }
}

/// Failure of an envelope's parse step for one response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// An envelope's combine step could not produce a render context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CombineError {
    message: String,
}

impl CombineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A single component failed to fetch or parse. Always recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("component {index} ({url}): {source}")]
    Fetch {
        index: usize,
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("component {index} ({url}): parse failed: {source}")]
    Parse {
        index: usize,
        url: String,
        #[source]
        source: ParseError,
    },
    #[error("component {index} ({url}): no fetcher configured")]
    NoFetcher { index: usize, url: String },
}

impl ComponentError {
    /// Declaration index of the failing component.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            ComponentError::Fetch { index, .. }
            | ComponentError::Parse { index, .. }
            | ComponentError::NoFetcher { index, .. } => *index,
        }
    }

    /// Expanded URL the component was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            ComponentError::Fetch { url, .. }
            | ComponentError::Parse { url, .. }
            | ComponentError::NoFetcher { url, .. } => url,
        }
    }
}
