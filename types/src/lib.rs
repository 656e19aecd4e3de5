//! Core domain types for Mosaic.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the page composition pipeline.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod error;

pub use error::{BuildError, CombineError, ComponentError, ConfigError, FetchError, ParseError};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-invocation template parameters (`{{key}}` -> value).
pub type Params = HashMap<String, String>;

/// Field mapping produced by an envelope's combine step.
pub type Fields = BTreeMap<String, String>;

/// Placeholder that receives a whole-string [`RenderContext::Body`].
pub const BODY_PLACEHOLDER: &str = "body";

// ============================================================================
// Component Configuration
// ============================================================================

/// One remote data source contributing to a composed page.
///
/// `endpoint` may contain `{{param}}` placeholders that are expanded per
/// invocation. Every other key is preserved verbatim in
/// [`ComponentConfig::extra`] and never validated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub endpoint: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentConfig {
    /// Label for logs: a string `name` field if present, else the raw endpoint.
    #[must_use]
    pub fn label(&self) -> &str {
        self.extra
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.endpoint)
    }
}

/// Top-level component configuration document.
///
/// ```json
/// { "components": [ { "endpoint": "http://{{host}}/nav.json" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub components: Vec<ComponentConfig>,
}

// ============================================================================
// Render Context
// ============================================================================

/// Substitution context produced by an envelope's combine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderContext {
    /// Whole-page body, substituted into the `{{body}}` placeholder.
    Body(String),
    /// Each key substitutes its own `{{key}}` placeholder.
    Fields(Fields),
}

impl RenderContext {
    /// Look up the replacement for a placeholder name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            RenderContext::Body(body) => (key == BODY_PLACEHOLDER).then_some(body.as_str()),
            RenderContext::Fields(fields) => fields.get(key).map(String::as_str),
        }
    }

}

impl From<String> for RenderContext {
    fn from(value: String) -> Self {
        RenderContext::Body(value)
    }
}

impl From<&str> for RenderContext {
    fn from(value: &str) -> Self {
        RenderContext::Body(value.to_string())
    }
}

impl From<Fields> for RenderContext {
    fn from(value: Fields) -> Self {
        RenderContext::Fields(value)
    }
}

impl<K, V> FromIterator<(K, V)> for RenderContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RenderContext::Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
