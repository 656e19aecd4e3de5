//! Envelopes: the pluggable parse/combine/recover strategy of a page builder.

use mosaic_types::{CombineError, ComponentError, Fields, ParseError, RenderContext};
use serde_json::Value;

/// Strategy bundle controlling how component responses become a page.
pub trait Envelope: Send + Sync {
    /// Per-component value produced by [`Envelope::parse`].
    type Parsed: Send;

    fn parse(&self, body: String) -> Result<Self::Parsed, ParseError>;

    /// Merge parsed values into the render context.
    ///
    /// `parsed` is in component declaration order. `None` marks a component
    /// whose fetch or parse failed and was passed to [`Envelope::recover_error`].
    fn combine(&self, parsed: Vec<Option<Self::Parsed>>) -> Result<RenderContext, CombineError>;

    /// Observe a recovered component failure. Must not panic.
    fn recover_error(&self, error: &ComponentError) {
        tracing::warn!(
            index = error.index(),
            url = error.url(),
            "Component failed: {error}"
        );
    }
}

/// Default envelope: bodies are used as-is and concatenated into `{{body}}`.
///
/// With no components at all the combine step yields an empty field mapping,
/// so a static template renders unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughEnvelope;

impl Envelope for PassThroughEnvelope {
    type Parsed = String;

    fn parse(&self, body: String) -> Result<String, ParseError> {
        Ok(body)
    }

    fn combine(&self, parsed: Vec<Option<String>>) -> Result<RenderContext, CombineError> {
        if parsed.is_empty() {
            return Ok(RenderContext::Fields(Fields::new()));
        }
        Ok(RenderContext::Body(parsed.into_iter().flatten().collect()))
    }
}

/// Joins bodies with a separator into `{{body}}`.
///
/// A failed component contributes an empty segment, keeping positions aligned
/// with declaration order.
#[derive(Debug, Clone)]
pub struct JoinEnvelope {
    separator: String,
}

impl JoinEnvelope {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for JoinEnvelope {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Envelope for JoinEnvelope {
    type Parsed = String;

    fn parse(&self, body: String) -> Result<String, ParseError> {
        Ok(body)
    }

    fn combine(&self, parsed: Vec<Option<String>>) -> Result<RenderContext, CombineError> {
        let segments: Vec<String> = parsed.into_iter().map(Option::unwrap_or_default).collect();
        Ok(RenderContext::Body(segments.join(&self.separator)))
    }
}

/// Parses JSON bodies and merges their top-level object keys into fields.
///
/// Later components win on key collisions. String values are inserted raw;
/// other values are serialized as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEnvelope;

impl Envelope for JsonEnvelope {
    type Parsed = Value;

    fn parse(&self, body: String) -> Result<Value, ParseError> {
        Ok(serde_json::from_str(&body)?)
    }

    fn combine(&self, parsed: Vec<Option<Value>>) -> Result<RenderContext, CombineError> {
        let mut fields = Fields::new();

        for (index, value) in parsed.into_iter().enumerate() {
            match value {
                Some(Value::Object(map)) => {
                    for (key, value) in map {
                        let rendered = match value {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        fields.insert(key, rendered);
                    }
                }
                Some(other) => {
                    tracing::debug!(
                        index,
                        kind = json_kind(&other),
                        "Ignoring non-object component body"
                    );
                }
                None => {}
            }
        }

        Ok(RenderContext::Fields(fields))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
