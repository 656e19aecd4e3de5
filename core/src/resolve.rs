//! Component configuration resolution.
//!
//! The configuration is raw JSON text already in memory. Resolution runs once,
//! when a page builder is constructed, so a malformed document fails before any
//! request is issued.

use mosaic_types::{ComponentConfig, ConfigError, PageConfig};
use serde_json::Value;

/// Parse and validate a component configuration document.
///
/// An absent source yields no components, which degrades the builder to a
/// static template.
pub fn resolve(config_source: Option<&str>) -> Result<Vec<ComponentConfig>, ConfigError> {
    let Some(source) = config_source else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(source)?;
    if !value.is_object() {
        return Err(ConfigError::Shape {
            message: "expected an object with a `components` array".to_string(),
        });
    }

    let config: PageConfig = serde_json::from_value(value)?;
    tracing::debug!(
        components = config.components.len(),
        "Resolved component config"
    );
    Ok(config.components)
}
