//! Configuration loading for the Mosaic CLI.
//!
//! The file lives at `~/.mosaic/config.toml` unless a path is given:
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! user_agent = "mosaic/0.0"
//!
//! [params]
//! hostname = "${MOSAIC_HOST}"
//! ```
//!
//! Component configuration is a separate JSON document handed to the page
//! builder and is not read from here.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use mosaic_providers::HttpSettings;
use mosaic_types::Params;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct MosaicConfig {
    pub http: Option<HttpSettings>,
    /// Default template parameters. `${VAR}` references are expanded from
    /// the environment by [`MosaicConfig::params`].
    pub params: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigFileError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigFileError::Read { path, .. } | ConfigFileError::Parse { path, .. } => path,
        }
    }
}

impl MosaicConfig {
    /// Load from the default location. `Ok(None)` if there is no file.
    pub fn load() -> Result<Option<Self>, ConfigFileError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. `Ok(None)` if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigFileError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigFileError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        self.http.clone().unwrap_or_default()
    }

    /// Default params with `${VAR}` references expanded.
    #[must_use]
    pub fn params(&self) -> Params {
        self.params
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), expand_env_vars(value)))
            .collect()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mosaic").join("config.toml"))
}

/// Replace `${VAR}` with the value of the environment variable `VAR`.
///
/// Unset variables expand to the empty string. An unclosed `${` is kept.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    expand_vars_with(value, |name| env::var(name).ok())
}

fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };

        out.push_str(&rest[..start]);
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
