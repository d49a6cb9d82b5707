use crate::errors::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Generation configuration, the JSON analogue of a `tailwind.config.js`.
/// Only `content.files`, `theme.extend`, and `plugins` carry meaning;
/// unknown keys are accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to scan
    pub content: ContentConfig,

    /// Design token extensions
    pub theme: ThemeConfig,

    /// Accepted for config compatibility; entries are opaque to the engine.
    /// Extension code registers through the `Plugin` trait instead.
    pub plugins: Vec<Value>,
}

/// Content scanning configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Glob patterns selecting the files to scan
    pub files: Vec<String>,
}

/// Theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Token categories laid over the compiled-in defaults. Open-ended:
    /// any category name is accepted, not just the ones the defaults know.
    pub extend: IndexMap<String, Value>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Checks the parts every run depends on: at least one content pattern,
    /// all of them syntactically valid globs.
    pub fn validate(&self) -> Result<()> {
        if self.content.files.is_empty() {
            return Err(Error::Config {
                message: "content.files must list at least one glob pattern".to_string(),
            });
        }
        for pattern in &self.content.files {
            glob::Pattern::new(pattern).map_err(|e| Error::Config {
                message: format!("invalid glob pattern '{}': {}", pattern, e),
            })?;
        }
        Ok(())
    }
}
