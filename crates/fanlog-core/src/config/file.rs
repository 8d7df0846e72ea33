//! Logger configuration documents (YAML or JSON)
//!
//! ```yaml
//! backends:
//!   - type: file
//!     path: /var/log/myapp/app.log
//!     level: info
//!   - type: console
//!     level: warning
//!   - type: syslog
//!     tag: myapp
//!     facility: daemon
//!     level: notice
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::backend::BackendConfig;
use crate::error::{LoggerError, LoggerResult};

/// A backend entry as written in a document, before its type is resolved
#[derive(Debug, Deserialize)]
struct RawBackend {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    options: serde_yaml::Mapping,
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    backends: Vec<RawBackend>,
}

/// Full logger configuration: one entry per backend, in dispatch order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoggerConfig {
    pub backends: Vec<BackendConfig>,
}

impl LoggerConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend
    pub fn with_backend(mut self, backend: impl Into<BackendConfig>) -> Self {
        self.backends.push(backend.into());
        self
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> LoggerResult<Self> {
        let raw: RawDocument = serde_yaml::from_str(content)
            .map_err(|e| LoggerError::config(format!("Failed to parse YAML: {}", e)))?;
        Self::resolve(raw)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> LoggerResult<Self> {
        let raw: RawDocument = serde_json::from_str(content)
            .map_err(|e| LoggerError::config(format!("Failed to parse JSON: {}", e)))?;
        Self::resolve(raw)
    }

    /// Load a configuration file
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> LoggerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> LoggerResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LoggerError::config(format!("Failed to serialize YAML: {}", e)))
    }

    fn resolve(raw: RawDocument) -> LoggerResult<Self> {
        let backends = raw
            .backends
            .into_iter()
            .map(|b| BackendConfig::from_options(&b.kind, b.options))
            .collect::<LoggerResult<Vec<_>>>()?;
        Ok(Self { backends })
    }
}
