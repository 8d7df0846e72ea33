//! Per-backend configuration objects

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LoggerError, LoggerResult};

/// Path value that selects the standard error stream
pub const STDERR_PATH: &str = "-";

fn default_level() -> String {
    "info".to_string()
}

fn default_facility() -> String {
    "user".to_string()
}

fn default_tag() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "fanlog".to_string())
}

/// File or console backend configuration
///
/// An empty `path` or `"-"` writes to standard error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Log file path, or `""` / `"-"` for stderr
    #[serde(default)]
    pub path: String,
    /// Threshold level name
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::stderr(default_level())
    }
}

impl FileConfig {
    /// Create a file backend configuration
    pub fn new(path: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            level: level.into(),
        }
    }

    /// Create a configuration that writes to stderr
    pub fn stderr(level: impl Into<String>) -> Self {
        Self::new(STDERR_PATH, level)
    }

    /// Whether this configuration targets stderr rather than a file
    pub fn uses_stderr(&self) -> bool {
        self.path.is_empty() || self.path == STDERR_PATH
    }
}

/// System log backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyslogConfig {
    /// Program tag placed in front of every message
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Facility name ("user", "daemon", "local0" ...)
    #[serde(default = "default_facility")]
    pub facility: String,
    /// Threshold level name
    #[serde(default = "default_level")]
    pub level: String,
    /// Syslog socket path, defaults to the platform socket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<PathBuf>,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            facility: default_facility(),
            level: default_level(),
            socket: None,
        }
    }
}

impl SyslogConfig {
    /// Create a syslog configuration with the `user` facility
    pub fn new(tag: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            level: level.into(),
            ..Self::default()
        }
    }

    /// Set the facility name
    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = facility.into();
        self
    }

    /// Send to a specific socket instead of the platform default
    pub fn with_socket(mut self, socket: impl Into<PathBuf>) -> Self {
        self.socket = Some(socket.into());
        self
    }
}

/// Configuration of a single backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    File(FileConfig),
    Syslog(SyslogConfig),
}

impl BackendConfig {
    /// Type name used in configuration documents
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::File(_) => "file",
            BackendConfig::Syslog(_) => "syslog",
        }
    }

    /// Threshold level name of this configuration
    pub fn level(&self) -> &str {
        match self {
            BackendConfig::File(c) => &c.level,
            BackendConfig::Syslog(c) => &c.level,
        }
    }

    /// Build a configuration from its type name and remaining options
    ///
    /// `console` is accepted as a file backend bound to stderr.
    pub fn from_options(kind: &str, options: serde_yaml::Mapping) -> LoggerResult<Self> {
        let options = serde_yaml::Value::Mapping(options);
        let invalid = |e: serde_yaml::Error| {
            LoggerError::config(format!("invalid {} backend options: {}", kind, e))
        };

        match kind {
            "file" => Ok(BackendConfig::File(
                serde_yaml::from_value(options).map_err(invalid)?,
            )),
            "console" => {
                let mut config: FileConfig = serde_yaml::from_value(options).map_err(invalid)?;
                config.path = STDERR_PATH.to_string();
                Ok(BackendConfig::File(config))
            }
            "syslog" => Ok(BackendConfig::Syslog(
                serde_yaml::from_value(options).map_err(invalid)?,
            )),
            other => Err(LoggerError::unsupported_backend(other)),
        }
    }
}

impl From<FileConfig> for BackendConfig {
    fn from(config: FileConfig) -> Self {
        BackendConfig::File(config)
    }
}

impl From<SyslogConfig> for BackendConfig {
    fn from(config: SyslogConfig) -> Self {
        BackendConfig::Syslog(config)
    }
}
