//! Logger error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a logger
///
/// Only construction fails. Once a [`Logger`](crate::Logger) exists, its
/// leveled methods never return an error.
#[derive(Error, Debug)]
pub enum LoggerError {
    /// Unrecognized level name
    #[error("invalid logging level: {0:?}")]
    InvalidLevel(String),

    /// Unrecognized backend type in a configuration
    #[error("unsupported logging backend: {0:?}")]
    UnsupportedBackend(String),

    /// Unrecognized syslog facility name
    #[error("invalid syslog facility: {0:?}")]
    InvalidFacility(String),

    /// Parent directory of a log file could not be created
    #[error("failed to create logging directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Log file could not be opened for append
    #[error("failed to open logging file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// System log socket could not be reached
    #[error("failed to connect to system log at {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed configuration document
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        Self::InvalidLevel(name.into())
    }

    /// Create an unsupported backend error
    pub fn unsupported_backend(kind: impl Into<String>) -> Self {
        Self::UnsupportedBackend(kind.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type LoggerResult<T> = Result<T, LoggerError>;
