//! Severity levels

use std::fmt;
use std::str::FromStr;

use crate::error::{LoggerError, LoggerResult};

/// Log levels, from most to least severe
///
/// The numeric value grows as severity drops, so a message is emitted by a
/// backend when `message_level <= backend_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Error = 1,
    Warning = 2,
    Notice = 3,
    #[default]
    Info = 4,
    Debug = 5,
}

impl Level {
    /// Every level, most severe first
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    /// Look up a level by its configuration name
    ///
    /// Names are case-sensitive: "error", "warning", "notice", "info", "debug".
    pub fn from_name(name: &str) -> LoggerResult<Self> {
        match name {
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "notice" => Ok(Level::Notice),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(LoggerError::invalid_level(name)),
        }
    }

    /// Configuration name of this level
    pub fn name(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Uppercase label printed in front of messages
    pub fn label(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// RFC 5424 severity code
    pub fn syslog_severity(&self) -> u8 {
        match self {
            Level::Error => 3,
            Level::Warning => 4,
            Level::Notice => 5,
            Level::Info => 6,
            Level::Debug => 7,
        }
    }

    /// Position in [`Level::ALL`]
    pub(crate) fn index(&self) -> usize {
        *self as usize - 1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s)
    }
}
