//! Closed set of backend variants

use std::io;

use super::file::FileBackend;
#[cfg(unix)]
use super::syslog::SyslogBackend;
use super::traits::Backend;
use crate::config::BackendConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;

/// Any backend a [`Logger`](crate::Logger) can hold
#[derive(Debug)]
pub enum AnyBackend {
    File(FileBackend),
    #[cfg(unix)]
    Syslog(SyslogBackend),
}

impl AnyBackend {
    /// Build the backend described by `config`
    pub fn from_config(config: &BackendConfig) -> LoggerResult<Self> {
        match config {
            BackendConfig::File(c) => Ok(AnyBackend::File(FileBackend::new(c)?)),
            #[cfg(unix)]
            BackendConfig::Syslog(c) => Ok(AnyBackend::Syslog(SyslogBackend::new(c)?)),
            #[cfg(not(unix))]
            BackendConfig::Syslog(_) => Err(LoggerError::unsupported_backend("syslog")),
        }
    }

    fn inner(&self) -> &dyn Backend {
        match self {
            AnyBackend::File(b) => b,
            #[cfg(unix)]
            AnyBackend::Syslog(b) => b,
        }
    }
}

impl Backend for AnyBackend {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn threshold(&self) -> Level {
        self.inner().threshold()
    }

    fn write(&self, level: Level, context: &str, message: &str) -> io::Result<()> {
        self.inner().write(level, context, message)
    }

    fn close(&self) {
        self.inner().close()
    }
}

impl TryFrom<&BackendConfig> for AnyBackend {
    type Error = LoggerError;

    fn try_from(config: &BackendConfig) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}
