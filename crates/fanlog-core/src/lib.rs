//! fanlog Core
//!
//! Leveled logging with fan-out to several output backends.
//!
//! - Five levels, most severe first: error, warning, notice, info, debug
//! - Backends: log file, stderr (colored on a terminal), local syslog
//! - A `Logger` value is passed around explicitly; there is no global logger
//!
//! ```rust,no_run
//! use fanlog_core::{log_info, FileConfig, Logger, LoggerConfig, SyslogConfig};
//!
//! let config = LoggerConfig::new()
//!     .with_backend(FileConfig::new("/var/log/myapp/app.log", "info"))
//!     .with_backend(FileConfig::stderr("warning"))
//!     .with_backend(SyslogConfig::new("myapp", "error"));
//!
//! let logger = Logger::from_config(&config)?;
//! let worker = logger.with_context("worker-1");
//! log_info!(worker, "processed {} jobs", 42);
//! logger.close();
//! # Ok::<(), fanlog_core::LoggerError>(())
//! ```

pub mod backends;
pub mod config;
mod error;
mod level;
mod logger;
mod macros;

pub use backends::{AnyBackend, Backend, FileBackend};
#[cfg(unix)]
pub use backends::{Facility, SyslogBackend};

pub use config::{BackendConfig, FileConfig, LoggerConfig, SyslogConfig, STDERR_PATH};

pub use error::{LoggerError, LoggerResult};
pub use level::Level;
pub use logger::Logger;
