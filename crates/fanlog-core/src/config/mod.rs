//! Logger configuration
//!
//! - Backend configuration objects: `FileConfig`, `SyslogConfig`, `BackendConfig`
//! - `LoggerConfig`: a list of backends, loadable from YAML or JSON

mod backend;
mod file;

pub use backend::{BackendConfig, FileConfig, SyslogConfig, STDERR_PATH};
pub use file::LoggerConfig;
