//! Output backends
//!
//! - `Backend` trait: leveled write + close
//! - `FileBackend`: log file or stderr
//! - `SyslogBackend`: local system log (unix only)
//! - `AnyBackend`: the closed set a `Logger` dispatches to

mod traits;
mod file;
#[cfg(unix)]
mod syslog;
mod kind;

pub use traits::Backend;
pub use file::FileBackend;
#[cfg(unix)]
pub use syslog::{Facility, SyslogBackend};
pub use kind::AnyBackend;
