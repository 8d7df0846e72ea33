//! Backend trait definition

use std::io;

use crate::level::Level;

/// An output destination for leveled messages
///
/// Implementations:
/// - `FileBackend`: appends to a file, or writes colored lines to stderr
/// - `SyslogBackend`: forwards to the local system log daemon
///
/// Threshold filtering is the caller's job: `write` always emits. The
/// [`Logger`](crate::Logger) checks [`Backend::accepts`] once before dispatch.
pub trait Backend: Send + Sync {
    /// Short kind name ("file", "console", "syslog")
    fn name(&self) -> &str;

    /// Least severe level this backend emits
    fn threshold(&self) -> Level;

    /// Whether a message at `level` passes the threshold
    fn accepts(&self, level: Level) -> bool {
        level <= self.threshold()
    }

    /// Format `LABEL [context:] message` and emit it as one line
    ///
    /// Must serialize concurrent calls so lines never interleave.
    fn write(&self, level: Level, context: &str, message: &str) -> io::Result<()>;

    /// Release the output resource
    ///
    /// Idempotent. Later writes fail with `ErrorKind::NotConnected`.
    fn close(&self);
}

pub(crate) fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "backend is closed")
}
