//! Leveled logger with fan-out to several backends

use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::backends::{AnyBackend, Backend};
use crate::config::{BackendConfig, LoggerConfig};
use crate::error::LoggerResult;
use crate::level::Level;

/// Backend set shared by a logger and every context derived from it
struct Shared {
    backends: Vec<AnyBackend>,
    /// Serializes one message's fan-out against the next
    dispatch: Mutex<()>,
    failures: AtomicU64,
    spawner: Spawner,
}

/// Source of the threads used for multi-backend fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spawner {
    Os,
    /// Refuses every spawn, as the OS does under a thread limit
    #[cfg(test)]
    Exhausted,
}

/// Run one backend write, turning a panic into a failed write
fn write_caught(backend: &dyn Backend, level: Level, context: &str, message: &str) -> bool {
    let result = panic::catch_unwind(AssertUnwindSafe(|| backend.write(level, context, message)));
    matches!(result, Ok(Ok(())))
}

/// Leveled logger dispatching to every configured backend
///
/// Cloning is cheap: clones and [`Logger::with_context`] share the same
/// backends. Each leveled call returns once every backend that accepts the
/// level has finished its write. Write errors never reach the caller; they
/// are counted in [`Logger::write_failures`].
///
/// # Example
///
/// ```
/// use fanlog_core::{log_info, BackendConfig, FileConfig, Logger};
///
/// let logger = Logger::new([BackendConfig::from(FileConfig::stderr("info"))]).unwrap();
/// log_info!(logger, "hello {}", "world");
///
/// let db = logger.with_context("db");
/// db.warning("slow query");
/// logger.close();
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    context: String,
}

impl Logger {
    /// Build one backend per configuration, in order
    ///
    /// Fails on the first backend that cannot be built. Backends opened
    /// before the failure are closed and no logger is returned.
    pub fn new(configs: impl IntoIterator<Item = BackendConfig>) -> LoggerResult<Self> {
        let mut backends = Vec::new();

        for config in configs {
            match AnyBackend::from_config(&config) {
                Ok(backend) => backends.push(backend),
                Err(err) => {
                    backends.iter().for_each(|b| b.close());
                    return Err(err);
                }
            }
        }

        Ok(Self::from_backends(backends))
    }

    /// Build a logger from a configuration document
    pub fn from_config(config: &LoggerConfig) -> LoggerResult<Self> {
        Self::new(config.backends.iter().cloned())
    }

    /// Logger with no backends; every call is a no-op
    pub fn noop() -> Self {
        Self::from_backends(Vec::new())
    }

    fn from_backends(backends: Vec<AnyBackend>) -> Self {
        Self::from_parts(backends, Spawner::Os)
    }

    fn from_parts(backends: Vec<AnyBackend>, spawner: Spawner) -> Self {
        Self {
            shared: Arc::new(Shared {
                backends,
                dispatch: Mutex::new(()),
                failures: AtomicU64::new(0),
                spawner,
            }),
            context: String::new(),
        }
    }

    /// New logger sharing these backends, tagging messages with `context`
    pub fn with_context(&self, context: impl Into<String>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            context: context.into(),
        }
    }

    /// Current context, empty when none was set
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Backends in dispatch order
    pub fn backends(&self) -> &[AnyBackend] {
        &self.shared.backends
    }

    /// Number of backend writes that failed or were dropped
    pub fn write_failures(&self) -> u64 {
        self.shared.failures.load(Ordering::Relaxed)
    }

    /// Whether any backend would emit a message at `level`
    pub fn enabled(&self, level: Level) -> bool {
        self.shared.backends.iter().any(|b| b.accepts(level))
    }

    /// Format and dispatch a message at `level`
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) -> &Self {
        let targets: Vec<&AnyBackend> = self
            .shared
            .backends
            .iter()
            .filter(|b| b.accepts(level))
            .collect();
        if targets.is_empty() {
            return self;
        }

        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        let context = self.context.as_str();
        let message = message.as_str();

        let _guard = self.shared.dispatch.lock();
        if let [backend] = targets.as_slice() {
            self.record(write_caught(*backend, level, context, message));
            return self;
        }

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(targets.len());
            for &backend in &targets {
                match self.spawn_write(scope, backend, level, context, message) {
                    Ok(handle) => handles.push(handle),
                    // No thread available: write on the caller's thread
                    Err(_) => self.record(write_caught(backend, level, context, message)),
                }
            }

            for handle in handles {
                // A panicking backend counts as a failed write
                self.record(matches!(handle.join(), Ok(Ok(()))));
            }
        });

        self
    }

    fn spawn_write<'scope, 'env>(
        &self,
        scope: &'scope thread::Scope<'scope, 'env>,
        backend: &'env AnyBackend,
        level: Level,
        context: &'env str,
        message: &'env str,
    ) -> io::Result<thread::ScopedJoinHandle<'scope, io::Result<()>>> {
        match self.shared.spawner {
            Spawner::Os => thread::Builder::new()
                .name("fanlog-write".to_string())
                .spawn_scoped(scope, move || backend.write(level, context, message)),
            #[cfg(test)]
            Spawner::Exhausted => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "thread limit reached",
            )),
        }
    }

    fn record(&self, ok: bool) {
        if !ok {
            self.shared.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Log an error message
    pub fn error(&self, message: &str) -> &Self {
        self.log(Level::Error, format_args!("{}", message))
    }

    /// Log a warning message
    pub fn warning(&self, message: &str) -> &Self {
        self.log(Level::Warning, format_args!("{}", message))
    }

    /// Log a notice message
    pub fn notice(&self, message: &str) -> &Self {
        self.log(Level::Notice, format_args!("{}", message))
    }

    /// Log an info message
    pub fn info(&self, message: &str) -> &Self {
        self.log(Level::Info, format_args!("{}", message))
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) -> &Self {
        self.log(Level::Debug, format_args!("{}", message))
    }

    /// Log an error message with format arguments
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.log(Level::Error, args)
    }

    /// Log a warning message with format arguments
    pub fn warning_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.log(Level::Warning, args)
    }

    /// Log a notice message with format arguments
    pub fn notice_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.log(Level::Notice, args)
    }

    /// Log an info message with format arguments
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.log(Level::Info, args)
    }

    /// Log a debug message with format arguments
    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.log(Level::Debug, args)
    }

    /// Close every backend in turn
    ///
    /// Affects all loggers sharing these backends. Calls made after this
    /// point are dropped and counted as write failures.
    pub fn close(&self) {
        for backend in &self.shared.backends {
            backend.close();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .field("backends", &self.shared.backends)
            .field("write_failures", &self.write_failures())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::error::LoggerError;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn file_config(path: &Path, level: &str) -> BackendConfig {
        FileConfig::new(path.to_string_lossy(), level).into()
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_valid_levels_construct() {
        let dir = tempdir().unwrap();
        for level in Level::ALL {
            let path = dir.path().join(format!("{}.log", level.name()));
            let logger = Logger::new([file_config(&path, level.name())]).unwrap();
            assert_eq!(logger.backends().len(), 1);
            assert_eq!(logger.backends()[0].threshold(), level);
        }
    }

    #[test]
    fn test_invalid_level_fails() {
        for name in ["", "Info", "trace", "fatal"] {
            let err = Logger::new([BackendConfig::from(FileConfig::stderr(name))]).unwrap_err();
            assert!(matches!(err, LoggerError::InvalidLevel(_)));
        }
    }

    #[test]
    fn test_threshold_filtering() {
        let dir = tempdir().unwrap();
        for threshold in Level::ALL {
            let path = dir.path().join(format!("threshold-{}.log", threshold.name()));
            let logger = Logger::new([file_config(&path, threshold.name())]).unwrap();

            for level in Level::ALL {
                logger.log(level, format_args!("at {}", level.name()));
            }
            logger.close();

            let lines = read_lines(&path);
            let expected: Vec<Level> = Level::ALL.into_iter().filter(|l| *l <= threshold).collect();
            assert_eq!(lines.len(), expected.len(), "threshold {}", threshold.name());
            for (line, level) in lines.iter().zip(expected) {
                assert!(line.ends_with(&format!("{}: at {}", level.label(), level.name())));
            }
        }
    }

    #[test]
    fn test_warning_drops_debug() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new([file_config(&path, "warning")]).unwrap();

        assert!(!logger.enabled(Level::Debug));
        assert!(logger.enabled(Level::Warning));
        logger.debug("x").notice("y").info("z");
        logger.close();

        assert!(read_lines(&path).is_empty());
        assert_eq!(logger.write_failures(), 0);
    }

    #[test]
    fn test_formatted_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new([file_config(&path, "info")]).unwrap();

        crate::log_info!(logger, "hello {}", "world");
        logger.close();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" INFO: hello world"));
    }

    // Stderr content is not captured here; this only checks the write succeeds.
    // Line layout is covered by the file-backed tests.
    #[test]
    fn test_stderr_logger() {
        let logger = Logger::new([BackendConfig::from(FileConfig::stderr("info"))]).unwrap();
        assert_eq!(logger.backends()[0].name(), "console");
        logger.info_fmt(format_args!("hello {}", "world"));
        logger.close();
        assert_eq!(logger.write_failures(), 0);
    }

    #[test]
    fn test_with_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new([file_config(&path, "debug")]).unwrap();
        let request = logger.with_context("req-42");

        request.info("handled");
        logger.info("idle");
        assert_eq!(request.context(), "req-42");
        assert_eq!(logger.context(), "");
        assert!(Arc::ptr_eq(&logger.shared, &request.shared));
        logger.close();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" INFO: req-42: handled"));
        assert!(lines[1].ends_with(" INFO: idle"));
    }

    #[test]
    fn test_fan_out_respects_each_threshold() {
        let dir = tempdir().unwrap();
        let errors = dir.path().join("errors.log");
        let all = dir.path().join("all.log");
        let logger = Logger::new([file_config(&errors, "error"), file_config(&all, "debug")]).unwrap();

        logger.error("boom").warning("careful").debug("details");
        logger.close();

        assert_eq!(read_lines(&errors).len(), 1);
        assert_eq!(read_lines(&all).len(), 3);
    }

    #[test]
    fn test_concurrent_lines_are_intact() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let dir = tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        let logger = Logger::new([file_config(&first, "info"), file_config(&second, "info")]).unwrap();

        thread::scope(|scope| {
            for t in 0..THREADS {
                let logger = logger.with_context(format!("worker-{}", t));
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        crate::log_info!(logger, "payload {:04} {}", i, "x".repeat(64));
                    }
                });
            }
        });
        logger.close();

        for path in [&first, &second] {
            let lines = read_lines(path);
            assert_eq!(lines.len(), THREADS * PER_THREAD);

            let mut seen = HashSet::new();
            let mut last = vec![None; THREADS];
            for line in &lines {
                let (_, rest) = line.split_once(" INFO: worker-").expect("intact prefix");
                let (worker, payload) = rest.split_once(": payload ").expect("intact context");
                let (seq, filler) = payload.split_once(' ').expect("intact payload");
                assert_eq!(filler, "x".repeat(64));

                let worker: usize = worker.parse().unwrap();
                let seq: usize = seq.parse().unwrap();
                // Per-caller order is preserved
                assert!(last[worker].map_or(true, |prev| prev < seq));
                last[worker] = Some(seq);
                seen.insert((worker, seq));
            }
            assert_eq!(seen.len(), THREADS * PER_THREAD);
        }
        assert_eq!(logger.write_failures(), 0);
    }

    fn exhausted_logger(configs: &[BackendConfig]) -> Logger {
        let backends = configs
            .iter()
            .map(|c| AnyBackend::from_config(c).unwrap())
            .collect();
        Logger::from_parts(backends, Spawner::Exhausted)
    }

    #[test]
    fn test_fan_out_without_threads_writes_inline() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        let logger = exhausted_logger(&[file_config(&first, "info"), file_config(&second, "info")]);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            logger.info("hello");
        }));
        assert!(result.is_ok());
        assert_eq!(logger.write_failures(), 0);

        // A failing inline write is still counted
        if let AnyBackend::File(backend) = &logger.backends()[1] {
            backend.close();
        }
        logger.warning("partial");
        assert_eq!(logger.write_failures(), 1);
        logger.close();

        let first_lines = read_lines(&first);
        assert_eq!(first_lines.len(), 2);
        assert!(first_lines[0].ends_with(" INFO: hello"));
        assert!(first_lines[1].ends_with(" WARNING: partial"));

        let second_lines = read_lines(&second);
        assert_eq!(second_lines.len(), 1);
        assert!(second_lines[0].ends_with(" INFO: hello"));
    }

    struct PanickingBackend;

    impl Backend for PanickingBackend {
        fn name(&self) -> &str {
            "panicking"
        }

        fn threshold(&self) -> Level {
            Level::Debug
        }

        fn write(&self, _level: Level, _context: &str, _message: &str) -> io::Result<()> {
            panic!("backend exploded");
        }

        fn close(&self) {}
    }

    #[test]
    fn test_panicking_write_is_a_failure() {
        assert!(!write_caught(&PanickingBackend, Level::Info, "", "boom"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let backend = AnyBackend::from_config(&file_config(&path, "info")).unwrap();
        assert!(write_caught(&backend, Level::Info, "", "fine"));
    }

    #[test]
    fn test_close_flushes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let logger = Logger::new([file_config(&path, "info")]).unwrap();
        for i in 0..100 {
            crate::log_notice!(logger, "line {}", i);
        }
        logger.close();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 100);
        assert!(lines[99].ends_with("NOTICE: line 99"));
    }

    #[test]
    fn test_writes_after_close_are_counted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::new([file_config(&path, "info")]).unwrap();
        logger.close();
        logger.close();

        logger.error("dropped");
        logger.debug("filtered");
        assert_eq!(logger.write_failures(), 1);
    }

    #[test]
    fn test_construction_is_fail_fast() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.log");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let bad = blocker.join("bad.log");

        let err = Logger::new([file_config(&good, "info"), file_config(&bad, "info")]).unwrap_err();
        assert!(matches!(err, LoggerError::CreateDirectory { .. }));

        let err = Logger::new([file_config(&good, "info"), FileConfig::stderr("loud").into()])
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
    }

    #[test]
    fn test_from_config_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let yaml = format!(
            "backends:\n  - type: file\n    path: {}\n    level: notice\n",
            path.display()
        );
        let config = LoggerConfig::from_yaml_str(&yaml).unwrap();
        let logger = Logger::from_config(&config).unwrap();

        logger.notice("configured").info("filtered");
        logger.close();
        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn test_noop_logger() {
        let logger = Logger::noop();
        assert!(logger.backends().is_empty());
        assert!(!logger.enabled(Level::Error));

        logger.error("e").warning("w").notice("n").info("i").debug("d");
        logger.with_context("ctx").info("still nothing");
        logger.close();
        assert_eq!(logger.write_failures(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_and_syslog_fan_out() {
        use crate::config::SyslogConfig;
        use std::os::unix::net::UnixDatagram;

        let dir = tempdir().unwrap();
        let sock = dir.path().join("log.sock");
        let server = UnixDatagram::bind(&sock).unwrap();
        let path = dir.path().join("app.log");

        let logger = Logger::new([
            file_config(&path, "debug"),
            SyslogConfig::new("svc", "warning").with_socket(&sock).into(),
        ])
        .unwrap();
        assert_eq!(logger.backends()[1].name(), "syslog");

        logger.with_context("api").error("unavailable");
        logger.info("file only");
        logger.close();

        let mut buf = [0u8; 512];
        let n = server.recv(&mut buf).unwrap();
        let datagram = String::from_utf8_lossy(&buf[..n]);
        assert!(datagram.starts_with("<11>"));
        assert!(datagram.ends_with(": api: unavailable"));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("ERROR: api: unavailable"));
    }
}
