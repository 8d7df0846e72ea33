//! File and console backend
//!
//! Appends one line per message to a log file, or writes to stderr when no
//! path is configured. Console output gets colored level labels when stderr
//! is a terminal; file output never does.

use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Color;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::traits::{closed_error, Backend};
use crate::config::FileConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;

/// Timestamp layout, local time with microseconds
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warning => Color::Yellow,
        Level::Notice => Color::Magenta,
        Level::Info => Color::Blue,
        Level::Debug => Color::Cyan,
    }
}

/// Built from raw codes: `ColoredString` decides on stdout's tty, not stderr's
static COLORED_LABELS: Lazy<[String; 5]> = Lazy::new(|| {
    Level::ALL.map(|level| {
        format!(
            "\x1b[{}m{}\x1b[0m",
            level_color(level).to_fg_str(),
            level.label()
        )
    })
});

static PLAIN_LABELS: Lazy<[String; 5]> =
    Lazy::new(|| Level::ALL.map(|level| format!("{}:", level.label())));

enum Output {
    Stderr,
    File(File),
}

/// Backend writing to a log file or to stderr
pub struct FileBackend {
    threshold: Level,
    path: Option<PathBuf>,
    use_colors: bool,
    output: Mutex<Option<Output>>,
}

impl FileBackend {
    /// Open the backend described by `config`
    ///
    /// Creates missing parent directories and opens the file for append.
    pub fn new(config: &FileConfig) -> LoggerResult<Self> {
        let threshold = Level::from_name(&config.level)?;

        if config.uses_stderr() {
            return Ok(Self::stderr(threshold));
        }

        let path = PathBuf::from(&config.path);
        let file = open_append(&path)?;

        Ok(Self {
            threshold,
            path: Some(path),
            use_colors: false,
            output: Mutex::new(Some(Output::File(file))),
        })
    }

    /// Backend bound to stderr
    ///
    /// Colors are used when stderr is a terminal and `NO_COLOR` is unset.
    pub fn stderr(threshold: Level) -> Self {
        let use_colors = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            threshold,
            path: None,
            use_colors,
            output: Mutex::new(Some(Output::Stderr)),
        }
    }

    /// Log file path, `None` for stderr
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether level labels are colored
    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    /// Label printed for `level`
    pub fn label(&self, level: Level) -> &'static str {
        let labels: &'static [String; 5] = if self.use_colors {
            &COLORED_LABELS
        } else {
            &PLAIN_LABELS
        };
        labels[level.index()].as_str()
    }

    /// Build a full output line, including the trailing newline
    pub fn format_line(&self, timestamp: &str, level: Level, context: &str, message: &str) -> String {
        if context.is_empty() {
            format!("{} {} {}\n", timestamp, self.label(level), message)
        } else {
            format!("{} {} {}: {}\n", timestamp, self.label(level), context, message)
        }
    }
}

fn open_append(path: &Path) -> LoggerResult<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| LoggerError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

impl Backend for FileBackend {
    fn name(&self) -> &str {
        if self.path.is_some() {
            "file"
        } else {
            "console"
        }
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, level: Level, context: &str, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = self.format_line(&timestamp, level, context, message);

        let mut output = self.output.lock();
        match output.as_mut() {
            Some(Output::File(file)) => file.write_all(line.as_bytes()),
            Some(Output::Stderr) => {
                let mut stderr = io::stderr().lock();
                stderr.write_all(line.as_bytes())?;
                stderr.flush()
            }
            None => Err(closed_error()),
        }
    }

    fn close(&self) {
        // Dropping the handle closes a file; stderr stays open for the process
        if let Some(Output::File(file)) = self.output.lock().take() {
            let _ = file.sync_all();
        }
    }
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("threshold", &self.threshold)
            .field("path", &self.path)
            .field("use_colors", &self.use_colors)
            .finish()
    }
}
