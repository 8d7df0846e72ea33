//! System log backend
//!
//! Sends each message as one RFC 3164 datagram to the local syslog socket.

use std::io;
use std::net::Shutdown;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::traits::{closed_error, Backend};
use crate::config::SyslogConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;

#[cfg(target_os = "macos")]
const DEFAULT_SOCKET: &str = "/var/run/syslog";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SOCKET: &str = "/dev/log";

/// Syslog facilities (RFC 5424 codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    Authpriv = 10,
    Ftp = 11,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    /// Look up a facility by its lowercase name
    pub fn from_name(name: &str) -> LoggerResult<Self> {
        let facility = match name {
            "kern" => Facility::Kern,
            "user" => Facility::User,
            "mail" => Facility::Mail,
            "daemon" => Facility::Daemon,
            "auth" => Facility::Auth,
            "syslog" => Facility::Syslog,
            "lpr" => Facility::Lpr,
            "news" => Facility::News,
            "uucp" => Facility::Uucp,
            "cron" => Facility::Cron,
            "authpriv" => Facility::Authpriv,
            "ftp" => Facility::Ftp,
            "local0" => Facility::Local0,
            "local1" => Facility::Local1,
            "local2" => Facility::Local2,
            "local3" => Facility::Local3,
            "local4" => Facility::Local4,
            "local5" => Facility::Local5,
            "local6" => Facility::Local6,
            "local7" => Facility::Local7,
            _ => return Err(LoggerError::InvalidFacility(name.to_string())),
        };
        Ok(facility)
    }

    /// Numeric facility code
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Backend forwarding messages to the system log
pub struct SyslogBackend {
    threshold: Level,
    facility: Facility,
    tag: String,
    pid: u32,
    socket_path: PathBuf,
    socket: Mutex<Option<UnixDatagram>>,
}

impl SyslogBackend {
    /// Connect to the syslog socket described by `config`
    pub fn new(config: &SyslogConfig) -> LoggerResult<Self> {
        let threshold = Level::from_name(&config.level)?;
        let facility = Facility::from_name(&config.facility)?;
        let socket_path = config
            .socket
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET));

        let socket = UnixDatagram::unbound()
            .and_then(|s| s.connect(&socket_path).map(|_| s))
            .map_err(|source| LoggerError::Connect {
                path: socket_path.clone(),
                source,
            })?;

        Ok(Self {
            threshold,
            facility,
            tag: config.tag.clone(),
            pid: std::process::id(),
            socket_path,
            socket: Mutex::new(Some(socket)),
        })
    }

    /// Facility every message is sent under
    pub fn facility(&self) -> Facility {
        self.facility
    }

    /// Program tag in the message header
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Socket the datagrams are sent to
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// PRI value for `level`
    pub fn priority(&self, level: Level) -> u8 {
        self.facility.code() * 8 + level.syslog_severity()
    }

    /// Build the datagram payload for one message
    pub fn format_message(&self, timestamp: &str, level: Level, context: &str, message: &str) -> String {
        let pri = self.priority(level);
        if context.is_empty() {
            format!("<{}>{} {}[{}]: {}", pri, timestamp, self.tag, self.pid, message)
        } else {
            format!(
                "<{}>{} {}[{}]: {}: {}",
                pri, timestamp, self.tag, self.pid, context, message
            )
        }
    }
}

impl Backend for SyslogBackend {
    fn name(&self) -> &str {
        "syslog"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, level: Level, context: &str, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format("%b %e %H:%M:%S").to_string();
        let payload = self.format_message(&timestamp, level, context, message);

        let socket = self.socket.lock();
        match socket.as_ref() {
            Some(s) => s.send(payload.as_bytes()).map(|_| ()),
            None => Err(closed_error()),
        }
    }

    fn close(&self) {
        if let Some(socket) = self.socket.lock().take() {
            let _ = socket.shutdown(Shutdown::Both);
        }
    }
}

impl std::fmt::Debug for SyslogBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyslogBackend")
            .field("threshold", &self.threshold)
            .field("facility", &self.facility)
            .field("tag", &self.tag)
            .field("socket_path", &self.socket_path)
            .finish()
    }
}
