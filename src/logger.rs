/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Structured, append-only logging for Syn-Compose sessions.

  Security / Safety Notes:
    Entries carry compose ids, counts and local paths only.

  Dependencies:
    chrono for UTC stamps, sha2 for the session digest.

  Operational Scope:
    One logger per invocation, passed by reference to the
    command handlers in `main`.

  Revision History:
    2025-11-12 COD  Carried the Syn-Syu logger over to compose
                    sessions; digest sidecar kept.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{Result, SyncomposeError};

/// Structured log level for Syn-Compose events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// WARN and ERROR always reach stderr.
    fn always_echoed(self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// Render one log line: `<stamp> [LEVEL] [CODE] message`.
fn format_entry(timestamp: &str, level: LogLevel, code: &str, message: &str) -> String {
    format!("{timestamp} [{}] [{code}] {message}", level.as_str())
}

/// Session logger writing to stderr and, optionally, an append-only file.
pub struct Logger {
    sink: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    verbose: bool,
}

impl Logger {
    /// Open the optional log file in append mode; stderr is always available.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let sink = match path.as_deref() {
            Some(file_path) => Some(Mutex::new(BufWriter::new(open_append(file_path)?))),
            None => None,
        };
        Ok(Self {
            sink,
            path,
            verbose,
        })
    }

    /// Emit one entry at `level` under `code`.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let entry = format_entry(&timestamp, level, code, message.as_ref());

        if self.verbose || level.always_echoed() {
            eprintln!("{entry}");
        }

        let Some(sink) = &self.sink else {
            return;
        };
        let Ok(mut writer) = sink.lock() else {
            return;
        };
        if writeln!(writer, "{entry}").and_then(|_| writer.flush()).is_err() {
            eprintln!(
                "{}",
                format_entry(&timestamp, LogLevel::Error, "LOGGER", "Failed to write log file")
            );
        }
    }

    /// Convenience wrapper for `INFO` level events.
    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    /// Convenience wrapper for `WARN` level events.
    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    /// Convenience wrapper for `ERROR` level events.
    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    /// Convenience wrapper for `DEBUG` level events; shown only with `--verbose`.
    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write `<log>.hash` containing the SHA-256 of the session log.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let data = std::fs::read(path).map_err(|err| {
            SyncomposeError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);

        let mut hash_os = path.as_os_str().to_os_string();
        hash_os.push(".hash");
        let hash_path = PathBuf::from(hash_os);
        let line = format!(
            "{:x}  {}\n",
            digest,
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        std::fs::write(&hash_path, line).map_err(|err| {
            SyncomposeError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SyncomposeError::Filesystem(format!(
                "Failed to create log directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            SyncomposeError::Filesystem(format!(
                "Failed to open log file {}: {err}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("2025-01-01T00:00:00Z", LogLevel::Warn, "NEVRA", "skipped foo"),
            "2025-01-01T00:00:00Z [WARN] [NEVRA] skipped foo"
        );
    }

    #[test]
    fn test_file_logging_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("diff.log");
        let logger = Logger::new(Some(path.clone()), false).unwrap();
        logger.info("INIT", "hello");
        logger.debug("DIFF", "details");
        logger.finalize().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] [INIT] hello"));
        assert!(lines[1].ends_with("[DEBUG] [DIFF] details"));

        let hash = std::fs::read_to_string(dir.path().join("nested").join("diff.log.hash")).unwrap();
        let expected = format!("{:x}", Sha256::digest(contents.as_bytes()));
        assert_eq!(hash, format!("{expected}  diff.log\n"));
    }

    #[test]
    fn test_stderr_only_logger_finalizes_cleanly() {
        let logger = Logger::new(None, false).unwrap();
        logger.warn("EMPTY", "nothing to compare");
        assert!(logger.path().is_none());
        logger.finalize().unwrap();
    }
}
