//! Timestamped audit log written next to each processed presentation.

use anyhow::{Context, Result};
use fontnorm_core::audit::{format_line, AuditSink};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Appends audit lines to a log file and echoes them to stdout.
pub struct FileAuditSink {
    path: PathBuf,
    file: File,
    echo: bool,
    write_error: Option<io::Error>,
}

impl FileAuditSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            echo: true,
            write_error: None,
        })
    }

    /// Stop mirroring lines to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Record a message with no excerpt.
    pub fn note(&mut self, message: &str) {
        self.emit(message, None);
    }

    /// Record a failure message; the console copy goes to stderr.
    pub fn note_failure(&mut self, message: &str) {
        let line = self.write_line(message, None);
        eprintln!("{}", line);
    }

    /// The first error hit while writing to the log file, if any.
    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    fn write_line(&mut self, message: &str, excerpt: Option<&str>) -> String {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&timestamp, message, excerpt);

        if let Err(e) = writeln!(self.file, "{}", line) {
            log::warn!("Failed to write to {}: {}", self.path.display(), e);
            self.write_error.get_or_insert(e);
        }
        line
    }
}

impl AuditSink for FileAuditSink {
    fn emit(&mut self, message: &str, excerpt: Option<&str>) {
        let line = self.write_line(message, excerpt);
        if self.echo {
            println!("{}", line);
        }
    }
}

/// Path of the audit log for a presentation: same directory and stem, `.log` extension.
pub fn log_path(file: &Path) -> PathBuf {
    file.with_extension("log")
}
