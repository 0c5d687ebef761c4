//! Health log sinks.
//!
//! The reporter writes through a [`LogSink`] handed to it, so nothing in the
//! check depends on a process-wide logger.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::report::Level;

/// Used when the configured log directory cannot be created.
pub const FALLBACK_LOG_FILE: &str = "./ethereum-health.log";

/// Destination for timestamped, level-tagged log lines.
pub trait LogSink {
    fn record(&mut self, level: Level, message: &str) -> io::Result<()>;
}

/// `[2024-01-01T00:00:00Z] WARNING: message`
pub fn format_line(at: DateTime<Utc>, level: Level, message: &str) -> String {
    format!(
        "[{}] {level}: {message}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Append-only log file, held open for the duration of the run.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: File,
}

impl FileLog {
    /// Open `path`, falling back to [`FALLBACK_LOG_FILE`].
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open_with_fallback(path.as_ref(), Path::new(FALLBACK_LOG_FILE))
    }

    /// Open `path` for appending, creating its parent directory. If the
    /// directory or file cannot be created, `fallback` is used instead.
    pub fn open_with_fallback(path: &Path, fallback: &Path) -> io::Result<Self> {
        match Self::open_at(path) {
            Ok(log) => Ok(log),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    fallback = %fallback.display(),
                    error = %e,
                    "could not open log file, using fallback"
                );
                Self::open_at(fallback)
            }
        }
    }

    fn open_at(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && dir != Path::new(".") {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// The file actually written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLog {
    fn record(&mut self, level: Level, message: &str) -> io::Result<()> {
        writeln!(self.file, "{}", format_line(Utc::now(), level, message))
    }
}

/// Keeps log lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Vec<String>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns `true` if a line at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        let tag = format!("] {level}: ");
        self.lines
            .iter()
            .any(|l| l.contains(&tag) && l.contains(needle))
    }
}

impl LogSink for MemoryLog {
    fn record(&mut self, level: Level, message: &str) -> io::Result<()> {
        self.lines.push(format_line(Utc::now(), level, message));
        Ok(())
    }
}
