//! JSONL file adapter for the audit trail.
//!
//! Each [`EventLogEntry`] is serialized as a single JSON line and appended
//! via a buffered writer. Queries re-read the file, so entries written by an
//! earlier process are visible too.

use chamber_application::AuditLog;
use chamber_domain::{EventLogEntry, SessionId};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only audit trail stored as JSON lines.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every entry and on `Drop`.
pub struct JsonlAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Open (or create) the trail at the given path.
    ///
    /// Existing entries are kept. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for JsonlAuditLog {
    fn append(&self, entry: EventLogEntry) {
        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize audit entry: {}", e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not append to audit log {}: {}", self.path.display(), e);
        }
    }

    fn entries(&self, session_id: SessionId) -> Vec<EventLogEntry> {
        // Hold the writer lock so a concurrent append is not read half-written
        let _guard = self.writer.lock();

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not read audit log {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        // Split on raw bytes: a line that is not UTF-8 is just another malformed line
        for line in BufReader::new(file).split(b'\n') {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Stopped reading audit log {}: {}", self.path.display(), e);
                    break;
                }
            };
            if line.trim_ascii().is_empty() {
                continue;
            }
            match serde_json::from_slice::<EventLogEntry>(&line) {
                Ok(entry) if entry.session_id == session_id => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!("Skipping malformed audit line: {}", e),
            }
        }
        entries
    }
}

impl Drop for JsonlAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
