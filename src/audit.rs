//! Append-only CSV audit log of upload attempts.
//!
//! The file is meant to be opened directly in spreadsheet or `xsv`-style
//! tooling, so the store guarantees a fixed header row on open and then
//! only ever appends.

use crate::error::AuditError;
use crate::model::UploadLogEntry;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

/// Column order of the audit log. Stable; readers may rely on it.
pub const AUDIT_COLUMNS: [&str; 6] = [
    "upload_date",
    "file_path",
    "video_title",
    "status",
    "details",
    "youtube_url",
];

// None of the column names need CSV quoting, so the header line is just the
// joined names.
fn header_line() -> String {
    AUDIT_COLUMNS.join(",")
}

/// Sink for upload-attempt records. The concrete store is file-backed;
/// tests substitute in-memory implementations.
pub trait AuditLog {
    /// Appends one record. Errors are propagated, never swallowed.
    fn save(&mut self, entry: &UploadLogEntry) -> Result<(), AuditError>;
}

/// CSV-backed audit log with repair-on-open header handling.
pub struct CsvAuditLog {
    writer: csv::Writer<File>,
}

impl CsvAuditLog {
    /// Opens the log at `path`, guaranteeing it exists and starts with the
    /// expected header.
    ///
    /// Repair policy: a missing or empty file gets the header written; a
    /// file whose first line is not the expected header gets the header
    /// prepended with all existing content preserved below it (audit rows
    /// are never discarded); a file with a matching header is left
    /// untouched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        Self::ensure_header(path)?;
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            writer: csv::WriterBuilder::new().from_writer(file),
        })
    }

    fn ensure_header(path: &Path) -> Result<(), AuditError> {
        let existing = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let header = header_line();
        match existing.lines().next() {
            Some(first) if first == header => Ok(()),
            None => {
                std::fs::write(path, format!("{header}\n"))?;
                Ok(())
            }
            Some(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "audit log header missing or stale, rewriting it",
                );
                std::fs::write(path, format!("{header}\n{existing}"))?;
                Ok(())
            }
        }
    }
}

impl AuditLog for CsvAuditLog {
    fn save(&mut self, entry: &UploadLogEntry) -> Result<(), AuditError> {
        self.writer.write_record([
            entry.upload_date.to_string(),
            entry.file_path.display().to_string(),
            entry.video_title.clone(),
            entry.status.to_string(),
            entry.details.clone(),
            entry.youtube_url.clone().unwrap_or_default(),
        ])?;
        // each row is an attempt we must not lose to process exit
        self.writer.flush()?;
        Ok(())
    }
}
