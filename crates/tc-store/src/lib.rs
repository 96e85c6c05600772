//! Storage layer for the timecard.
//!
//! The log is a plain file with one event per line, appended to and never
//! rewritten. Two encodings are supported, see [`LogFormat`].
//!
//! # Loading
//!
//! A missing file is an empty time card. The first malformed line aborts the
//! load with [`StoreError::Parse`]; nothing is skipped silently.
//!
//! # Appending
//!
//! Each record is encoded into a single buffer and written with one
//! `write_all` on a file opened in append mode, so a crash leaves either the
//! whole line or nothing. There is no locking: the log assumes one writer.

mod format;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tc_core::Event;
use thiserror::Error;

pub use format::LogFormat;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the filesystem.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// A persisted record could not be understood.
    #[error("malformed record on line {line}: {message}")]
    Parse { line: usize, message: String },
    /// An event could not be encoded as a CSV record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Handle on the append-only event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    format: LogFormat,
}

impl EventLog {
    /// Creates a handle for the log at `path`. No file is touched until the
    /// first load or append.
    pub fn new(path: impl Into<PathBuf>, format: LogFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn format(&self) -> LogFormat {
        self.format
    }

    /// Reads every event in log order.
    pub fn load(&self) -> Result<Vec<Event>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no log yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let content = std::str::from_utf8(&bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            StoreError::Parse {
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                message: e.to_string(),
            }
        })?;

        let events = self.format.decode(content)?;
        tracing::debug!(path = %self.path.display(), count = events.len(), "loaded events");
        Ok(events)
    }

    /// Appends one event, creating the file and its directory if needed.
    pub fn append(&self, event: &Event) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let record = self.format.encode(event)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&record)?;

        tracing::debug!(path = %self.path.display(), op = %event.op(), "appended event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_events() -> Vec<Event> {
        vec![
            Event::CheckIn {
                at: Utc.with_ymd_and_hms(2015, 1, 1, 8, 0, 0).unwrap(),
                comment: Some("planning - part 1".into()),
            },
            Event::CheckOut {
                at: Utc.with_ymd_and_hms(2015, 1, 1, 12, 30, 0).unwrap(),
                comment: None,
            },
            Event::Adjust { minutes: 30 },
            Event::Adjust { minutes: -10 },
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let log = EventLog::new(temp.path().join("timecard.txt"), LogFormat::Text);
        assert!(log.load().unwrap().is_empty());
        assert!(!log.path().exists());
    }

    #[test]
    fn append_then_load_preserves_events() {
        for format in [LogFormat::Text, LogFormat::Csv] {
            let temp = tempfile::tempdir().unwrap();
            let log = EventLog::new(temp.path().join("timecard"), format);

            for event in sample_events() {
                log.append(&event).unwrap();
            }

            assert_eq!(log.load().unwrap(), sample_events(), "{format}");
        }
    }

    #[test]
    fn append_creates_parent_directories() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".timecard").join("timecard.txt");
        let log = EventLog::new(&path, LogFormat::Text);

        log.append(&Event::Adjust { minutes: 5 }).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "add 5\n");
    }

    #[test]
    fn append_writes_one_line_per_event() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timecard.csv");
        let log = EventLog::new(&path, LogFormat::Csv);

        for event in sample_events() {
            log.append(&event).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "in,20150101T08:00:00,planning - part 1\nout,20150101T12:30:00\nadd,30\nsub,10\n"
        );
    }

    #[test]
    fn malformed_line_halts_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timecard.txt");
        fs::write(
            &path,
            "20150101T08:00:00 - in\nnot a record\n20150101T09:00:00 - out\n",
        )
        .unwrap();

        let err = EventLog::new(&path, LogFormat::Text).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_parse_error_on_its_line() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timecard.txt");
        fs::write(&path, b"20150101T08:00:00 - in\nadd \xff\xfe\n").unwrap();

        for format in [LogFormat::Text, LogFormat::Csv] {
            let err = EventLog::new(&path, format).load().unwrap_err();
            assert!(matches!(err, StoreError::Parse { line: 2, .. }), "{err}");
        }
    }

    #[test]
    fn unreadable_path_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let log = EventLog::new(temp.path(), LogFormat::Text);
        assert!(matches!(log.load(), Err(StoreError::Io(_))));
    }
}
