// sink.rs — Audit sink contract and the provided sinks.
//
// The logger hands every finished record to exactly one sink write. Sinks
// own the I/O: which medium the line lands on and how concurrent writers
// are serialized. The contract is one full line per call, never
// interleaved mid-line.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AuditError;
use crate::event::AuditRecord;

/// Destination for audit lines.
///
/// `tag` is the classification tag (see [`crate::AUDIT_TAG`]) that lets
/// downstream filters separate audit records from ordinary operational log
/// output. Implementations append `line` as one complete record. Errors
/// are the sink's own; the logger propagates them to the caller without
/// retrying. Sinks that fail for non-I/O reasons should wrap the cause in
/// an `io::Error`.
pub trait AuditSink: Send + Sync {
    /// Append one tagged line to the medium this sink manages.
    fn write(&self, tag: &str, line: &str) -> io::Result<()>;
}

/// Forwards audit lines to the `tracing` infrastructure.
///
/// Lines are emitted at INFO level on the fixed `audit` target, with the
/// classification tag attached as a field, so a subscriber can route audit
/// records away from operational logs by target. Never fails.
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn write(&self, tag: &str, line: &str) -> io::Result<()> {
        tracing::info!(target: "audit", tag, "{}", line);
        Ok(())
    }
}

/// Append-only JSONL file sink.
///
/// The file is opened once in append mode (created along with missing
/// parent directories) and every line is flushed as soon as it is written.
/// A mutex serializes concurrent writers so each call lands as one
/// uninterrupted line. The file is a dedicated audit medium, so the
/// classification tag is not written into it.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Open (or create) the audit trail at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| AuditError::OpenFailed {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        // Append mode: existing trail content is never overwritten.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the underlying trail file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a trail back, oldest first. Blank lines are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<AuditRecord>, AuditError> {
        let file = File::open(path.as_ref()).map_err(|source| AuditError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AuditRecord = serde_json::from_str(&line)?;
            records.push(record);
        }

        Ok(records)
    }
}

impl AuditSink for FileSink {
    fn write(&self, _tag: &str, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "audit trail writer poisoned"))?;
        writeln!(writer, "{}", line)?;
        // Flush per record so the trail survives a crash of the process.
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventFields;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[test]
    fn file_sink_appends_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileSink::open(&path).unwrap();
        assert_eq!(sink.path(), path);

        let first = AuditRecord::success("login", EventFields::new().with_user("alice"));
        let second = AuditRecord::failure("login", EventFields::new().with_user("bob"));
        sink.write("AUDIT", &first.to_json().unwrap()).unwrap();
        sink.write("AUDIT", &second.to_json().unwrap()).unwrap();

        let records = FileSink::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, "login");
        assert_eq!(records[1].event, "login failed");
    }

    #[test]
    fn file_sink_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("audit").join("trail.jsonl");
        let sink = FileSink::open(&path).unwrap();

        let record = AuditRecord::success("init", EventFields::new());
        sink.write("AUDIT", &record.to_json().unwrap()).unwrap();

        assert_eq!(FileSink::read_all(&path).unwrap().len(), 1);
    }

    #[test]
    fn reopened_sink_appends_instead_of_truncating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let sink = FileSink::open(&path).unwrap();
            let record = AuditRecord::success("first", EventFields::new());
            sink.write("AUDIT", &record.to_json().unwrap()).unwrap();
        }
        {
            let sink = FileSink::open(&path).unwrap();
            let record = AuditRecord::success("second", EventFields::new());
            sink.write("AUDIT", &record.to_json().unwrap()).unwrap();
        }

        let records = FileSink::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, "first");
        assert_eq!(records[1].event, "second");
    }

    #[test]
    fn read_all_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(
            &path,
            "{\"event\":\"login\",\"user\":\"alice\",\"data\":null}\n\n\n",
        )
        .unwrap();

        let records = FileSink::read_all(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user.as_deref(), Some("alice"));
    }

    #[test]
    fn concurrent_writes_stay_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = Arc::new(FileSink::open(&path).unwrap());

        let line = AuditRecord::success("login", EventFields::new().with_user("alice"))
            .to_json()
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                let line = line.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        sink.write("AUDIT", &line).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every line must parse back cleanly: interleaved writes would not.
        let records = FileSink::read_all(&path).unwrap();
        assert_eq!(records.len(), 100);
    }

    // Shared buffer the fmt subscriber writes into, so the test can
    // inspect what TracingSink emitted.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn tracing_sink_emits_on_audit_target() {
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_ansi(false)
            .finish();

        let line = r#"{"event":"login","user":"alice","data":null}"#;
        tracing::subscriber::with_default(subscriber, || {
            TracingSink.write("AUDIT", line).unwrap();
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("audit"));
        assert!(output.contains("AUDIT"));
        assert!(output.contains(line));
    }
}
