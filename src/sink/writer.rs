//! Event sink implementations.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{EventSink, SinkError};

/// File-backed sink appending timestamped lines.
#[derive(Debug)]
pub struct FileEventSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileEventSink {
    /// Open (or create) the event log for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        debug!(path = %path.display(), "opened event log");

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the event log.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for FileEventSink {
    async fn record(&self, line: &str) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().unwrap();
        writeln!(writer, "[{}] {}", Utc::now().to_rfc3339(), line)?;
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// In-memory sink retaining records, for tests.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records so far, without timestamps.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Whether any record contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn record(&self, line: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
