//! Append-only newline-delimited JSON log with a single writer.
//!
//! One task owns the file handle. Callers hand it complete lines over a
//! channel and wait for an acknowledgement, so concurrent requests can never
//! interleave partial records.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

use crate::activity::entry::{utc_timestamp, LogEntry};
use crate::observability::metrics;

const QUEUE_DEPTH: usize = 1024;

/// Failure to persist a record.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("log writer has shut down")]
    WriterClosed,
}

struct WriteRequest {
    line: String,
    ack: oneshot::Sender<Result<(), LoggingError>>,
}

/// Handle to an append-only log. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    name: String,
    path: PathBuf,
    tx: mpsc::Sender<WriteRequest>,
}

impl std::fmt::Debug for WriteRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteRequest").field("len", &self.line.len()).finish()
    }
}

impl ActivityLog {
    /// Spawn the writer task for `path`. Must be called inside a Tokio runtime.
    ///
    /// The file and its parent directories are created on first write.
    pub fn open(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let path = path.into();
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);

        tokio::spawn(run_writer(name.clone(), path.clone(), rx));
        tracing::info!(log = %name, path = %path.display(), "Activity log opened");

        Self { name, path, tx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a registration record.
    pub async fn append_entry(&self, entry: &LogEntry) -> Result<(), LoggingError> {
        self.append(entry).await
    }

    /// Append an arbitrary JSON object, stamping it with the current UTC time.
    ///
    /// A `timestamp` supplied by the caller is overwritten.
    pub async fn append_value(&self, value: serde_json::Value) -> Result<(), LoggingError> {
        let serde_json::Value::Object(mut record) = value else {
            metrics::record_log_write(&self.name, false);
            return Err(LoggingError::NotAnObject);
        };
        record.insert("timestamp".to_string(), utc_timestamp().into());
        self.append(&record).await
    }

    /// Serialize `record` as one line and wait until it is flushed.
    pub async fn append<T: Serialize + ?Sized>(&self, record: &T) -> Result<(), LoggingError> {
        let result = self.send(record).await;
        metrics::record_log_write(&self.name, result.is_ok());
        if let Err(e) = &result {
            tracing::error!(log = %self.name, error = %e, "Activity log append failed");
        }
        result
    }

    async fn send<T: Serialize + ?Sized>(&self, record: &T) -> Result<(), LoggingError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriteRequest { line, ack })
            .await
            .map_err(|_| LoggingError::WriterClosed)?;
        done.await.map_err(|_| LoggingError::WriterClosed)?
    }
}

async fn run_writer(name: String, path: PathBuf, mut rx: mpsc::Receiver<WriteRequest>) {
    let mut file: Option<File> = None;

    while let Some(request) = rx.recv().await {
        let result = write_line(&path, &mut file, request.line.as_bytes()).await;
        if result.is_err() {
            // Reopen on the next write; the path may have been fixed.
            file = None;
        }
        let _ = request.ack.send(result.map_err(LoggingError::from));
    }

    tracing::debug!(log = %name, "Activity log writer stopped");
}

async fn write_line(path: &Path, file: &mut Option<File>, line: &[u8]) -> std::io::Result<()> {
    if file.is_none() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        *file = Some(OpenOptions::new().create(true).append(true).open(path).await?);
    }

    let Some(handle) = file.as_mut() else {
        return Ok(());
    };

    let start = handle.metadata().await?.len();
    let result = async {
        handle.write_all(line).await?;
        handle.flush().await
    }
    .await;

    if result.is_err() {
        discard_tail(handle, start).await;
    }
    result
}

/// Cut the file back to `len`, dropping a partially written record so the
/// next append starts on a fresh line.
async fn discard_tail(handle: &File, len: u64) {
    if let Err(e) = handle.set_len(len).await {
        tracing::error!(error = %e, len, "Partial log record could not be removed");
    }
}
