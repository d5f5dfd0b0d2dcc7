//! Message Store: append-only JSON record of contact submissions.
//!
//! The whole array is rewritten on every append through a temp file that is
//! renamed over the target, so a failed write never truncates the record.
//! Writers are serialized by an in-process mutex and an advisory lock on
//! `<record>.lock`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use fs2::FileExt;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::contact::models::{NewSubmission, StoredSubmission};

const BACKUP_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize messages: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store task failed: {0}")]
    Task(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Durable record of contact submissions.
///
/// Carried in `AppState` as `Arc<dyn SubmissionStore>`.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Stamps the submission and appends it. Returns the stored record.
    async fn append(&self, submission: &NewSubmission) -> Result<StoredSubmission, StoreError>;

    /// Reads the full stored sequence, oldest first.
    async fn load(&self) -> Result<Vec<StoredSubmission>, StoreError>;
}

/// Submissions stored as a single JSON array in one file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn append(&self, submission: &NewSubmission) -> Result<StoredSubmission, StoreError> {
        let _guard = self.write_lock.lock().await;

        let record = StoredSubmission::stamped(submission, Local::now());
        let path = self.path.clone();
        let to_write = record.clone();

        let total = tokio::task::spawn_blocking(move || append_blocking(&path, to_write))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        info!("Stored contact message ({total} total)");
        debug!("Stored message from {} <{}>", record.name, record.email);
        Ok(record)
    }

    async fn load(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        let path = self.path.clone();
        let file = tokio::task::spawn_blocking(move || read_records(&path))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        match file {
            RecordFile::Records(records) => Ok(records),
            RecordFile::Unreadable(reason) => {
                warn!(
                    "Message record {} is unreadable ({reason}); replacing it on next append",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Read-modify-write under the file lock. Returns the new record count.
fn append_blocking(path: &Path, record: StoredSubmission) -> Result<usize, StoreError> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let lock_path = lock_path_for(path);
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| StoreError::io(&lock_path, e))?;
    lock_file
        .lock_exclusive()
        .map_err(|e| StoreError::io(&lock_path, e))?;

    let mut records = match read_records(path)? {
        RecordFile::Records(records) => records,
        RecordFile::Unreadable(reason) => {
            let backup = back_up_corrupt(path)?;
            warn!(
                "Message record {} is unreadable ({reason}); old content moved to {}",
                path.display(),
                backup.display()
            );
            Vec::new()
        }
    };
    records.push(record);
    write_records(path, &records)?;

    // Released on drop as well; unlock explicitly so errors are visible.
    if let Err(e) = lock_file.unlock() {
        warn!("Failed to release lock {}: {e}", lock_path.display());
    }
    Ok(records.len())
}

/// Contents of the record file as found on disk.
enum RecordFile {
    Records(Vec<StoredSubmission>),
    /// Bytes that are not a JSON array of submissions. Left untouched.
    Unreadable(String),
}

/// Missing or blank file reads as no records. Never writes.
fn read_records(path: &Path) -> Result<RecordFile, StoreError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No message record at {}, starting empty", path.display());
            return Ok(RecordFile::Records(Vec::new()));
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordFile::Records(Vec::new()));
    }

    Ok(match serde_json::from_slice::<Vec<StoredSubmission>>(&raw) {
        Ok(records) => RecordFile::Records(records),
        Err(e) => RecordFile::Unreadable(e.to_string()),
    })
}

/// Copies an unreadable record to a fresh `<record>.corrupt-<stamp>` file.
/// Earlier backups are never overwritten.
fn back_up_corrupt(path: &Path) -> Result<PathBuf, StoreError> {
    let stamp = Local::now().format(BACKUP_STAMP_FORMAT).to_string();
    let mut backup = corrupt_path_for(path, &stamp);
    let mut n = 1;
    while backup.exists() {
        backup = corrupt_path_for(path, &format!("{stamp}-{n}"));
        n += 1;
    }
    fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
    Ok(backup)
}

fn write_records(path: &Path, records: &[StoredSubmission]) -> Result<(), StoreError> {
    let dir = parent_dir(path);
    let body = serde_json::to_vec_pretty(records)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(&body)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    // Best effort: make the rename durable.
    if let Ok(dir_handle) = File::open(dir) {
        let _ = dir_handle.sync_all();
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "messages.json".into());
    name.push(suffix);
    path.with_file_name(name)
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, ".lock")
}

fn corrupt_path_for(path: &Path, stamp: &str) -> PathBuf {
    sibling_with_suffix(path, &format!(".corrupt-{stamp}"))
}
