//! On-disk upload store for Word documents.
//!
//! Uploaded files are written under the store root with a generated name
//! and recorded in a JSON index next to them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static UPLOAD_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Where and what the store accepts.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding uploads and the index
    pub root: PathBuf,

    /// Accepted extensions, lower-case with the leading dot
    pub allowed_extensions: Vec<String>,

    /// Index file name inside `root`
    pub index_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("uploads")
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions: vec![".doc".to_string(), ".docx".to_string()],
            index_file: "files.json".to_string(),
        }
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }
}

/// Metadata kept for every upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub original_name: String,
    pub stored_name: String,
    pub path: String,
    pub upload_date: DateTime<Utc>,
}

/// Acknowledgement returned by [`UploadStore::upload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub message: String,
    pub file_id: String,
}

/// Upload store rooted at a directory.
#[derive(Debug)]
pub struct UploadStore {
    config: StoreConfig,
}

impl UploadStore {
    /// Open the store, creating its directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.root).map_err(|e| storage_error(&config.root, e))?;
        debug!("Upload store at {}", config.root.display());
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn index_path(&self) -> PathBuf {
        self.config.root.join(&self.config.index_file)
    }

    /// Lower-case extension with the dot, if the store accepts it.
    fn accepted_extension(&self, original_name: &str) -> Option<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))?;
        self.config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            .then_some(ext)
    }

    /// Store an uploaded file and record it in the index.
    ///
    /// The name is checked before anything is written.
    pub fn upload(&self, original_name: &str, bytes: &[u8]) -> Result<UploadReceipt> {
        let original_name = original_name.trim();
        if original_name.is_empty() {
            return Err(Error::UnsupportedFileType("no file name".to_string()));
        }
        let Some(ext) = self.accepted_extension(original_name) else {
            return Err(Error::UnsupportedFileType(format!(
                "{} (only {} files are allowed)",
                original_name,
                self.config.allowed_extensions.join(", ")
            )));
        };

        let mut records = self.list()?;

        let now = Utc::now();
        let nonce = next_nonce(&now);
        let stored_name = format!("file-{}-{}{}", now.timestamp_millis(), nonce, ext);
        let path = self.config.root.join(&stored_name);

        fs::write(&path, bytes).map_err(|e| storage_error(&path, e))?;

        let record = FileRecord {
            id: format!("{}-{}", now.timestamp_millis(), nonce),
            original_name: original_name.to_string(),
            stored_name: stored_name.clone(),
            path: path.display().to_string(),
            upload_date: now,
        };
        records.push(record.clone());
        if let Err(e) = self.write_index(&records) {
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!("Could not remove {}: {}", path.display(), cleanup);
            }
            return Err(e);
        }

        info!(
            "Stored upload {} as {} ({} bytes)",
            original_name,
            stored_name,
            bytes.len()
        );

        Ok(UploadReceipt {
            message: "File uploaded successfully".to_string(),
            file_id: record.id,
        })
    }

    /// Bytes of a stored file.
    pub fn download(&self, stored_name: &str) -> Result<Vec<u8>> {
        if !is_plain_name(stored_name) || stored_name == self.config.index_file {
            return Err(Error::NotFound(stored_name.to_string()));
        }

        let path = self.config.root.join(stored_name);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    /// Every recorded upload, oldest first.
    pub fn list(&self) -> Result<Vec<FileRecord>> {
        let path = self.index_path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&path, e)),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    /// Record for a stored file name.
    pub fn find(&self, stored_name: &str) -> Result<Option<FileRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|r| r.stored_name == stored_name))
    }

    fn write_index(&self, records: &[FileRecord]) -> Result<()> {
        let path = self.index_path();
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json).map_err(|e| storage_error(&path, e))
    }
}

fn storage_error(path: &Path, err: io::Error) -> Error {
    Error::Storage(format!("{}: {}", path.display(), err))
}

/// A single path component with no traversal.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\'])
}

/// Nine-digit suffix that keeps same-millisecond uploads apart.
fn next_nonce(now: &DateTime<Utc>) -> u32 {
    let count = UPLOAD_COUNTER.fetch_add(1, Ordering::Relaxed);
    now.timestamp_subsec_nanos()
        .wrapping_add(count.wrapping_mul(7_919))
        % 1_000_000_000
}
