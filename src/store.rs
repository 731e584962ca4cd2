//! Durable cursor record.
//!
//! The cursor is the single source of truth for "what to post next". It is a
//! small JSON file:
//!
//! ```json
//! { "series": 0, "volume": 3, "page": 17 }
//! ```
//!
//! There is no fallback index. A missing or unreadable record stops the run,
//! because silently restarting from zero would re-post the archive from the
//! beginning. Use `pagecast set` to create or repair it.
//!
//! Saves replace the record wholesale: the new record is written to a
//! sibling temporary file, synced to disk, and renamed over the old one. Concurrent runs
//! against the same record are not coordinated; the last save wins.

use crate::cursor::ArchiveIndex;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read cursor record {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cursor record {path} is not a valid {{series, volume, page}} record: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot serialize cursor: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Cannot write cursor record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load/save access to the cursor record at a fixed path.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ArchiveIndex, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, index: ArchiveIndex) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&index)?;
        let tmp = self.temp_path();
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        write_synced(&tmp, format!("{json}\n").as_bytes()).map_err(write_error)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            write_error(source)
        })?;
        sync_parent(&self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cursor".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `bytes` to `path` and flush them to disk before returning.
fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Persist the rename itself. Not every platform can open a directory for
/// syncing, so failures are ignored; the record is already complete on disk.
fn sync_parent(path: &Path) {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        let _ = File::open(dir).and_then(|d| d.sync_all());
    }
}
