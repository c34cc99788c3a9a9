//! Persisted session configuration storage
//!
//! One JSON file per session, pretty-printed so operators can inspect it.
//! The file's presence is the sole signal that a previous session exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::model::SessionConfig;

/// Config store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read session config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode session config {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write session config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete session config {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Session configuration store backed by a single JSON file.
///
/// No locking is performed; a single orchestrator instance is assumed to own
/// the path at a time.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a stored session config is present. Only a definite
    /// "not found" counts as absent; any other filesystem error surfaces.
    pub fn exists(&self) -> Result<bool, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Load the stored session config. Malformed content is a decode error,
    /// never a partially populated config.
    pub fn load(&self) -> Result<SessionConfig, StoreError> {
        let raw = fs::read(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_slice(&raw).map_err(|e| StoreError::Decode {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Persist the session config, replacing any prior content atomically:
    /// the document is written to a temp file in the same directory and then
    /// renamed over the target, so a crash mid-write never leaves a torn
    /// file behind.
    pub fn save(&self, config: &SessionConfig) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(config).map_err(|e| StoreError::Decode {
            path: self.path.clone(),
            source: e,
        })?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(tmp.path(), &json).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        tmp.persist(&self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(path = %self.path.display(), "Saved session config");
        Ok(())
    }

    /// Remove the stored session config. Failure is fatal to the caller: it
    /// cannot guarantee the next run will re-provision.
    pub fn delete(&self) -> Result<(), StoreError> {
        fs::remove_file(&self.path).map_err(|e| StoreError::Delete {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), "Deleted session config");
        Ok(())
    }
}
