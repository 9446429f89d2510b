//! Local filesystem storage implementation.
//!
//! Keeps the watchlist in a single pretty-printed JSON file. Writes go to a
//! sibling temp file first and are renamed into place, so an interrupted
//! commit never leaves a half-written state file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::BaseDirs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{Watchlist, WatchlistStore};

/// File name of the default state file in the home directory.
pub const DEFAULT_STATE_FILE: &str = ".israel-post-state.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `~/.israel-post-state.json`.
    pub fn in_home() -> Result<Self> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| AppError::store("could not determine home directory"))?;
        Ok(Self::new(dirs.home_dir().join(DEFAULT_STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl WatchlistStore for LocalStorage {
    async fn load(&self) -> Result<Watchlist> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::debug!("No state file at {}, starting empty", self.path.display());
                Ok(Watchlist::default())
            }
        }
    }

    async fn commit(&self, watchlist: &Watchlist) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(watchlist)?;
        self.write_bytes(&bytes).await?;
        log::debug!(
            "Committed {} package(s) to {}",
            watchlist.len(),
            self.path.display()
        );
        Ok(())
    }
}
