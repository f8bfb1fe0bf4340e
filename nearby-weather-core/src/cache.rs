//! Single-slot on-disk store for the last good raw response.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::error::WeatherError;

/// File name of the cache slot inside the cache root.
pub const CACHE_FILE_NAME: &str = "api.openweathermap.org.json";

#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self { path: cache_root.as_ref().join(CACHE_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the slot with `bytes`.
    ///
    /// The bytes go to a temporary file next to the slot which is then renamed over it,
    /// so readers see either the old payload or the new one in full.
    pub fn store(&self, bytes: &[u8]) -> Result<(), WeatherError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| self.io_error(source))?;
        tmp.write_all(bytes).map_err(|source| self.io_error(source))?;
        tmp.as_file().sync_all().map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path)?;

        tracing::info!("Cached {} bytes at {}", bytes.len(), self.path.display());
        Ok(())
    }

    /// Read the slot. A missing or unreadable file is reported as `None`.
    pub fn load(&self) -> Option<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No cached response at {}", self.path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// When the slot was last written, if it exists.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    /// Remove the slot. Removing an empty slot is not an error.
    pub fn clear(&self) -> Result<(), WeatherError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> WeatherError {
        WeatherError::CacheIo { path: self.path.clone(), source }
    }
}
