//! Local JSON cache file backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use kawase_core::{KawaseError, RateSeries, SeriesStore};

/// A cache file on the local filesystem.
pub struct FsStore {
    path: PathBuf,
}

impl FsStore {
    /// A store backed by the JSON file at `path`. The file need not exist
    /// yet; the first `save` creates it (and any missing parent directory).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn store_err(path: &Path, err: impl std::fmt::Display) -> KawaseError {
    KawaseError::store(format!("{}: {err}", path.display()))
}

#[async_trait]
impl SeriesStore for FsStore {
    async fn load(&self) -> Result<RateSeries, KawaseError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let series: RateSeries =
                    serde_json::from_slice(&bytes).map_err(|e| store_err(&self.path, e))?;
                debug!(path = %self.path.display(), days = series.len(), "loaded cache file");
                Ok(series)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no cache file yet, starting empty");
                Ok(RateSeries::new())
            }
            Err(e) => Err(store_err(&self.path, e)),
        }
    }

    async fn save(&self, series: &RateSeries) -> Result<(), KawaseError> {
        let body = serde_json::to_vec(series).map_err(|e| store_err(&self.path, e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| store_err(&self.path, e))?;
        }

        // Write a sibling temp file and rename over the destination so the
        // previous cache survives a failed or interrupted write.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| store_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| store_err(&self.path, e))?;

        info!(path = %self.path.display(), days = series.len(), "saved cache file");
        Ok(())
    }
}
