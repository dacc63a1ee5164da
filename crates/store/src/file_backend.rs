//! File-based store: one pretty-printed JSON snapshot per dossier.
//!
//! Storage location: `<dir>/<dossier_id>.json`, by default
//! `~/.tess/dossiers/`. Snapshots are human-inspectable and survive
//! restarts. A write goes to a temporary file first and is then renamed
//! over the old snapshot, so a crash mid-write never leaves a torn file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tess_core::error::StoreError;
use tess_core::{Dossier, DossierStore};
use tracing::debug;
use uuid::Uuid;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map an id onto its snapshot path, rejecting ids that could escape `dir`.
    fn snapshot_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        let invalid = id.trim().is_empty()
            || id.contains('/')
            || id.contains('\\')
            || id.contains("..")
            || id.contains('\0');
        if invalid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl DossierStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, id: &str) -> Result<Option<Dossier>, StoreError> {
        let path = self.snapshot_path(id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let dossier = serde_json::from_str(&content).map_err(|e| StoreError::Serialization {
            dossier_id: id.to_string(),
            reason: e.to_string(),
        })?;
        debug!(dossier_id = %id, path = %path.display(), "Loaded dossier snapshot");
        Ok(Some(dossier))
    }

    async fn save(&self, dossier: &Dossier) -> Result<(), StoreError> {
        let id = dossier.id.as_str();
        let path = self.snapshot_path(id)?;

        let json = serde_json::to_string_pretty(dossier).map_err(|e| StoreError::Serialization {
            dossier_id: id.to_string(),
            reason: e.to_string(),
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(format!("Failed to create store directory: {e}")))?;

        let tmp = self
            .dir
            .join(format!(".{id}.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Io(format!("Failed to write snapshot: {e}")))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io(format!("Failed to replace snapshot: {e}")));
        }

        debug!(dossier_id = %id, path = %path.display(), "Saved dossier snapshot");
        Ok(())
    }

    async fn reset(&self, id: &str) -> Result<bool, StoreError> {
        let path = self.snapshot_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(format!("Failed to delete snapshot: {e}"))),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(format!("Failed to list store: {e}"))),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
