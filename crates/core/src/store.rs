//! DossierStore trait: where dossiers live between turns.
//!
//! The turn controller loads a dossier at the start of a turn and saves it
//! once at the end. Implementations hand out owned copies, so a turn that
//! fails halfway never leaks a half-updated dossier into the store.
//!
//! Implementations: in-memory (tests, ephemeral sessions), JSON files.

use async_trait::async_trait;

use crate::dossier::Dossier;
use crate::error::StoreError;

#[async_trait]
pub trait DossierStore: Send + Sync {
    /// The backend name (e.g., "memory", "file").
    fn name(&self) -> &str;

    /// Load a dossier if one exists for this id.
    async fn load(&self, id: &str) -> Result<Option<Dossier>, StoreError>;

    /// Persist a dossier snapshot, replacing any previous one.
    async fn save(&self, dossier: &Dossier) -> Result<(), StoreError>;

    /// Delete a dossier. Returns whether it existed.
    async fn reset(&self, id: &str) -> Result<bool, StoreError>;

    /// List known dossier ids.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Load the dossier, or start an empty one with this id.
    ///
    /// A fresh dossier is not saved until the end of its first turn.
    async fn get_or_create(&self, id: &str) -> Result<Dossier, StoreError> {
        Ok(self.load(id).await?.unwrap_or_else(|| Dossier::new(id)))
    }
}
