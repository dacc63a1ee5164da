//! In-memory store: useful for testing and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tess_core::error::StoreError;
use tess_core::{Dossier, DossierStore};
use tokio::sync::RwLock;

/// Keeps dossier snapshots in a map keyed by dossier id.
/// Nothing survives a restart.
pub struct InMemoryStore {
    dossiers: Arc<RwLock<HashMap<String, Dossier>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            dossiers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DossierStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, id: &str) -> Result<Option<Dossier>, StoreError> {
        Ok(self.dossiers.read().await.get(id).cloned())
    }

    async fn save(&self, dossier: &Dossier) -> Result<(), StoreError> {
        self.dossiers
            .write()
            .await
            .insert(dossier.id.as_str().to_string(), dossier.clone());
        Ok(())
    }

    async fn reset(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.dossiers.write().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.dossiers.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
