//! Per-dossier mutual exclusion.
//!
//! Two turns on the same dossier id would both load the same snapshot and
//! the later save would drop the earlier turn's changes. Holding the guard
//! from load to save serializes them; turns on different ids run freely.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct DossierLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DossierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Forget entries nobody holds or waits on.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of ids currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
