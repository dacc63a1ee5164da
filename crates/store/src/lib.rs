//! Dossier store implementations for TESS.

pub mod file_backend;
pub mod in_memory;
pub mod locks;

use std::sync::Arc;

pub use file_backend::FileStore;
pub use in_memory::InMemoryStore;
pub use locks::DossierLocks;

use tess_core::DossierStore;

/// Build the store named by `store.backend`.
pub fn build_from_config(config: &tess_config::StoreConfig) -> Arc<dyn DossierStore> {
    match config.backend.as_str() {
        "memory" => Arc::new(InMemoryStore::new()),
        _ => Arc::new(FileStore::new(config.resolved_path())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_selection() {
        let memory = tess_config::StoreConfig {
            backend: "memory".into(),
            path: None,
        };
        assert_eq!(build_from_config(&memory).name(), "memory");

        let file = tess_config::StoreConfig {
            backend: "file".into(),
            path: Some("/tmp/tess-dossiers".into()),
        };
        assert_eq!(build_from_config(&file).name(), "file");
    }
}
