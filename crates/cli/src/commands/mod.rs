pub mod chat;
pub mod dossier;
pub mod gateway;
pub mod init;
pub mod tools;

use std::sync::Arc;

use tess_agent::TurnController;
use tess_config::AppConfig;
use tess_core::event::EventBus;

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Provider, store, and controller wired from config.
pub fn build_controller(config: &AppConfig) -> Result<TurnController, Box<dyn std::error::Error>> {
    let provider = tess_providers::build_from_config(config)
        .default()
        .ok_or("No default provider configured")?;
    let store = tess_store::build_from_config(&config.store);
    Ok(TurnController::from_config(
        config,
        provider,
        store,
        Arc::new(EventBus::default()),
    ))
}
