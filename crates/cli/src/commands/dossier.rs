//! `tess dossier`: Inspect and reset stored dossiers.

use tess_core::DossierStore;

use super::{build_controller, load_config};

fn store() -> Result<std::sync::Arc<dyn DossierStore>, Box<dyn std::error::Error>> {
    let config = load_config()?;
    Ok(tess_store::build_from_config(&config.store))
}

pub async fn show(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = store()?;
    match store.load(id).await? {
        Some(dossier) => {
            println!("{}", serde_json::to_string_pretty(&dossier)?);
            Ok(())
        }
        None => Err(format!("No dossier named {id}").into()),
    }
}

pub async fn reset(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let controller = build_controller(&load_config()?)?;
    if controller.reset(id).await? {
        println!("Dossier {id} deleted.");
    } else {
        println!("No dossier named {id}.");
    }
    Ok(())
}

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let store = store()?;
    let ids = store.list().await?;

    println!("Dossiers ({}, {} store):", ids.len(), store.name());
    for id in ids {
        match store.load(&id).await? {
            Some(dossier) => println!(
                "  {id}  {} sources ({} selected), {} messages",
                dossier.titles().len(),
                dossier.selected_titles().len(),
                dossier.conversation.len()
            ),
            None => println!("  {id}"),
        }
    }
    Ok(())
}
