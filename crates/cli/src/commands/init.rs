//! `tess init`: First-time setup.

use tess_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let dossier_dir = AppConfig::default().store.resolved_path();

    println!("TESS — First-Time Setup");
    println!("=======================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("Config directory exists: {}", config_dir.display());
    }

    if !dossier_dir.exists() {
        std::fs::create_dir_all(&dossier_dir)?;
        println!("Created dossier directory: {}", dossier_dir.display());
    }

    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("Edit it manually or delete it and re-run init.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        println!("  1. Set TESS_API_KEY or OPENAI_API_KEY, or add api_key to the config");
        println!("  2. Run: tess chat");
        println!("  3. Ask your tax question\n");
    }

    Ok(())
}
