//! `tess chat`: Interactive or single-message chat mode.

use std::io::Write;

use tess_config::AppConfig;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use super::{build_controller, load_config};

pub async fn run(
    dossier: Option<String>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    // Check for API key early: give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    TESS_API_KEY        (generic)");
        eprintln!("    OPENAI_API_KEY      (for OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY  (for OpenRouter)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let controller = build_controller(&config)?;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = controller.handle(dossier.as_deref(), &msg).await?;
        eprint!("\r              \r");
        println!("{}", reply.text);
        eprintln!("  (dossier: {})", reply.dossier_id);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  TESS — Interactive Mode");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Store:     {}", controller.store().name());
    if let Some(id) = &dossier {
        println!("  Dossier:   {id}");
    }
    println!();
    println!("  Type your question and press Enter.");
    println!("  Commands: /bronnen, /reset, /help. Type 'exit' to quit.");
    println!();

    let mut dossier_id = dossier;
    let mut lines = BufReader::new(io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }
        if input.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        eprint!("  ...");
        match controller.handle(dossier_id.as_deref(), input).await {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                for line in reply.text.lines() {
                    println!("  TESS > {line}");
                }
                println!();
                if dossier_id.is_none() {
                    println!("  (dossier: {})", reply.dossier_id);
                    println!();
                }
                dossier_id = Some(reply.dossier_id);
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Tot ziens!");
    println!();

    Ok(())
}
