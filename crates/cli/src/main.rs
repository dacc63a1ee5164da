//! TESS CLI: the main entry point.
//!
//! Commands:
//! - `init`    : Write the default config
//! - `chat`    : Interactive chat or single-message mode
//! - `gateway` : Start the HTTP API server
//! - `dossier` : Inspect, list, or reset stored dossiers
//! - `tools`   : List and validate the registered tools

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tess",
    about = "TESS — dossier-based Dutch tax assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration to ~/.tess/config.toml
    Init,

    /// Chat with the assistant
    Chat {
        /// Continue an existing dossier
        #[arg(short, long)]
        dossier: Option<String>,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage stored dossiers
    Dossier {
        #[command(subcommand)]
        action: DossierAction,
    },

    /// List and validate the registered tools
    Tools,
}

#[derive(Subcommand)]
enum DossierAction {
    /// Print a dossier snapshot
    Show { id: String },
    /// Delete a dossier
    Reset { id: String },
    /// List stored dossier ids
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat { dossier, message } => commands::chat::run(dossier, message).await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Dossier { action } => match action {
            DossierAction::Show { id } => commands::dossier::show(&id).await?,
            DossierAction::Reset { id } => commands::dossier::reset(&id).await?,
            DossierAction::List => commands::dossier::list().await?,
        },
        Commands::Tools => commands::tools::run().await?,
    }

    Ok(())
}
