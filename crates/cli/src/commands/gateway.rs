//! `tess gateway`: Start the HTTP API server.

use super::load_config;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("TESS Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Store:     {}", config.store.backend);

    tess_gateway::start(config).await?;

    Ok(())
}
