//! `tess tools`: List and validate the registered tools.

use super::{build_controller, load_config};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let controller = build_controller(&config)?;
    let registry = controller.engine().tools();

    println!("Registered tools ({}):", registry.len());
    for def in registry.definitions() {
        println!("  {:<22} {}", def.name, def.description);
    }
    println!();

    match registry.validate() {
        Ok(()) => println!("All tools valid."),
        Err(e) => {
            eprintln!("Tool validation failed: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
