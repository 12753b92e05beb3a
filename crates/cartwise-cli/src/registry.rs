//! The `stores` subcommand: validate the registry and list its entries.

use std::path::PathBuf;

use clap::Args;

use cartwise_core::AppConfig;

#[derive(Debug, Args)]
pub struct StoresArgs {
    /// Store registry YAML; defaults to the configured path.
    #[arg(long)]
    stores: Option<PathBuf>,
}

pub fn run(args: &StoresArgs, config: &AppConfig) -> anyhow::Result<()> {
    let path = args.stores.as_ref().unwrap_or(&config.stores_path);
    let stores_file = cartwise_core::load_stores(path)?;

    println!("{} stores in {}", stores_file.stores.len(), path.display());
    for store in &stores_file.stores {
        let location = store.location.as_deref().unwrap_or("-");
        println!("{:<20} {:<24} {location}", store.slug(), store.name);
    }
    Ok(())
}
