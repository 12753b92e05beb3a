mod recommend;
mod registry;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cartwise-cli")]
#[command(about = "Cartwise grocery decision engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Produce a purchasing plan from a structured request and raw catalogs.
    Recommend(recommend::RecommendArgs),
    /// Validate and list the store registry.
    Stores(registry::StoresArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cartwise_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Recommend(args) => recommend::run(args, config).await,
        Commands::Stores(args) => registry::run(&args, &config),
    }
}
