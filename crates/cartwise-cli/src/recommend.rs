//! The `recommend` subcommand: structured request + raw catalogs in,
//! recommendation report JSON on stdout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::de::DeserializeOwned;
use tracing::warn;

use cartwise_core::{AppConfig, ShoppingRequest};
use cartwise_engine::{normalize_catalog, Engine, RawProductRecord, StoreCatalog};

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Path to the structured shopping request (JSON).
    #[arg(long)]
    request: PathBuf,

    /// Path to raw catalogs keyed by store slug (JSON).
    #[arg(long)]
    catalogs: PathBuf,

    /// Store registry YAML; when given, catalog entries for unknown
    /// stores are skipped.
    #[arg(long)]
    stores: Option<PathBuf>,

    /// Allow a multi-store split plan, overriding configuration.
    #[arg(long)]
    multi_store: bool,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

pub async fn run(args: RecommendArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if args.multi_store {
        config.multi_store_enabled = true;
    }

    let request: ShoppingRequest = read_json(&args.request)
        .with_context(|| format!("reading shopping request from {}", args.request.display()))?;
    let raw_catalogs: BTreeMap<String, Vec<RawProductRecord>> = read_json(&args.catalogs)
        .with_context(|| format!("reading catalogs from {}", args.catalogs.display()))?;

    let known_slugs = match &args.stores {
        Some(path) => {
            let stores_file = cartwise_core::load_stores(path)?;
            Some(
                stores_file
                    .stores
                    .iter()
                    .map(cartwise_core::StoreConfig::slug)
                    .collect::<std::collections::BTreeSet<_>>(),
            )
        }
        None => None,
    };

    let catalogs: BTreeMap<String, StoreCatalog> = raw_catalogs
        .into_iter()
        .filter(|(slug, _)| match &known_slugs {
            Some(known) if !known.contains(slug) => {
                warn!(store = %slug, "skipping catalog for store not in registry");
                false
            }
            _ => true,
        })
        .map(|(slug, records)| {
            let catalog = normalize_catalog(&slug, records);
            (slug, catalog)
        })
        .collect();

    let engine = Engine::new(config);
    let report = engine.recommend(&request, catalogs).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    if let cartwise_core::PlanOutcome::Failed(failure) = &report.outcome {
        warn!(?failure, "no viable purchasing plan");
        anyhow::bail!("no viable purchasing plan");
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
