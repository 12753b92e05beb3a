use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::request::Restriction;

/// Engine and host configuration, loaded from `CARTWISE_*` environment
/// variables. Every knob has a default; see [`crate::config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Path to the store registry YAML.
    pub stores_path: PathBuf,
    /// Whether the plan selector may propose a multi-store split.
    /// Disabled by default: fewer trips is the conservative choice, and
    /// travel cost is not modeled.
    pub multi_store_enabled: bool,
    /// Restrictions treated as satisfied when product data cannot confirm
    /// them. Empty by default — unknown never counts as suitable unless a
    /// restriction is listed here.
    pub assume_satisfied_when_unknown: BTreeSet<Restriction>,
    /// Seconds a cached store catalog stays fresh.
    pub catalog_ttl_secs: u64,
    /// Maximum number of store catalogs the cache retains.
    pub catalog_cache_capacity: usize,
    /// Bound on concurrent per-store aggregation workers.
    pub max_concurrent_stores: usize,
}
