use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::error::ConfigError;
use crate::request::Restriction;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any `CARTWISE_*` value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any `CARTWISE_*` value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got '{other}'"),
            }),
        }
    };

    let log_level = or_default("CARTWISE_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default("CARTWISE_STORES_PATH", "./config/stores.yaml"));
    let multi_store_enabled = parse_bool("CARTWISE_MULTI_STORE", "false")?;
    let assume_raw = or_default("CARTWISE_ASSUME_SATISFIED_WHEN_UNKNOWN", "");
    let assume_satisfied_when_unknown =
        parse_restrictions("CARTWISE_ASSUME_SATISFIED_WHEN_UNKNOWN", &assume_raw)?;
    let catalog_ttl_secs = parse_u64("CARTWISE_CATALOG_TTL_SECS", "900")?;
    let catalog_cache_capacity = parse_usize("CARTWISE_CATALOG_CACHE_CAPACITY", "64")?;
    let max_concurrent_stores = parse_usize("CARTWISE_MAX_CONCURRENT_STORES", "4")?;

    Ok(AppConfig {
        log_level,
        stores_path,
        multi_store_enabled,
        assume_satisfied_when_unknown,
        catalog_ttl_secs,
        catalog_cache_capacity,
        max_concurrent_stores,
    })
}

/// Parse a comma-separated restriction list (e.g. `"organic,halal"`).
/// Empty input yields an empty set.
fn parse_restrictions(var: &str, raw: &str) -> Result<BTreeSet<Restriction>, ConfigError> {
    let mut out = BTreeSet::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let restriction = part
            .parse::<Restriction>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        out.insert(restriction);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_all_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.stores_path.to_string_lossy(), "./config/stores.yaml");
        assert!(!cfg.multi_store_enabled);
        assert!(cfg.assume_satisfied_when_unknown.is_empty());
        assert_eq!(cfg.catalog_ttl_secs, 900);
        assert_eq!(cfg.catalog_cache_capacity, 64);
        assert_eq!(cfg.max_concurrent_stores, 4);
    }

    #[test]
    fn multi_store_override() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_MULTI_STORE", "true");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.multi_store_enabled);
    }

    #[test]
    fn multi_store_accepts_numeric_flags() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_MULTI_STORE", "1");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.multi_store_enabled);
    }

    #[test]
    fn multi_store_invalid_value() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_MULTI_STORE", "yes");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTWISE_MULTI_STORE"),
            "expected InvalidEnvVar(CARTWISE_MULTI_STORE), got: {result:?}"
        );
    }

    #[test]
    fn assume_satisfied_parses_comma_list() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_ASSUME_SATISFIED_WHEN_UNKNOWN", "organic, halal");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg
            .assume_satisfied_when_unknown
            .contains(&Restriction::Organic));
        assert!(cfg
            .assume_satisfied_when_unknown
            .contains(&Restriction::Halal));
        assert_eq!(cfg.assume_satisfied_when_unknown.len(), 2);
    }

    #[test]
    fn assume_satisfied_rejects_unknown_restriction() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_ASSUME_SATISFIED_WHEN_UNKNOWN", "keto");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTWISE_ASSUME_SATISFIED_WHEN_UNKNOWN"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn catalog_ttl_secs_override() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_CATALOG_TTL_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.catalog_ttl_secs, 60);
    }

    #[test]
    fn catalog_ttl_secs_invalid() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_CATALOG_TTL_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTWISE_CATALOG_TTL_SECS"),
            "expected InvalidEnvVar(CARTWISE_CATALOG_TTL_SECS), got: {result:?}"
        );
    }

    #[test]
    fn max_concurrent_stores_override() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_MAX_CONCURRENT_STORES", "8");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_concurrent_stores, 8);
    }
}
