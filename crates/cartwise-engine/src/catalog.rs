//! Normalization from raw upstream records to [`cartwise_core::ProductRecord`].
//!
//! Upstream acquisition collaborators hand over lenient JSON shapes; this
//! module validates each record and converts it, dropping (and counting)
//! anything malformed. A dropped record is a per-record soft failure, never
//! a crash — the store's catalog is simply marked partial.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use cartwise_core::{ProductRecord, UnitSize};

use crate::error::CatalogError;

/// A product record as emitted by an upstream store collaborator, before
/// validation. Price arrives as a decimal string exactly as scraped;
/// collections default to empty when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProductRecord {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub allergen_statement: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One store's normalized catalog plus acquisition metadata.
#[derive(Debug, Clone)]
pub struct StoreCatalog {
    /// Store slug this catalog belongs to.
    pub store: String,
    pub products: Vec<ProductRecord>,
    /// Count of malformed records excluded during normalization.
    pub dropped_records: usize,
    pub fetched_at: DateTime<Utc>,
}

impl StoreCatalog {
    /// A catalog built from already-normalized records (nothing dropped).
    #[must_use]
    pub fn new(store: impl Into<String>, products: Vec<ProductRecord>) -> Self {
        Self {
            store: store.into(),
            products,
            dropped_records: 0,
            fetched_at: Utc::now(),
        }
    }

    /// True when normalization dropped records, so matching against this
    /// catalog may understate what the store carries.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.dropped_records > 0
    }
}

/// Normalizes a raw record into a [`ProductRecord`].
///
/// # Errors
///
/// Returns [`CatalogError::Normalization`] when the name is empty or the
/// price is missing, unparseable, or non-positive.
pub fn normalize_record(
    raw: RawProductRecord,
    store_slug: &str,
) -> Result<ProductRecord, CatalogError> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Normalization {
            name: raw.name,
            reason: "product has no name".into(),
        });
    }

    let price_str = raw.price.ok_or_else(|| CatalogError::Normalization {
        name: name.clone(),
        reason: "record has no price".into(),
    })?;
    let price: Decimal = price_str
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| CatalogError::Normalization {
            name: name.clone(),
            reason: format!("unparseable price \"{price_str}\""),
        })?;
    if price <= Decimal::ZERO {
        return Err(CatalogError::Normalization {
            name,
            reason: format!("non-positive price {price}"),
        });
    }

    let size = parse_size(&name);

    Ok(ProductRecord {
        store: store_slug.to_string(),
        name,
        price,
        currency: raw.currency.unwrap_or_else(|| "USD".to_string()),
        ingredients: raw.ingredients,
        labels: raw
            .labels
            .into_iter()
            .map(|l| l.to_lowercase())
            .collect::<BTreeSet<_>>(),
        allergen_statement: raw.allergen_statement.filter(|s| !s.is_empty()),
        url: raw.url.filter(|s| !s.is_empty()),
        size,
    })
}

/// Normalizes a whole raw catalog for one store. Malformed records are
/// dropped and counted; the result is always usable.
#[must_use]
pub fn normalize_catalog(store_slug: &str, raw_records: Vec<RawProductRecord>) -> StoreCatalog {
    let mut products = Vec::with_capacity(raw_records.len());
    let mut dropped = 0usize;

    for raw in raw_records {
        match normalize_record(raw, store_slug) {
            Ok(product) => products.push(product),
            Err(e) => {
                warn!(store = store_slug, error = %e, "dropping malformed catalog record");
                dropped += 1;
            }
        }
    }

    StoreCatalog {
        store: store_slug.to_string(),
        products,
        dropped_records: dropped,
        fetched_at: Utc::now(),
    }
}

/// Attempts to parse a container size from a product name.
///
/// Recognizes a number (integer or decimal) optionally separated by a
/// space from one of the common grocery units: `oz`, `lb`, `gal`, `ml`,
/// `kg`, `g`, `l`. Unit order matters (`gal` before `g`, `ml`/`kg`
/// before `l`/`g`) so prefixes are not claimed by shorter units.
#[must_use]
pub(crate) fn parse_size(name: &str) -> Option<UnitSize> {
    let lower = name.to_lowercase();
    ["oz", "lb", "gal", "ml", "kg", "g", "l"]
        .iter()
        .find_map(|unit| parse_size_unit(&lower, unit))
}

/// Parses a size value followed by `unit`. Input must be pre-lowercased.
fn parse_size_unit(lower: &str, unit: &str) -> Option<UnitSize> {
    let bytes = lower.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    while i < len {
        if bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit())
        {
            let num_start = i;
            let mut has_dot = false;
            while i < len && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !has_dot)) {
                if bytes[i] == b'.' {
                    has_dot = true;
                }
                i += 1;
            }
            let num_str = &lower[num_start..i];

            let mut scan = i;
            while scan < len && bytes[scan] == b' ' {
                scan += 1;
            }

            if let Some(rest) = lower[scan..].strip_prefix(unit) {
                // Require a word boundary after the unit so "g" does not
                // claim "grain" or "l" claim "lemon".
                let at_boundary = rest
                    .chars()
                    .next()
                    .is_none_or(|c| !c.is_ascii_alphanumeric());
                if at_boundary {
                    if let Ok(value) = num_str.parse::<f64>() {
                        return Some(UnitSize {
                            value,
                            unit: unit.to_owned(),
                        });
                    }
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw(name: &str, price: Option<&str>) -> RawProductRecord {
        RawProductRecord {
            name: name.to_string(),
            price: price.map(str::to_string),
            currency: None,
            ingredients: vec![],
            labels: vec![],
            allergen_statement: None,
            url: None,
        }
    }

    // -----------------------------------------------------------------------
    // normalize_record
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_record_parses_price_string() {
        let product = normalize_record(make_raw("Brown Rice", Some("3.99")), "walmart").unwrap();
        assert_eq!(product.price, Decimal::new(399, 2));
        assert_eq!(product.store, "walmart");
        assert_eq!(product.currency, "USD");
    }

    #[test]
    fn normalize_record_strips_dollar_sign() {
        let product = normalize_record(make_raw("Brown Rice", Some("$3.99")), "walmart").unwrap();
        assert_eq!(product.price, Decimal::new(399, 2));
    }

    #[test]
    fn normalize_record_missing_price_is_error() {
        let err = normalize_record(make_raw("Brown Rice", None), "walmart").unwrap_err();
        assert!(err.to_string().contains("no price"));
    }

    #[test]
    fn normalize_record_unparseable_price_is_error() {
        let err = normalize_record(make_raw("Brown Rice", Some("cheap")), "walmart").unwrap_err();
        assert!(err.to_string().contains("unparseable price"));
    }

    #[test]
    fn normalize_record_zero_price_is_error() {
        let err = normalize_record(make_raw("Brown Rice", Some("0.00")), "walmart").unwrap_err();
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn normalize_record_empty_name_is_error() {
        let err = normalize_record(make_raw("  ", Some("3.99")), "walmart").unwrap_err();
        assert!(err.to_string().contains("no name"));
    }

    #[test]
    fn normalize_record_lowercases_labels() {
        let mut raw = make_raw("Rice", Some("3.99"));
        raw.labels = vec!["Gluten-Free".to_string(), "ORGANIC".to_string()];
        let product = normalize_record(raw, "walmart").unwrap();
        assert!(product.labels.contains("gluten-free"));
        assert!(product.labels.contains("organic"));
    }

    #[test]
    fn normalize_record_empty_allergen_statement_becomes_none() {
        let mut raw = make_raw("Rice", Some("3.99"));
        raw.allergen_statement = Some(String::new());
        let product = normalize_record(raw, "walmart").unwrap();
        assert!(product.allergen_statement.is_none());
    }

    #[test]
    fn normalize_record_parses_size_from_name() {
        let product =
            normalize_record(make_raw("Brown Rice 32oz", Some("3.99")), "walmart").unwrap();
        let size = product.size.expect("expected a parsed size");
        assert_eq!(size.value, 32.0);
        assert_eq!(size.unit, "oz");
    }

    // -----------------------------------------------------------------------
    // normalize_catalog
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_catalog_keeps_good_drops_bad() {
        let catalog = normalize_catalog(
            "walmart",
            vec![
                make_raw("Brown Rice", Some("3.99")),
                make_raw("Broken Record", None),
                make_raw("Sourdough", Some("4.50")),
            ],
        );
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.dropped_records, 1);
        assert!(catalog.is_partial());
    }

    #[test]
    fn normalize_catalog_clean_input_not_partial() {
        let catalog = normalize_catalog("walmart", vec![make_raw("Brown Rice", Some("3.99"))]);
        assert_eq!(catalog.dropped_records, 0);
        assert!(!catalog.is_partial());
    }

    // -----------------------------------------------------------------------
    // parse_size
    // -----------------------------------------------------------------------

    #[test]
    fn size_oz_no_space() {
        assert_eq!(
            parse_size("Brown Rice 32oz"),
            Some(UnitSize {
                value: 32.0,
                unit: "oz".to_owned()
            })
        );
    }

    #[test]
    fn size_oz_with_space() {
        assert_eq!(
            parse_size("Brown Rice 32 oz"),
            Some(UnitSize {
                value: 32.0,
                unit: "oz".to_owned()
            })
        );
    }

    #[test]
    fn size_decimal_value() {
        assert_eq!(
            parse_size("Olive Oil 8.5oz"),
            Some(UnitSize {
                value: 8.5,
                unit: "oz".to_owned()
            })
        );
    }

    #[test]
    fn size_gal_not_claimed_by_g() {
        assert_eq!(
            parse_size("Whole Milk 1 gal"),
            Some(UnitSize {
                value: 1.0,
                unit: "gal".to_owned()
            })
        );
    }

    #[test]
    fn size_ml_not_claimed_by_l() {
        assert_eq!(
            parse_size("Sparkling Water 500ml"),
            Some(UnitSize {
                value: 500.0,
                unit: "ml".to_owned()
            })
        );
    }

    #[test]
    fn size_grams() {
        assert_eq!(
            parse_size("Flour 500g"),
            Some(UnitSize {
                value: 500.0,
                unit: "g".to_owned()
            })
        );
    }

    #[test]
    fn size_unit_requires_word_boundary() {
        assert!(parse_size("7 Grain Bread").is_none());
    }

    #[test]
    fn size_not_present_returns_none() {
        assert!(parse_size("Brown Rice").is_none());
    }
}
