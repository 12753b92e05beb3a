//! Normalized product records, the engine's read-only catalog input.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A container size parsed from product metadata, e.g. `16oz` or `500ml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSize {
    pub value: f64,
    pub unit: String,
}

/// A product available at one store, normalized for comparison across
/// stores. Produced by an upstream acquisition collaborator; the engine
/// never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Slug of the store carrying this product.
    pub store: String,
    pub name: String,
    pub price: Decimal,
    /// ISO 4217 code; a single currency is assumed across one request.
    pub currency: String,
    /// Ordered ingredient list. Empty means the ingredients are unknown,
    /// NOT that the product contains nothing.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Declared labels, lowercased at normalization time
    /// (e.g. `"organic"`, `"gluten-free"`).
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Free-text allergen statement, when the store publishes one.
    #[serde(default)]
    pub allergen_statement: Option<String>,
    /// Link back to the product page.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: Option<UnitSize>,
}

impl ProductRecord {
    /// Case-insensitive declared-label lookup.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        let needle = label.to_lowercase();
        self.labels.iter().any(|l| l.to_lowercase() == needle)
    }

    /// Whether the ingredient list is present. An empty list means the
    /// upstream source had no ingredient data for this product.
    #[must_use]
    pub fn ingredients_known(&self) -> bool {
        !self.ingredients.is_empty()
    }
}
