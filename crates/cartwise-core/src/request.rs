//! The structured shopping request consumed by the decision engine.
//!
//! Requests arrive from an upstream parser (structured JSON or natural
//! language — not this crate's concern) already broken into items,
//! restrictions, budget ceilings, and an optional store scope. Everything
//! here is immutable once constructed.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The closed set of dietary restrictions the engine understands.
///
/// Restriction checking is a fixed set of evaluators, one per variant —
/// unknown restriction names fail at the request boundary instead of being
/// silently skipped during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Restriction {
    Vegan,
    Vegetarian,
    GlutenFree,
    DairyFree,
    NutFree,
    Kosher,
    Halal,
    Organic,
    SugarFree,
}

impl Restriction {
    /// The storefront label spelling of this restriction, matched against
    /// a product's declared labels (e.g. `"gluten-free"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Restriction::Vegan => "vegan",
            Restriction::Vegetarian => "vegetarian",
            Restriction::GlutenFree => "gluten-free",
            Restriction::DairyFree => "dairy-free",
            Restriction::NutFree => "nut-free",
            Restriction::Kosher => "kosher",
            Restriction::Halal => "halal",
            Restriction::Organic => "organic",
            Restriction::SugarFree => "sugar-free",
        }
    }
}

impl std::fmt::Display for Restriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown dietary restriction: {0}")]
pub struct UnknownRestriction(pub String);

impl FromStr for Restriction {
    type Err = UnknownRestriction;

    /// Parses a restriction name. Underscores are accepted as dashes
    /// (`"gluten_free"` and `"gluten-free"` both parse) since upstream
    /// parsers emit either spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "vegan" => Ok(Restriction::Vegan),
            "vegetarian" => Ok(Restriction::Vegetarian),
            "gluten-free" => Ok(Restriction::GlutenFree),
            "dairy-free" => Ok(Restriction::DairyFree),
            "nut-free" => Ok(Restriction::NutFree),
            "kosher" => Ok(Restriction::Kosher),
            "halal" => Ok(Restriction::Halal),
            "organic" => Ok(Restriction::Organic),
            "sugar-free" => Ok(Restriction::SugarFree),
            _ => Err(UnknownRestriction(s.to_string())),
        }
    }
}

/// One requested line item: a free-text name plus restrictions that apply
/// to this item only (on top of the request-wide set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    pub name: String,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
}

impl RequestedItem {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            restrictions: Vec::new(),
        }
    }
}

/// Budget ceilings. `total` bounds the whole plan; `per_item` bounds each
/// individual match. Either or both may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub per_item: Option<Decimal>,
}

/// A full shopping request. Item order is significant: per-item results in
/// the final plan are reported in this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingRequest {
    /// Assigned by the host when the upstream request carries no id.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub items: Vec<RequestedItem>,
    /// Restrictions applying to every item in the request.
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    #[serde(default)]
    pub budget: Budget,
    /// Store slugs to consider; `None` means every supplied catalog.
    #[serde(default)]
    pub store_scope: Option<Vec<String>>,
}

impl ShoppingRequest {
    /// The restrictions in force for `item`: the request-wide set followed
    /// by per-item additions, deduplicated, in a stable order.
    #[must_use]
    pub fn effective_restrictions(&self, item: &RequestedItem) -> Vec<Restriction> {
        let mut out: Vec<Restriction> = Vec::new();
        for r in self.restrictions.iter().chain(item.restrictions.iter()) {
            if !out.contains(r) {
                out.push(*r);
            }
        }
        out
    }

    /// Whether `store_slug` falls inside the request's store scope.
    #[must_use]
    pub fn in_scope(&self, store_slug: &str) -> bool {
        match &self.store_scope {
            None => true,
            Some(scope) => scope.iter().any(|s| s == store_slug),
        }
    }
}
