//! Per-item match results and per-store baskets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::ProductRecord;
use crate::suitability::SuitabilityResult;

/// Why an item could not be matched at a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFailure {
    /// Nothing in the catalog was relevant to the item name.
    NoRelevantProduct,
    /// Relevant candidates existed but none passed dietary filtering.
    DietaryMismatch,
    /// The best suitable match exceeded the per-item budget ceiling.
    OverBudget,
}

/// The result of matching one requested item against one store's catalog.
/// Absence is always explicit — an unmatched item carries its reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        product: ProductRecord,
        suitability: SuitabilityResult,
    },
    NoMatch {
        reason: MatchFailure,
    },
}

impl MatchOutcome {
    #[must_use]
    pub fn matched(&self) -> Option<(&ProductRecord, &SuitabilityResult)> {
        match self {
            MatchOutcome::Matched {
                product,
                suitability,
            } => Some((product, suitability)),
            MatchOutcome::NoMatch { .. } => None,
        }
    }

    /// Price of the matched product, if any.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.matched().map(|(p, _)| p.price)
    }
}

/// One requested item's match at one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMatch {
    pub item: String,
    pub outcome: MatchOutcome,
}

/// All of one store's matches for a request, in request item order, with
/// the derived total and completeness flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreBasket {
    pub store: String,
    pub matches: Vec<ItemMatch>,
    /// Sum of matched item prices. Unmatched items contribute nothing but
    /// mark the basket incomplete.
    pub total: Decimal,
    /// True iff every requested item has a match at this store.
    pub complete: bool,
    /// True when malformed records were dropped from this store's catalog,
    /// so the basket may understate what the store carries.
    pub catalog_partial: bool,
}

impl StoreBasket {
    /// Builds a basket from per-item matches, deriving `total` and
    /// `complete`.
    #[must_use]
    pub fn from_matches(
        store: impl Into<String>,
        matches: Vec<ItemMatch>,
        catalog_partial: bool,
    ) -> Self {
        let total = matches
            .iter()
            .filter_map(|m| m.outcome.price())
            .sum::<Decimal>();
        let complete = matches.iter().all(|m| m.outcome.matched().is_some());
        Self {
            store: store.into(),
            matches,
            total,
            complete,
            catalog_partial,
        }
    }

    /// Looks up this store's match for a given item name.
    #[must_use]
    pub fn match_for(&self, item: &str) -> Option<&ItemMatch> {
        self.matches.iter().find(|m| m.item == item)
    }
}
