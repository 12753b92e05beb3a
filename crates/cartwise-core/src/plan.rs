//! The final recommendation structure returned by the decision engine.
//!
//! Serialization follows the host API response shape: a `plan_type`
//! discriminant, per-store cost summary for every evaluated store, and a
//! per-item recommendations object whose keys preserve the request's item
//! order (hosts render items in the order the shopper asked for them).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use uuid::Uuid;

use crate::request::Restriction;
use crate::suitability::SuitabilityResult;

/// Why no plan could be produced. Carried inside the recommendation so the
/// per-store summary stays attached even to failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanFailure {
    /// At least one item has no suitable match in any store's catalog.
    Unsatisfiable { items: Vec<String> },
    /// Every item is matchable somewhere, but no single store covers the
    /// whole list and multi-store selection is disabled.
    NoSingleStoreCoverage,
    /// Plans exist but the cheapest exceeds the global budget ceiling.
    BudgetExceeded { cheapest: Decimal, budget: Decimal },
}

/// The chosen purchasing strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanOutcome {
    SingleStore {
        store: String,
        total: Decimal,
    },
    MultiStore {
        /// Item name → store slug, in request item order.
        assignments: Vec<(String, String)>,
        total: Decimal,
    },
    Failed(PlanFailure),
}

impl PlanOutcome {
    #[must_use]
    pub fn plan_type(&self) -> &'static str {
        match self {
            PlanOutcome::SingleStore { .. } => "single_store",
            PlanOutcome::MultiStore { .. } => "multi_store",
            PlanOutcome::Failed(_) => "unsatisfiable",
        }
    }

    /// The winning store for a single-store plan; `None` otherwise.
    #[must_use]
    pub fn best_store(&self) -> Option<&str> {
        match self {
            PlanOutcome::SingleStore { store, .. } => Some(store),
            _ => None,
        }
    }

    #[must_use]
    pub fn plan_total(&self) -> Option<Decimal> {
        match self {
            PlanOutcome::SingleStore { total, .. } | PlanOutcome::MultiStore { total, .. } => {
                Some(*total)
            }
            PlanOutcome::Failed(_) => None,
        }
    }
}

/// Cost summary for one evaluated store, winner or loser.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCostSummary {
    pub total: Decimal,
    pub complete: bool,
    pub catalog_partial: bool,
}

/// The product chosen for one item in the final plan.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenProduct {
    pub store: String,
    pub product_name: String,
    pub price: Decimal,
    pub is_suitable: bool,
    pub dietary: SuitabilityResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One item's entry in the final plan: either a chosen product or an
/// explicit absence (the plan failed, or the item is uncoverable).
#[derive(Debug, Clone)]
pub struct ItemRecommendation {
    pub item: String,
    pub choice: Option<ChosenProduct>,
}

/// The full engine output for one request.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub request_id: Uuid,
    pub outcome: PlanOutcome,
    /// Per-item results in request item order.
    pub recommendations: Vec<ItemRecommendation>,
    /// Cost summary for every evaluated store, not only the winner.
    pub store_totals: BTreeMap<String, StoreCostSummary>,
    /// Restrictions that were in force request-wide (echoed for hosts).
    pub restrictions: Vec<Restriction>,
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("request_id", &self.request_id)?;
        map.serialize_entry("plan_type", self.outcome.plan_type())?;
        map.serialize_entry("best_store", &self.outcome.best_store())?;
        map.serialize_entry("plan_total", &self.outcome.plan_total())?;
        map.serialize_entry("total_cost", &self.store_totals)?;
        map.serialize_entry("restrictions", &self.restrictions)?;
        map.serialize_entry(
            "recommendations",
            &OrderedRecommendations(&self.recommendations),
        )?;
        if let PlanOutcome::Failed(failure) = &self.outcome {
            map.serialize_entry("failure", failure)?;
        }
        map.end()
    }
}

/// Serializes item recommendations as a JSON object keyed by item name,
/// preserving request order (a `BTreeMap` would alphabetize).
struct OrderedRecommendations<'a>(&'a [ItemRecommendation]);

impl Serialize for OrderedRecommendations<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rec in self.0 {
            map.serialize_entry(&rec.item, &rec.choice)?;
        }
        map.end()
    }
}
