//! Plan selection over the full, immutable collection of store baskets.
//!
//! Selection is a pure reduction: every basket is built first, then the
//! winner is chosen from the complete set. There is no running
//! "best store so far" state and no early exit, so partial-state bugs
//! cannot arise.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use cartwise_core::{PlanFailure, PlanOutcome, ShoppingRequest, StoreBasket};

/// Chooses the optimal purchasing strategy from aggregated baskets.
///
/// Single-store: the cheapest complete basket (ties broken by ascending
/// store slug). Multi-store (when enabled): per item, the cheapest match
/// across all baskets — a sum that is never more than any complete
/// basket's total. Multi-store wins only when strictly cheaper and within
/// the global budget; equal totals keep the single store (fewer trips).
///
/// Failure outcomes instead of a plan:
/// - an item matched nowhere → `Unsatisfiable` naming every such item;
/// - coverage exists only across stores while multi-store is disabled →
///   `NoSingleStoreCoverage`;
/// - plans exist but none fits the global ceiling → `BudgetExceeded`.
#[must_use]
pub fn select_plan(
    baskets: &BTreeMap<String, StoreBasket>,
    request: &ShoppingRequest,
    multi_store_enabled: bool,
) -> PlanOutcome {
    let uncovered = uncovered_items(baskets, request);
    if !uncovered.is_empty() {
        debug!(?uncovered, "request is unsatisfiable");
        return PlanOutcome::Failed(PlanFailure::Unsatisfiable { items: uncovered });
    }

    let single = cheapest_complete_basket(baskets);
    let multi = if multi_store_enabled {
        Some(cheapest_split(baskets, request))
    } else {
        None
    };

    let budget = request.budget.total;
    let within = |total: Decimal| budget.is_none_or(|ceiling| total <= ceiling);

    match (single, multi) {
        (Some((store, single_total)), Some((assignments, multi_total))) => {
            if within(multi_total) && (multi_total < single_total || !within(single_total)) {
                PlanOutcome::MultiStore {
                    assignments,
                    total: multi_total,
                }
            } else if within(single_total) {
                PlanOutcome::SingleStore {
                    store,
                    total: single_total,
                }
            } else {
                budget_exceeded(multi_total.min(single_total), budget)
            }
        }
        (Some((store, single_total)), None) => {
            if within(single_total) {
                PlanOutcome::SingleStore {
                    store,
                    total: single_total,
                }
            } else {
                budget_exceeded(single_total, budget)
            }
        }
        (None, Some((assignments, multi_total))) => {
            if within(multi_total) {
                PlanOutcome::MultiStore {
                    assignments,
                    total: multi_total,
                }
            } else {
                budget_exceeded(multi_total, budget)
            }
        }
        (None, None) => PlanOutcome::Failed(PlanFailure::NoSingleStoreCoverage),
    }
}

/// Items with no match in any basket. Order follows the request.
fn uncovered_items(baskets: &BTreeMap<String, StoreBasket>, request: &ShoppingRequest) -> Vec<String> {
    request
        .items
        .iter()
        .filter(|item| {
            !baskets.values().any(|basket| {
                basket
                    .match_for(&item.name)
                    .is_some_and(|m| m.outcome.matched().is_some())
            })
        })
        .map(|item| item.name.clone())
        .collect()
}

/// The cheapest complete basket, ties broken by ascending slug (the
/// `BTreeMap` iterates slugs in order, and strict comparison keeps the
/// first seen).
fn cheapest_complete_basket(baskets: &BTreeMap<String, StoreBasket>) -> Option<(String, Decimal)> {
    let mut best: Option<(String, Decimal)> = None;
    for basket in baskets.values().filter(|b| b.complete) {
        let better = match &best {
            None => true,
            Some((_, best_total)) => basket.total < *best_total,
        };
        if better {
            best = Some((basket.store.clone(), basket.total));
        }
    }
    best
}

/// Per item, the cheapest match across all baskets (ties broken by
/// ascending slug via map iteration order). Callers have already ruled
/// out uncovered items, so every item finds an offer.
fn cheapest_split(
    baskets: &BTreeMap<String, StoreBasket>,
    request: &ShoppingRequest,
) -> (Vec<(String, String)>, Decimal) {
    let mut assignments = Vec::with_capacity(request.items.len());
    let mut total = Decimal::ZERO;

    for item in &request.items {
        let mut best: Option<(&str, Decimal)> = None;
        for basket in baskets.values() {
            let Some(price) = basket.match_for(&item.name).and_then(|m| m.outcome.price())
            else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((_, best_price)) => price < *best_price,
            };
            if better {
                best = Some((basket.store.as_str(), price));
            }
        }
        if let Some((store, price)) = best {
            assignments.push((item.name.clone(), store.to_string()));
            total += price;
        }
    }

    (assignments, total)
}

fn budget_exceeded(cheapest: Decimal, budget: Option<Decimal>) -> PlanOutcome {
    // `within` only fails when a ceiling is set.
    let ceiling = budget.unwrap_or(Decimal::ZERO);
    PlanOutcome::Failed(PlanFailure::BudgetExceeded {
        cheapest,
        budget: ceiling,
    })
}
