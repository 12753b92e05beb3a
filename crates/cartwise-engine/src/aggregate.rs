//! Per-store basket aggregation.
//!
//! Each store's basket is computed independently, so stores fan out onto
//! bounded concurrent workers and the results merge into an ordered map
//! afterward. Nothing mutable is shared during matching; merge order never
//! affects output because baskets are keyed by slug and per-item order
//! follows the request.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tracing::debug;

use cartwise_core::{ItemMatch, MatchFailure, MatchOutcome, ShoppingRequest, StoreBasket};
use cartwise_diet::UnknownPolicy;

use crate::catalog::StoreCatalog;
use crate::matcher::match_item;

/// Builds one basket per in-scope store, matching every requested item
/// against that store's catalog slice.
///
/// Per-item budget ceilings are enforced here: a match priced above the
/// ceiling is recorded as `NoMatch { OverBudget }` for that store. Since
/// the matcher already picks the cheapest suitable candidate, a ceiling
/// violation means no candidate at that store fits.
pub async fn aggregate(
    request: &ShoppingRequest,
    catalogs_by_store: &BTreeMap<String, StoreCatalog>,
    policy: &UnknownPolicy,
    max_concurrent: usize,
) -> BTreeMap<String, StoreBasket> {
    let in_scope: Vec<&StoreCatalog> = catalogs_by_store
        .values()
        .filter(|catalog| request.in_scope(&catalog.store))
        .collect();

    let baskets: Vec<StoreBasket> = stream::iter(in_scope)
        .map(|catalog| async move { build_basket(request, catalog, policy) })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    baskets
        .into_iter()
        .map(|basket| (basket.store.clone(), basket))
        .collect()
}

/// Matches every requested item against one store's catalog, in request
/// item order.
fn build_basket(
    request: &ShoppingRequest,
    catalog: &StoreCatalog,
    policy: &UnknownPolicy,
) -> StoreBasket {
    let matches: Vec<ItemMatch> = request
        .items
        .iter()
        .map(|item| {
            let restrictions = request.effective_restrictions(item);
            let matched = match_item(&item.name, &restrictions, &catalog.products, policy);
            apply_item_ceiling(matched, request)
        })
        .collect();

    let basket = StoreBasket::from_matches(catalog.store.clone(), matches, catalog.is_partial());
    debug!(
        store = %basket.store,
        total = %basket.total,
        complete = basket.complete,
        "aggregated store basket"
    );
    basket
}

/// Demotes a match above the per-item budget ceiling to an explicit
/// `OverBudget` absence.
fn apply_item_ceiling(matched: ItemMatch, request: &ShoppingRequest) -> ItemMatch {
    let Some(ceiling) = request.budget.per_item else {
        return matched;
    };
    match matched.outcome.price() {
        Some(price) if price > ceiling => ItemMatch {
            item: matched.item,
            outcome: MatchOutcome::NoMatch {
                reason: MatchFailure::OverBudget,
            },
        },
        _ => matched,
    }
}
