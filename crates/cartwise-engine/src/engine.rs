//! The decision engine facade: aggregate, select, report.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use cartwise_core::{
    AppConfig, ChosenProduct, ItemRecommendation, PlanOutcome, Recommendation, ShoppingRequest,
    StoreBasket, StoreCostSummary,
};
use cartwise_diet::UnknownPolicy;

use crate::aggregate::aggregate;
use crate::cache::CatalogCache;
use crate::catalog::StoreCatalog;
use crate::error::EngineError;
use crate::select::select_plan;

/// Orchestrates the full recommendation flow for one request. Holds no
/// per-request state; the optional catalog cache is the only resource
/// shared across invocations.
pub struct Engine {
    config: AppConfig,
    policy: UnknownPolicy,
    cache: Option<Arc<CatalogCache>>,
}

impl Engine {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let policy = UnknownPolicy::from_config(&config);
        Self {
            config,
            policy,
            cache: None,
        }
    }

    /// An engine backed by a shared catalog cache. Stores missing from a
    /// request's catalog mapping are filled from fresh cache entries, so
    /// hosts may pass partial mappings when only some fetches succeeded.
    #[must_use]
    pub fn with_cache(config: AppConfig, cache: Arc<CatalogCache>) -> Self {
        let policy = UnknownPolicy::from_config(&config);
        Self {
            config,
            policy,
            cache: Some(cache),
        }
    }

    /// Produces a recommendation for `request` over the supplied catalogs.
    ///
    /// Pure orchestration: no I/O, deterministic for fixed inputs. The
    /// result carries the per-store cost summary for every evaluated
    /// store, winners and losers alike. Plan-level failures
    /// (unsatisfiable items, budget exhaustion) are reported inside the
    /// recommendation, not as errors.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyRequest`] when the request has no items.
    pub async fn recommend(
        &self,
        request: &ShoppingRequest,
        catalogs_by_store: BTreeMap<String, StoreCatalog>,
    ) -> Result<Recommendation, EngineError> {
        if request.items.is_empty() {
            return Err(EngineError::EmptyRequest);
        }

        let catalogs = self.merge_with_cache(catalogs_by_store);
        info!(
            request_id = %request.id,
            items = request.items.len(),
            stores = catalogs.len(),
            "running recommendation"
        );

        let baskets = aggregate(
            request,
            &catalogs,
            &self.policy,
            self.config.max_concurrent_stores,
        )
        .await;

        let outcome = select_plan(&baskets, request, self.config.multi_store_enabled);
        info!(
            request_id = %request.id,
            plan_type = outcome.plan_type(),
            "recommendation complete"
        );

        let recommendations = build_recommendations(request, &outcome, &baskets);
        let store_totals = baskets
            .iter()
            .map(|(slug, basket)| {
                (
                    slug.clone(),
                    StoreCostSummary {
                        total: basket.total,
                        complete: basket.complete,
                        catalog_partial: basket.catalog_partial,
                    },
                )
            })
            .collect();

        Ok(Recommendation {
            request_id: request.id,
            outcome,
            recommendations,
            store_totals,
            restrictions: request.restrictions.clone(),
        })
    }

    /// Refreshes the cache with the supplied catalogs, then fills stores
    /// absent from the mapping with fresh cached entries.
    fn merge_with_cache(
        &self,
        mut catalogs: BTreeMap<String, StoreCatalog>,
    ) -> BTreeMap<String, StoreCatalog> {
        let Some(cache) = &self.cache else {
            return catalogs;
        };
        for catalog in catalogs.values() {
            cache.insert(catalog.clone());
        }
        for cached in cache.fresh_catalogs() {
            if !catalogs.contains_key(&cached.store) {
                debug!(store = %cached.store, "filling missing catalog from cache");
                catalogs.insert(cached.store.clone(), cached);
            }
        }
        catalogs
    }
}

/// Per-item entries for the report, in request item order. Items resolve
/// through the chosen plan; with no plan every item is an explicit
/// absence.
fn build_recommendations(
    request: &ShoppingRequest,
    outcome: &PlanOutcome,
    baskets: &BTreeMap<String, StoreBasket>,
) -> Vec<ItemRecommendation> {
    request
        .items
        .iter()
        .map(|item| {
            let store = match outcome {
                PlanOutcome::SingleStore { store, .. } => Some(store.as_str()),
                PlanOutcome::MultiStore { assignments, .. } => assignments
                    .iter()
                    .find(|(name, _)| name == &item.name)
                    .map(|(_, store)| store.as_str()),
                PlanOutcome::Failed(_) => None,
            };
            let choice = store
                .and_then(|slug| baskets.get(slug))
                .and_then(|basket| basket.match_for(&item.name))
                .and_then(|m| m.outcome.matched())
                .map(|(product, suitability)| ChosenProduct {
                    store: product.store.clone(),
                    product_name: product.name.clone(),
                    price: product.price,
                    is_suitable: suitability.is_suitable,
                    dietary: suitability.clone(),
                    url: product.url.clone(),
                });
            ItemRecommendation {
                item: item.name.clone(),
                choice,
            }
        })
        .collect()
}
