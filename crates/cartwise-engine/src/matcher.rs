//! Per-item product matching against one store's catalog.
//!
//! Matching is a two-stage filter (name relevance, then dietary
//! suitability) followed by a fully deterministic ranking. The relevance
//! rule is a documented policy: every token of the requested item name
//! must occur as a substring of some token of the product name
//! (case-insensitive). "rice" matches "Organic Brown Rice 32oz";
//! "peanut butter" does not match "Almond Butter".

use cartwise_core::{ItemMatch, MatchFailure, MatchOutcome, ProductRecord, Restriction};
use cartwise_diet::UnknownPolicy;
use tracing::debug;

/// Matches one requested item against a store's catalog slice.
///
/// Suitable relevant candidates are ranked by ascending price, then by
/// descending count of confirmed restrictions, then lexical product name,
/// then product URL — a single deterministic winner for any input.
/// Unsuitable products are never substituted: relevant-but-unsuitable
/// yields `DietaryMismatch`, no relevant record yields
/// `NoRelevantProduct`.
#[must_use]
pub fn match_item(
    item_name: &str,
    restrictions: &[Restriction],
    catalog: &[ProductRecord],
    policy: &UnknownPolicy,
) -> ItemMatch {
    let item_tokens = tokenize(item_name);

    let mut any_relevant = false;
    let mut candidates: Vec<(ProductRecord, cartwise_core::SuitabilityResult)> = Vec::new();

    for product in catalog {
        if !is_relevant(&item_tokens, &product.name) {
            continue;
        }
        any_relevant = true;

        let suitability = cartwise_diet::evaluate(product, restrictions, policy);
        if suitability.is_suitable {
            candidates.push((product.clone(), suitability));
        }
    }

    let best = candidates.into_iter().min_by(|(a, sa), (b, sb)| {
        a.price
            .cmp(&b.price)
            .then_with(|| sb.satisfied_count().cmp(&sa.satisfied_count()))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.url.cmp(&b.url))
    });

    match best {
        Some((product, suitability)) => ItemMatch {
            item: item_name.to_string(),
            outcome: MatchOutcome::Matched {
                product,
                suitability,
            },
        },
        None => {
            let reason = if any_relevant {
                MatchFailure::DietaryMismatch
            } else {
                MatchFailure::NoRelevantProduct
            };
            debug!(item = item_name, ?reason, "no suitable match");
            ItemMatch {
                item: item_name.to_string(),
                outcome: MatchOutcome::NoMatch { reason },
            }
        }
    }
}

/// Lowercase alphanumeric tokens of a name.
fn tokenize(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A product is relevant when every item token appears as a substring of
/// at least one product-name token.
fn is_relevant(item_tokens: &[String], product_name: &str) -> bool {
    if item_tokens.is_empty() {
        return false;
    }
    let product_tokens = tokenize(product_name);
    item_tokens
        .iter()
        .all(|it| product_tokens.iter().any(|pt| pt.contains(it.as_str())))
}
