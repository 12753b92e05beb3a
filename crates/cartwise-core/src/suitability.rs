//! Suitability outcomes for a (product, restriction-set) pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::request::Restriction;

/// The outcome of checking one restriction against one product.
///
/// `Unknown` is a first-class result: the product data was insufficient to
/// confirm or deny the restriction. It is tracked separately from both
/// `Satisfied` and `Violated` and is never escalated to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Satisfied,
    Violated,
    Unknown,
}

/// Aggregated suitability of a product against a set of requested
/// restrictions. The three sets are disjoint and cover exactly the
/// requested restrictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityResult {
    pub is_suitable: bool,
    /// Restrictions confirmed satisfied from product data.
    pub satisfied: BTreeSet<Restriction>,
    /// Restrictions confirmed violated.
    pub violated: BTreeSet<Restriction>,
    /// Restrictions that could not be confirmed either way.
    pub unknown: BTreeSet<Restriction>,
}

impl SuitabilityResult {
    /// A result for a product evaluated against zero restrictions —
    /// trivially suitable.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            is_suitable: true,
            satisfied: BTreeSet::new(),
            violated: BTreeSet::new(),
            unknown: BTreeSet::new(),
        }
    }

    /// Count of requested restrictions confirmed satisfied; used as a
    /// ranking tie-breaker by the matcher.
    #[must_use]
    pub fn satisfied_count(&self) -> usize {
        self.satisfied.len()
    }
}
