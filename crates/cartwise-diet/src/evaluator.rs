//! Restriction evaluators and the suitability entry point.
//!
//! Every supported restriction has exactly one evaluator, dispatched from
//! the match table in [`check`]. Evaluators are deterministic and
//! side-effect-free: labels, ingredient lists, and allergen statements in,
//! a three-way outcome out. Missing data yields `Unknown`, never an
//! implicit pass.

use std::collections::BTreeSet;

use cartwise_core::{AppConfig, CheckOutcome, ProductRecord, Restriction, SuitabilityResult};
use tracing::debug;

use crate::lexicon;

/// How `Unknown` outcomes count toward overall suitability.
///
/// The default is conservative: a restriction that cannot be confirmed
/// disqualifies the product. Restrictions listed in `assume_satisfied` are
/// the explicit opt-out.
#[derive(Debug, Clone, Default)]
pub struct UnknownPolicy {
    pub assume_satisfied: BTreeSet<Restriction>,
}

impl UnknownPolicy {
    /// The default policy: unknown never counts as satisfied.
    #[must_use]
    pub fn conservative() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            assume_satisfied: config.assume_satisfied_when_unknown.clone(),
        }
    }
}

/// Evaluate a product against a set of requested restrictions.
///
/// Each restriction lands in exactly one of the result's three sets. The
/// product is suitable iff nothing is violated and every unknown
/// restriction is covered by the policy's assume-satisfied list.
#[must_use]
pub fn evaluate(
    product: &ProductRecord,
    restrictions: &[Restriction],
    policy: &UnknownPolicy,
) -> SuitabilityResult {
    let mut satisfied = BTreeSet::new();
    let mut violated = BTreeSet::new();
    let mut unknown = BTreeSet::new();

    for &restriction in restrictions {
        match check(restriction, product) {
            CheckOutcome::Satisfied => {
                satisfied.insert(restriction);
            }
            CheckOutcome::Violated => {
                violated.insert(restriction);
            }
            CheckOutcome::Unknown => {
                unknown.insert(restriction);
            }
        }
    }

    let is_suitable = violated.is_empty()
        && unknown
            .iter()
            .all(|r| policy.assume_satisfied.contains(r));

    SuitabilityResult {
        is_suitable,
        satisfied,
        violated,
        unknown,
    }
}

/// Check one restriction against one product.
#[must_use]
pub fn check(restriction: Restriction, product: &ProductRecord) -> CheckOutcome {
    match restriction {
        Restriction::GlutenFree => check_free_of(
            product,
            restriction,
            lexicon::GLUTEN_TERMS,
            lexicon::GLUTEN_ALLERGEN_TERMS,
        ),
        Restriction::Vegan => check_vegan(product),
        Restriction::Vegetarian => {
            check_free_of(product, restriction, lexicon::MEAT_TERMS, &[])
        }
        Restriction::DairyFree => check_free_of(
            product,
            restriction,
            lexicon::DAIRY_TERMS,
            lexicon::DAIRY_ALLERGEN_TERMS,
        ),
        Restriction::NutFree => check_free_of(
            product,
            restriction,
            lexicon::NUT_TERMS,
            lexicon::NUT_ALLERGEN_TERMS,
        ),
        Restriction::Kosher => {
            check_certification(product, restriction, lexicon::KOSHER_EXCLUDED_TERMS)
        }
        Restriction::Halal => {
            check_certification(product, restriction, lexicon::HALAL_EXCLUDED_TERMS)
        }
        Restriction::Organic => check_organic(product),
        Restriction::SugarFree => {
            check_free_of(product, restriction, lexicon::SUGAR_TERMS, &[])
        }
    }
}

/// Free-of style check (gluten-free, dairy-free, nut-free, vegetarian,
/// sugar-free): violation evidence in the ingredient list or allergen
/// statement disqualifies even a labeled product; a clean known ingredient
/// list or the declared label confirms; otherwise unknown.
fn check_free_of(
    product: &ProductRecord,
    restriction: Restriction,
    ingredient_terms: &[&'static str],
    allergen_terms: &[&'static str],
) -> CheckOutcome {
    if let Some(term) = lexicon::find_term_in_entries(&product.ingredients, ingredient_terms) {
        debug!(product = %product.name, %restriction, term, "ingredient term violates restriction");
        return CheckOutcome::Violated;
    }
    if let Some(statement) = &product.allergen_statement {
        if let Some(term) = lexicon::find_term(statement, allergen_terms) {
            debug!(product = %product.name, %restriction, term, "allergen statement violates restriction");
            return CheckOutcome::Violated;
        }
    }
    if product.has_label(restriction.label()) {
        return CheckOutcome::Satisfied;
    }
    if product.ingredients_known() {
        // Full ingredient list with no offending term: confirmed.
        CheckOutcome::Satisfied
    } else {
        CheckOutcome::Unknown
    }
}

/// Vegan: excluded terms span meat, dairy, and other animal-derived
/// ingredients; a "plant-based" label counts alongside "vegan".
fn check_vegan(product: &ProductRecord) -> CheckOutcome {
    for terms in [
        lexicon::MEAT_TERMS,
        lexicon::DAIRY_TERMS,
        lexicon::OTHER_ANIMAL_TERMS,
    ] {
        if let Some(term) = lexicon::find_term_in_entries(&product.ingredients, terms) {
            debug!(product = %product.name, term, "animal-derived ingredient violates vegan");
            return CheckOutcome::Violated;
        }
    }
    if product.has_label("vegan") || product.has_label("plant-based") {
        return CheckOutcome::Satisfied;
    }
    if product.ingredients_known() {
        CheckOutcome::Satisfied
    } else {
        CheckOutcome::Unknown
    }
}

/// Certification-style check (kosher, halal): the declared label is
/// authoritative; without it, disqualifying ingredients prove violation
/// but a clean list cannot prove certification, so the result stays
/// unknown.
fn check_certification(
    product: &ProductRecord,
    restriction: Restriction,
    excluded_terms: &[&'static str],
) -> CheckOutcome {
    if product.has_label(restriction.label()) {
        return CheckOutcome::Satisfied;
    }
    if let Some(term) = lexicon::find_term_in_entries(&product.ingredients, excluded_terms) {
        debug!(product = %product.name, %restriction, term, "ingredient term disqualifies certification");
        return CheckOutcome::Violated;
    }
    CheckOutcome::Unknown
}

/// Organic: confirmed by the declared label or an "organic" token in the
/// product name; never inferable from ingredients.
fn check_organic(product: &ProductRecord) -> CheckOutcome {
    if product.has_label("organic") || product.name.to_lowercase().contains("organic") {
        CheckOutcome::Satisfied
    } else {
        CheckOutcome::Unknown
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn make_product(
        name: &str,
        labels: &[&str],
        ingredients: &[&str],
        allergen_statement: Option<&str>,
    ) -> ProductRecord {
        ProductRecord {
            store: "walmart".to_string(),
            name: name.to_string(),
            price: Decimal::new(399, 2),
            currency: "USD".to_string(),
            ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
            labels: labels.iter().map(|s| (*s).to_string()).collect(),
            allergen_statement: allergen_statement.map(str::to_string),
            url: None,
            size: None,
        }
    }

    // -----------------------------------------------------------------------
    // check: gluten-free
    // -----------------------------------------------------------------------

    #[test]
    fn gluten_free_label_satisfies() {
        let p = make_product("Rice", &["gluten-free"], &[], None);
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn gluten_free_violated_by_wheat_ingredient() {
        let p = make_product("Bread", &[], &["enriched wheat flour", "water"], None);
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Violated);
    }

    #[test]
    fn gluten_free_violated_by_allergen_statement() {
        let p = make_product("Soup", &[], &[], Some("Contains: wheat"));
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Violated);
    }

    #[test]
    fn gluten_free_ingredient_evidence_beats_label() {
        // A mislabeled product still fails on hard evidence.
        let p = make_product("Bread", &["gluten-free"], &["wheat flour"], None);
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Violated);
    }

    #[test]
    fn gluten_free_clean_known_ingredients_satisfy() {
        let p = make_product("Rice", &[], &["brown rice", "water"], None);
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn gluten_free_unknown_without_data() {
        let p = make_product("Rice", &[], &[], None);
        assert_eq!(check(Restriction::GlutenFree, &p), CheckOutcome::Unknown);
    }

    // -----------------------------------------------------------------------
    // check: vegan / vegetarian
    // -----------------------------------------------------------------------

    #[test]
    fn vegan_violated_by_milk() {
        let p = make_product("Bread", &[], &["flour", "milk", "yeast"], None);
        assert_eq!(check(Restriction::Vegan, &p), CheckOutcome::Violated);
    }

    #[test]
    fn vegan_violated_by_honey() {
        let p = make_product("Granola", &[], &["oats", "honey"], None);
        assert_eq!(check(Restriction::Vegan, &p), CheckOutcome::Violated);
    }

    #[test]
    fn vegan_label_satisfies_without_ingredients() {
        let p = make_product("Bread", &["vegan"], &[], None);
        assert_eq!(check(Restriction::Vegan, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn plant_based_label_counts_as_vegan() {
        let p = make_product("Patty", &["plant-based"], &[], None);
        assert_eq!(check(Restriction::Vegan, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn vegan_unknown_without_data() {
        let p = make_product("Bread", &[], &[], None);
        assert_eq!(check(Restriction::Vegan, &p), CheckOutcome::Unknown);
    }

    #[test]
    fn vegetarian_allows_dairy() {
        let p = make_product("Pizza", &[], &["flour", "cheese", "tomato"], None);
        assert_eq!(check(Restriction::Vegetarian, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn vegetarian_violated_by_chicken() {
        let p = make_product("Soup", &[], &["water", "chicken stock"], None);
        assert_eq!(check(Restriction::Vegetarian, &p), CheckOutcome::Violated);
    }

    // -----------------------------------------------------------------------
    // check: dairy-free / nut-free
    // -----------------------------------------------------------------------

    #[test]
    fn dairy_free_violated_by_whey() {
        let p = make_product("Protein Bar", &[], &["whey protein"], None);
        assert_eq!(check(Restriction::DairyFree, &p), CheckOutcome::Violated);
    }

    #[test]
    fn nut_free_violated_by_allergen_statement() {
        let p = make_product(
            "Cookies",
            &[],
            &["flour", "sugar"],
            Some("May contain tree nuts"),
        );
        assert_eq!(check(Restriction::NutFree, &p), CheckOutcome::Violated);
    }

    #[test]
    fn nut_free_coconut_is_not_a_nut() {
        let p = make_product("Bar", &[], &["coconut oil", "oats"], None);
        assert_eq!(check(Restriction::NutFree, &p), CheckOutcome::Satisfied);
    }

    // -----------------------------------------------------------------------
    // check: kosher / halal / organic
    // -----------------------------------------------------------------------

    #[test]
    fn halal_label_satisfies() {
        let p = make_product("Chicken", &["halal"], &["chicken"], None);
        assert_eq!(check(Restriction::Halal, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn halal_violated_by_pork() {
        let p = make_product("Sausage", &[], &["pork", "spices"], None);
        assert_eq!(check(Restriction::Halal, &p), CheckOutcome::Violated);
    }

    #[test]
    fn halal_clean_ingredients_remain_unknown() {
        // Certification cannot be inferred from a clean ingredient list.
        let p = make_product("Rice", &[], &["rice"], None);
        assert_eq!(check(Restriction::Halal, &p), CheckOutcome::Unknown);
    }

    #[test]
    fn kosher_violated_by_shellfish() {
        let p = make_product("Bisque", &[], &["cream", "lobster"], None);
        assert_eq!(check(Restriction::Kosher, &p), CheckOutcome::Violated);
    }

    #[test]
    fn organic_label_satisfies() {
        let p = make_product("Milk", &["organic"], &[], None);
        assert_eq!(check(Restriction::Organic, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn organic_name_token_satisfies() {
        let p = make_product("Organic Brown Rice", &[], &[], None);
        assert_eq!(check(Restriction::Organic, &p), CheckOutcome::Satisfied);
    }

    #[test]
    fn organic_unknown_otherwise() {
        let p = make_product("Brown Rice", &[], &["brown rice"], None);
        assert_eq!(check(Restriction::Organic, &p), CheckOutcome::Unknown);
    }

    // -----------------------------------------------------------------------
    // evaluate
    // -----------------------------------------------------------------------

    #[test]
    fn evaluate_no_restrictions_is_suitable() {
        let p = make_product("Rice", &[], &[], None);
        let result = evaluate(&p, &[], &UnknownPolicy::conservative());
        assert!(result.is_suitable);
    }

    #[test]
    fn evaluate_partitions_outcomes() {
        let p = make_product("Bread", &[], &["wheat flour", "milk"], None);
        let result = evaluate(
            &p,
            &[
                Restriction::GlutenFree,
                Restriction::Vegan,
                Restriction::Organic,
            ],
            &UnknownPolicy::conservative(),
        );
        assert!(!result.is_suitable);
        assert!(result.violated.contains(&Restriction::GlutenFree));
        assert!(result.violated.contains(&Restriction::Vegan));
        assert!(result.unknown.contains(&Restriction::Organic));
        assert!(result.satisfied.is_empty());
    }

    #[test]
    fn evaluate_unknown_disqualifies_by_default() {
        let p = make_product("Rice", &[], &[], None);
        let result = evaluate(
            &p,
            &[Restriction::GlutenFree],
            &UnknownPolicy::conservative(),
        );
        assert!(!result.is_suitable);
        assert!(result.unknown.contains(&Restriction::GlutenFree));
    }

    #[test]
    fn evaluate_assume_satisfied_policy_admits_unknown() {
        let p = make_product("Brown Rice", &[], &["brown rice"], None);
        let mut policy = UnknownPolicy::conservative();
        policy.assume_satisfied.insert(Restriction::Organic);
        let result = evaluate(&p, &[Restriction::Organic], &policy);
        assert!(result.is_suitable);
        assert!(result.unknown.contains(&Restriction::Organic));
    }

    #[test]
    fn evaluate_violation_disqualifies_despite_policy() {
        let p = make_product("Sausage", &[], &["pork"], None);
        let mut policy = UnknownPolicy::conservative();
        policy.assume_satisfied.insert(Restriction::Halal);
        let result = evaluate(&p, &[Restriction::Halal], &policy);
        assert!(!result.is_suitable);
        assert!(result.violated.contains(&Restriction::Halal));
    }
}
