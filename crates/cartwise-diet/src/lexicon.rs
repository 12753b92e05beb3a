//! Term lexicons for dietary restriction checks.
//!
//! Keys are lowercase terms matched by substring against lowercased
//! ingredient entries and allergen statements. Lists are intentionally
//! common-case: they catch the terms that actually appear in grocery
//! ingredient data, not every possible synonym.

/// Gluten-bearing ingredient terms.
pub(crate) const GLUTEN_TERMS: &[&str] = &[
    "wheat",
    "barley",
    "rye",
    "malt",
    "spelt",
    "farro",
    "semolina",
    "triticale",
    "couscous",
    "gluten",
];

/// Terms an allergen statement uses to declare gluten exposure.
pub(crate) const GLUTEN_ALLERGEN_TERMS: &[&str] = &["wheat", "gluten", "barley", "rye"];

/// Meat, fish, and slaughter-derived terms (vegetarian exclusions).
pub(crate) const MEAT_TERMS: &[&str] = &[
    "beef",
    "pork",
    "chicken",
    "turkey",
    "lamb",
    "veal",
    "duck",
    "bacon",
    "ham",
    "sausage",
    "anchovy",
    "fish",
    "tuna",
    "salmon",
    "sardine",
    "shrimp",
    "crab",
    "lobster",
    "oyster",
    "clam",
    "gelatin",
    "lard",
    "tallow",
    "rennet",
];

/// Dairy-derived terms.
pub(crate) const DAIRY_TERMS: &[&str] = &[
    "milk",
    "cream",
    "butter",
    "cheese",
    "whey",
    "casein",
    "yogurt",
    "lactose",
    "ghee",
    "buttermilk",
];

/// Terms an allergen statement uses to declare dairy exposure.
pub(crate) const DAIRY_ALLERGEN_TERMS: &[&str] = &["milk", "dairy", "lactose"];

/// Egg and other non-dairy animal-derived terms (vegan exclusions, on top
/// of meat and dairy).
pub(crate) const OTHER_ANIMAL_TERMS: &[&str] = &[
    "egg",
    "albumen",
    "honey",
    "carmine",
    "cochineal",
    "shellac",
    "isinglass",
];

/// Nut terms. Deliberately specific — a bare "nut" would flag coconut and
/// butternut squash.
pub(crate) const NUT_TERMS: &[&str] = &[
    "peanut",
    "almond",
    "cashew",
    "walnut",
    "pecan",
    "hazelnut",
    "pistachio",
    "macadamia",
    "brazil nut",
    "pine nut",
    "tree nut",
];

/// Terms an allergen statement uses to declare nut exposure. Statements
/// are short declarations ("Contains: tree nuts"), so bare "nut" is safe
/// here.
pub(crate) const NUT_ALLERGEN_TERMS: &[&str] = &["peanut", "nut"];

/// Ingredient terms disqualifying a halal claim.
pub(crate) const HALAL_EXCLUDED_TERMS: &[&str] = &[
    "pork",
    "bacon",
    "ham",
    "lard",
    "gelatin",
    "alcohol",
    "wine",
    "beer",
    "rum",
    "bourbon",
    "ethanol",
];

/// Ingredient terms disqualifying a kosher claim.
pub(crate) const KOSHER_EXCLUDED_TERMS: &[&str] = &[
    "pork",
    "bacon",
    "ham",
    "lard",
    "gelatin",
    "shellfish",
    "shrimp",
    "crab",
    "lobster",
    "oyster",
    "clam",
];

/// Added-sugar terms.
pub(crate) const SUGAR_TERMS: &[&str] = &[
    "sugar",
    "corn syrup",
    "high fructose",
    "dextrose",
    "sucrose",
    "glucose syrup",
    "cane juice",
    "molasses",
    "honey",
];

/// Returns the first term from `terms` found as a substring of `text`
/// (case-insensitive), or `None`.
#[must_use]
pub(crate) fn find_term(text: &str, terms: &[&'static str]) -> Option<&'static str> {
    let lower = text.to_lowercase();
    terms.iter().copied().find(|term| lower.contains(term))
}

/// Returns the first term found in any of the `entries`, or `None`.
#[must_use]
pub(crate) fn find_term_in_entries(
    entries: &[String],
    terms: &[&'static str],
) -> Option<&'static str> {
    entries.iter().find_map(|entry| find_term(entry, terms))
}
