use std::collections::HashSet;

use crate::models::SemanticExclusions;

/// Accessibility limitation -> activity phrasings that violate it
pub const ACCESSIBILITY_EXPANSIONS: &[(&str, &[&str])] = &[
    ("stairs", &["stairs", "steps", "climbing", "steep"]),
    ("steps", &["stairs", "steps", "climbing", "steep"]),
    ("walking", &["walking", "hiking", "trekking", "long walk"]),
    ("standing", &["standing", "queue", "waiting in line"]),
    ("wheelchair", &["stairs", "steps", "climbing", "steep", "uneven terrain"]),
    ("mobility", &["stairs", "steps", "climbing", "steep", "hiking", "walking tour"]),
];

/// Dietary restriction -> ingredient and dish phrasings to avoid
pub const DIET_EXPANSIONS: &[(&str, &[&str])] = &[
    ("gluten", &["wheat", "bread", "pasta", "flour", "gluten", "barley", "rye"]),
    ("gluten-free", &["wheat", "bread", "pasta", "flour", "gluten", "barley", "rye"]),
    ("dairy", &["milk", "cheese", "cream", "butter", "dairy", "lactose"]),
    ("dairy-free", &["milk", "cheese", "cream", "butter", "dairy", "lactose"]),
    ("vegan", &["meat", "fish", "dairy", "eggs", "honey", "animal"]),
    ("vegetarian", &["meat", "fish", "poultry", "seafood"]),
    ("nut", &["nuts", "peanuts", "almonds", "cashews", "walnuts", "tree nuts"]),
    ("shellfish", &["shellfish", "shrimp", "crab", "lobster", "oyster", "mussel"]),
    ("kosher", &["pork", "shellfish", "non-kosher"]),
    ("halal", &["pork", "alcohol", "non-halal"]),
];

/// Medical condition -> environmental triggers to avoid
pub const MEDICAL_EXPANSIONS: &[(&str, &[&str])] = &[
    ("asthma", &["smoke", "dust", "fumes", "pollution", "smoky"]),
    ("heart", &["strenuous", "intense", "extreme", "high altitude"]),
    ("back", &["bumpy", "rough terrain", "long sitting", "uncomfortable seats"]),
    ("knee", &["stairs", "steps", "climbing", "hiking", "steep"]),
    ("allergy", &["pollen", "dust", "animals", "pets"]),
    ("epilepsy", &["strobe", "flashing lights", "disco"]),
    ("vertigo", &["heights", "spinning", "rotating", "cable car"]),
];

/// Fear -> experience phrasings that trigger it
pub const FEAR_EXPANSIONS: &[(&str, &[&str])] = &[
    (
        "heights",
        &["tower", "rooftop", "cliff", "balcony", "high", "observation deck", "skyscraper"],
    ),
    ("water", &["boat", "swimming", "diving", "snorkeling", "water", "sea", "ocean"]),
    ("enclosed", &["cave", "tunnel", "underground", "confined", "small space"]),
    ("crowds", &["crowded", "busy", "packed", "popular", "tourist hotspot"]),
    ("flying", &["helicopter", "plane", "paragliding", "skydiving"]),
    ("animals", &["zoo", "safari", "wildlife", "animal encounter"]),
    ("dark", &["cave", "underground", "night tour", "dark"]),
];

/// Expand user-facing constraint terms into the related exclusion terms the
/// embedding blob should carry.
///
/// Terms are normalized (trimmed, lowercased). A term matching a table key
/// exactly maps to that entry; otherwise the first entry whose key contains
/// the term or is contained in it wins; an unmapped term passes through
/// unchanged. Blank terms are dropped. Duplicates keep their first position.
pub fn expand_terms(terms: &[String], table: &[(&str, &[&str])]) -> Vec<String> {
    let mut expanded = Vec::new();
    let mut seen = HashSet::new();

    for term in terms {
        let normalized = term.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }

        let entry = table
            .iter()
            .find(|(key, _)| *key == normalized)
            .or_else(|| {
                table
                    .iter()
                    .find(|(key, _)| normalized.contains(key) || key.contains(&normalized))
            });

        match entry {
            Some((_, related)) => {
                for value in related.iter() {
                    if seen.insert((*value).to_string()) {
                        expanded.push((*value).to_string());
                    }
                }
            }
            None => {
                if seen.insert(normalized.clone()) {
                    expanded.push(normalized);
                }
            }
        }
    }

    expanded
}

/// Expand every exclusion category against its table
pub fn expand_exclusions(exclusions: &SemanticExclusions) -> SemanticExclusions {
    SemanticExclusions {
        accessibility: expand_terms(&exclusions.accessibility, ACCESSIBILITY_EXPANSIONS),
        diet: expand_terms(&exclusions.diet, DIET_EXPANSIONS),
        medical: expand_terms(&exclusions.medical, MEDICAL_EXPANSIONS),
        fears: expand_terms(&exclusions.fears, FEAR_EXPANSIONS),
    }
}
