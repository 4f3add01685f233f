use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The atomic bookable product row loaded from the catalog store.
///
/// Identity is the (product_id, option_id, unit_id) triple, unique per
/// catalog entry. Rows are immutable for the duration of a screening request.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookableUnit {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "optionId")]
    pub option_id: String,
    #[serde(rename = "unitId")]
    pub unit_id: String,
    #[serde(rename = "searchText", default)]
    pub search_text: String,
    /// ISO country code of the product's destination
    #[serde(default)]
    pub country: Option<String>,
    /// Precomputed embedding of the search text; stripped before output
    #[serde(default)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "minAge", default)]
    pub min_age: Option<i32>,
    #[serde(rename = "maxAge", default)]
    pub max_age: Option<i32>,
    #[serde(rename = "maxPax", default)]
    pub max_pax: Option<i32>,
    #[serde(rename = "priceAmount", default)]
    pub price_amount: f64,
    #[serde(default)]
    pub currency: String,
}

impl BookableUnit {
    /// Explicit coordinates, when the row carries both halves
    pub fn coordinates(&self) -> Option<GeoCoordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
            _ => None,
        }
    }
}

/// Semantic exclusion terms grouped by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticExclusions {
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub medical: Vec<String>,
    #[serde(default)]
    pub fears: Vec<String>,
}

impl SemanticExclusions {
    /// All terms across all categories joined into one text blob
    pub fn combined_terms(&self) -> String {
        self.accessibility
            .iter()
            .chain(self.diet.iter())
            .chain(self.medical.iter())
            .chain(self.fears.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when any category carries entries. Blank entries still count:
    /// the exclusion phase itself degrades to a pass-through when the
    /// expanded blob ends up empty, annotating instead of skipping.
    pub fn has_terms(&self) -> bool {
        !(self.accessibility.is_empty()
            && self.diet.is_empty()
            && self.medical.is_empty()
            && self.fears.is_empty())
    }
}

/// Non-negotiable filters; violation disqualifies a product outright
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardConstraints {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "targetLatitude", default)]
    pub target_latitude: Option<f64>,
    #[serde(rename = "targetLongitude", default)]
    pub target_longitude: Option<f64>,
    #[serde(rename = "accommodationLatitude", default)]
    pub accommodation_latitude: Option<f64>,
    #[serde(rename = "accommodationLongitude", default)]
    pub accommodation_longitude: Option<f64>,
    #[serde(rename = "holidayBeginDate", default)]
    pub holiday_begin_date: Option<NaiveDate>,
    #[serde(rename = "holidayEndDate", default)]
    pub holiday_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub age: Option<i64>,
    #[serde(rename = "maxPax", default, deserialize_with = "lenient_int")]
    pub max_pax: Option<i64>,
    #[serde(rename = "semanticExclusions", default)]
    pub semantic_exclusions: SemanticExclusions,
}

impl HardConstraints {
    /// Proximity target: the explicit target, falling back to the
    /// accommodation coordinates, else none (phase gets skipped)
    pub fn proximity_target(&self) -> Option<GeoCoordinate> {
        match (self.target_latitude, self.target_longitude) {
            (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
            _ => match (self.accommodation_latitude, self.accommodation_longitude) {
                (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
                _ => None,
            },
        }
    }
}

/// Accepts only JSON integers; anything else (floats, strings) becomes None
/// so a malformed scalar drops its clause instead of failing the request
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_i64))
}

/// Signals that influence ranking order but never disqualify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoftPreferences {
    #[serde(rename = "preferenceText", default)]
    pub preference_text: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "activityLevel", default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SoftPreferences {
    /// Text used for the ranking embedding: the free-text preference
    /// description when present, otherwise interests, activity level and
    /// notes joined by single spaces. May be empty.
    pub fn ranking_text(&self) -> String {
        if !self.preference_text.trim().is_empty() {
            return self.preference_text.clone();
        }

        let mut parts: Vec<String> = Vec::new();
        if !self.interests.is_empty() {
            parts.push(self.interests.join(" "));
        }
        if let Some(level) = &self.activity_level {
            parts.push(level.clone());
        }
        if let Some(notes) = &self.notes {
            parts.push(notes.clone());
        }
        parts.join(" ")
    }
}

/// A catalog row moving through the screening phases, accumulating
/// annotations as each phase runs
#[derive(Debug, Clone)]
pub struct Candidate {
    pub unit: BookableUnit,
    pub distance_km: Option<f64>,
    pub exclusion_similarity: Option<f64>,
    pub relevance_score: Option<f64>,
}

impl Candidate {
    pub fn new(unit: BookableUnit) -> Self {
        Self {
            unit,
            distance_km: None,
            exclusion_similarity: None,
            relevance_score: None,
        }
    }

    /// Final user-facing record: original catalog fields plus the phase
    /// annotations, with the raw embedding stripped
    pub fn into_product(self) -> RankedProduct {
        RankedProduct {
            product_id: self.unit.product_id,
            option_id: self.unit.option_id,
            unit_id: self.unit.unit_id,
            search_text: self.unit.search_text,
            country: self.unit.country,
            latitude: self.unit.latitude,
            longitude: self.unit.longitude,
            location: self.unit.location,
            start_date: self.unit.start_date,
            end_date: self.unit.end_date,
            min_age: self.unit.min_age,
            max_age: self.unit.max_age,
            max_pax: self.unit.max_pax,
            price_amount: self.unit.price_amount,
            currency: self.unit.currency,
            distance_km: self.distance_km,
            exclusion_similarity: self.exclusion_similarity,
            relevance_score: self.relevance_score,
        }
    }
}

/// Ranked screening result row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProduct {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "optionId")]
    pub option_id: String,
    #[serde(rename = "unitId")]
    pub unit_id: String,
    #[serde(rename = "searchText")]
    pub search_text: String,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "minAge")]
    pub min_age: Option<i32>,
    #[serde(rename = "maxAge")]
    pub max_age: Option<i32>,
    #[serde(rename = "maxPax")]
    pub max_pax: Option<i32>,
    #[serde(rename = "priceAmount")]
    pub price_amount: f64,
    pub currency: String,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "exclusionSimilarity")]
    pub exclusion_similarity: Option<f64>,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: Option<f64>,
}

/// Cardinality trail across the screening phases, for observability only
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub initial: usize,
    #[serde(rename = "afterConstraints")]
    pub after_constraints: usize,
    #[serde(rename = "afterProximity")]
    pub after_proximity: usize,
    #[serde(rename = "afterExclusion")]
    pub after_exclusion: usize,
    #[serde(rename = "afterRanking")]
    pub after_ranking: usize,
}

/// Final ordered product list plus the phase cardinality trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub products: Vec<RankedProduct>,
    pub counts: PhaseCounts,
}
