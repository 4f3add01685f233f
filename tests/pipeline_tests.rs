// Integration tests for the screening pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use trip_screener::config::ScreeningSettings;
use trip_screener::core::{CompiledPredicate, Screener};
use trip_screener::models::{BookableUnit, HardConstraints, SemanticExclusions, SoftPreferences};
use trip_screener::services::{
    CatalogError, CatalogStore, EmbeddingError, EmbeddingProvider, StaticGeocoder,
};

/// Catalog store over a fixed vector of rows, evaluating the compiled
/// predicate in memory
struct InMemoryCatalog {
    units: Vec<BookableUnit>,
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn count_all(&self) -> Result<usize, CatalogError> {
        Ok(self.units.len())
    }

    async fn fetch_matching(
        &self,
        predicate: &CompiledPredicate,
    ) -> Result<Vec<BookableUnit>, CatalogError> {
        Ok(self
            .units
            .iter()
            .filter(|unit| predicate.matches(unit))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}

/// Embedding provider returning a fixed vector, recording every call
struct CountingEmbedder {
    vector: Vec<f32>,
    fail: bool,
    calls: AtomicUsize,
    last_text: Mutex<String>,
}

impl CountingEmbedder {
    fn new(vector: Vec<f32>) -> Arc<Self> {
        Arc::new(Self {
            vector,
            fail: false,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(String::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            vector: vec![],
            fail: true,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(String::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_text(&self) -> String {
        self.last_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = text.to_string();
        if self.fail {
            Err(EmbeddingError::ApiError("provider down".into()))
        } else {
            Ok(self.vector.clone())
        }
    }
}

fn make_unit(
    product_id: &str,
    unit_id: &str,
    country: &str,
    coords: Option<(f64, f64)>,
    embedding: Vec<f32>,
) -> BookableUnit {
    BookableUnit {
        product_id: product_id.to_string(),
        option_id: "default".to_string(),
        unit_id: unit_id.to_string(),
        search_text: format!("{} tour", product_id),
        country: Some(country.to_string()),
        embedding,
        latitude: coords.map(|(lat, _)| lat),
        longitude: coords.map(|(_, lon)| lon),
        location: None,
        start_date: None,
        end_date: None,
        min_age: None,
        max_age: None,
        max_pax: None,
        price_amount: 60.0,
        currency: "EUR".to_string(),
    }
}

fn make_screener(
    units: Vec<BookableUnit>,
    embedder: Arc<CountingEmbedder>,
) -> Screener {
    Screener::new(
        Arc::new(InMemoryCatalog { units }),
        embedder,
        Arc::new(StaticGeocoder::new()),
        ScreeningSettings::default(),
    )
}

fn venice_constraints() -> HardConstraints {
    HardConstraints {
        target_latitude: Some(45.4408),
        target_longitude: Some(12.3155),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_constraint_result_makes_no_embedding_calls() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![make_unit("p1", "u1", "FR", None, vec![1.0, 0.0])];
    let screener = make_screener(units, Arc::clone(&embedder));

    let hard = HardConstraints {
        country: Some("IT".to_string()),
        semantic_exclusions: SemanticExclusions {
            fears: vec!["heights".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let soft = SoftPreferences {
        preference_text: "boat tours".to_string(),
        ..Default::default()
    };

    let outcome = screener.screen(&hard, &soft, 5).await.unwrap();

    assert!(outcome.products.is_empty());
    assert_eq!(outcome.counts.initial, 1);
    assert_eq!(outcome.counts.after_constraints, 0);
    assert_eq!(outcome.counts.after_proximity, 0);
    assert_eq!(outcome.counts.after_exclusion, 0);
    assert_eq!(outcome.counts.after_ranking, 0);
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_venice_target_excludes_rome_candidate() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![
        // St Mark's Square, under 2km from the target
        make_unit("gondola", "u1", "IT", Some((45.4371, 12.3326)), vec![0.0, 1.0]),
        // Rome, roughly 394km away
        make_unit("colosseum", "u1", "IT", Some((41.9028, 12.4964)), vec![0.0, 1.0]),
    ];
    let screener = make_screener(units, embedder);

    let outcome = screener
        .screen(&venice_constraints(), &SoftPreferences::default(), 5)
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].product_id, "gondola");
    assert!(outcome.products[0].distance_km.unwrap() < 2.0);

    assert_eq!(outcome.counts.initial, 2);
    assert_eq!(outcome.counts.after_constraints, 2);
    assert_eq!(outcome.counts.after_proximity, 1);
    assert_eq!(outcome.counts.after_exclusion, 1);
    assert_eq!(outcome.counts.after_ranking, 1);
}

#[tokio::test]
async fn test_proximity_short_circuit_skips_embeddings() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![make_unit(
        "colosseum",
        "u1",
        "IT",
        Some((41.9028, 12.4964)),
        vec![0.0, 1.0],
    )];
    let screener = make_screener(units, Arc::clone(&embedder));

    let mut hard = venice_constraints();
    hard.semantic_exclusions.fears = vec!["heights".to_string()];
    let soft = SoftPreferences {
        preference_text: "boat tours".to_string(),
        ..Default::default()
    };

    let outcome = screener.screen(&hard, &soft, 5).await.unwrap();

    assert!(outcome.products.is_empty());
    assert_eq!(outcome.counts.after_proximity, 0);
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_hard_constraints_admit_and_reject() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);

    let mut roomy = make_unit("roomy", "u1", "IT", None, vec![0.0, 1.0]);
    roomy.max_age = Some(99);
    roomy.max_pax = Some(4);

    let mut cramped = make_unit("cramped", "u1", "IT", None, vec![0.0, 1.0]);
    cramped.max_age = Some(99);
    cramped.max_pax = Some(1);

    let screener = make_screener(vec![roomy, cramped], embedder);

    let hard = HardConstraints {
        country: Some("IT".to_string()),
        age: Some(35),
        max_pax: Some(2),
        ..Default::default()
    };

    let outcome = screener
        .screen(&hard, &SoftPreferences::default(), 5)
        .await
        .unwrap();

    assert_eq!(outcome.counts.after_constraints, 1);
    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].product_id, "roomy");
}

#[tokio::test]
async fn test_semantic_exclusion_drops_similar_products() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![
        make_unit("cliff-walk", "u1", "IT", None, vec![1.0, 0.0]),
        make_unit("museum", "u1", "IT", None, vec![0.0, 1.0]),
    ];
    let screener = make_screener(units, Arc::clone(&embedder));

    let hard = HardConstraints {
        semantic_exclusions: SemanticExclusions {
            fears: vec!["heights".to_string(), "cliffs".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };

    let outcome = screener
        .screen(&hard, &SoftPreferences::default(), 5)
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].product_id, "museum");
    assert_eq!(outcome.products[0].exclusion_similarity, Some(0.0));
    // No proximity target: phase skipped, count carried forward
    assert_eq!(outcome.counts.after_proximity, outcome.counts.after_constraints);
    assert_eq!(outcome.counts.after_exclusion, 1);
    // One embedding for the exclusion blob, none for blank preferences
    assert_eq!(embedder.call_count(), 1);
}

#[tokio::test]
async fn test_blank_exclusion_terms_annotate_instead_of_skipping() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![make_unit("museum", "u1", "IT", None, vec![0.0, 1.0])];
    let screener = make_screener(units, Arc::clone(&embedder));

    let hard = HardConstraints {
        semantic_exclusions: SemanticExclusions {
            fears: vec!["   ".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };

    let outcome = screener
        .screen(&hard, &SoftPreferences::default(), 5)
        .await
        .unwrap();

    // The phase runs and degrades to a pass-through: every survivor is
    // annotated, and the empty blob never reaches the provider
    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].exclusion_similarity, Some(0.0));
    assert_eq!(outcome.counts.after_exclusion, 1);
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_exclusion_terms_expand_to_related_phrasings() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![make_unit("museum", "u1", "IT", None, vec![0.0, 1.0])];
    let screener = make_screener(units, Arc::clone(&embedder));

    let hard = HardConstraints {
        semantic_exclusions: SemanticExclusions {
            fears: vec!["heights".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };

    screener
        .screen(&hard, &SoftPreferences::default(), 5)
        .await
        .unwrap();

    // The blob handed to the provider carries the expanded phrasings,
    // not the bare category term
    let embedded = embedder.last_text();
    assert!(embedded.contains("tower"));
    assert!(embedded.contains("rooftop"));
    assert!(embedded.contains("cliff"));
}

#[tokio::test]
async fn test_provider_failure_fails_open_end_to_end() {
    let embedder = CountingEmbedder::failing();
    let units = vec![
        make_unit("a", "u1", "IT", None, vec![1.0, 0.0]),
        make_unit("b", "u1", "IT", None, vec![0.0, 1.0]),
    ];
    let screener = make_screener(units, Arc::clone(&embedder));

    let hard = HardConstraints {
        semantic_exclusions: SemanticExclusions {
            diet: vec!["shellfish".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let soft = SoftPreferences {
        preference_text: "seafront dining".to_string(),
        ..Default::default()
    };

    let outcome = screener.screen(&hard, &soft, 5).await.unwrap();

    // Both phases degraded to pass-through instead of aborting
    assert_eq!(outcome.products.len(), 2);
    for product in &outcome.products {
        assert_eq!(product.exclusion_similarity, Some(0.0));
        assert_eq!(product.relevance_score, Some(0.5));
    }
    // Exclusion and ranking each attempted one embedding
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn test_ranking_deduplicates_and_truncates() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let mut units = vec![
        make_unit("tour", "morning", "IT", None, vec![0.0, 1.0]),
        make_unit("tour", "sunset", "IT", None, vec![1.0, 0.0]),
    ];
    for i in 0..10 {
        units.push(make_unit(
            &format!("filler-{}", i),
            "u1",
            "IT",
            None,
            vec![0.5, 0.5],
        ));
    }
    let screener = make_screener(units, embedder);

    let soft = SoftPreferences {
        preference_text: "boat tours".to_string(),
        ..Default::default()
    };

    let outcome = screener
        .screen(&HardConstraints::default(), &soft, 3)
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 3);

    // The duplicated product collapses to its best-scoring unit
    let tours: Vec<_> = outcome
        .products
        .iter()
        .filter(|p| p.product_id == "tour")
        .collect();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].unit_id, "sunset");
    assert_eq!(tours[0].relevance_score, Some(1.0));

    // Scores are clamped and ordered descending
    let mut previous = f64::INFINITY;
    for product in &outcome.products {
        let score = product.relevance_score.unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert!(score <= previous);
        previous = score;
    }
}

#[tokio::test]
async fn test_blank_preferences_keep_catalog_order() {
    let embedder = CountingEmbedder::new(vec![1.0, 0.0]);
    let units = vec![
        make_unit("first", "u1", "IT", None, vec![0.3, 0.7]),
        make_unit("second", "u1", "IT", None, vec![0.9, 0.1]),
        make_unit("third", "u1", "IT", None, vec![0.1, 0.9]),
    ];
    let screener = make_screener(units, Arc::clone(&embedder));

    let outcome = screener
        .screen(&HardConstraints::default(), &SoftPreferences::default(), 2)
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 2);
    assert_eq!(outcome.products[0].product_id, "first");
    assert_eq!(outcome.products[1].product_id, "second");
    for product in &outcome.products {
        assert_eq!(product.relevance_score, Some(0.5));
    }
    assert_eq!(embedder.call_count(), 0);
}
