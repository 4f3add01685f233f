use std::sync::Arc;

use thiserror::Error;

use crate::config::ScreeningSettings;
use crate::core::constraints;
use crate::core::exclusion::filter_by_exclusions;
use crate::core::geo_filter::filter_by_proximity;
use crate::core::ranker::rank_by_preferences;
use crate::models::{
    Candidate, HardConstraints, PhaseCounts, ScreeningOutcome, SoftPreferences,
};
use crate::services::{CatalogError, CatalogStore, EmbeddingProvider, Geocoder};

/// Fatal pipeline errors; embedding and geocode failures never appear here,
/// they degrade inside their phases
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Catalog store error: {0}")]
    Store(#[from] CatalogError),
}

/// Screening pipeline orchestrator.
///
/// Runs the phase cascade COMPILED -> GEO_FILTERED -> EXCLUSION_FILTERED ->
/// RANKED, skipping phases whose inputs are absent and recording per-phase
/// cardinality. Collaborators are injected once at construction and shared
/// across requests; each request itself runs sequentially end to end.
pub struct Screener {
    store: Arc<dyn CatalogStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    geocoder: Arc<dyn Geocoder>,
    settings: ScreeningSettings,
}

impl Screener {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        geocoder: Arc<dyn Geocoder>,
        settings: ScreeningSettings,
    ) -> Self {
        Self {
            store,
            embeddings,
            geocoder,
            settings,
        }
    }

    pub fn default_top_n(&self) -> usize {
        self.settings.top_results_count
    }

    /// Run the full screening cascade for one traveler.
    ///
    /// Only store failures propagate; an empty candidate set at any phase
    /// boundary short-circuits with zero counts for the remaining phases and
    /// no further embedding calls.
    pub async fn screen(
        &self,
        hard: &HardConstraints,
        soft: &SoftPreferences,
        top_n: usize,
    ) -> Result<ScreeningOutcome, ScreeningError> {
        let mut counts = PhaseCounts {
            initial: self.store.count_all().await?,
            ..Default::default()
        };

        // Phase 1: structured constraint filtering in the store
        let predicate = constraints::compile(hard);
        tracing::info!("Hard screening WHERE: {}", predicate.sql());

        let units = self.store.fetch_matching(&predicate).await?;
        counts.after_constraints = units.len();
        tracing::info!(
            "Phase 1 (constraint filter): {} -> {} products",
            counts.initial,
            counts.after_constraints
        );

        if units.is_empty() {
            return Ok(ScreeningOutcome {
                products: vec![],
                counts,
            });
        }

        let mut candidates: Vec<Candidate> = units.into_iter().map(Candidate::new).collect();

        // Phase 2: geographic proximity
        match hard.proximity_target() {
            Some(target) => {
                candidates = filter_by_proximity(
                    candidates,
                    target,
                    self.settings.proximity_radius_km,
                    self.geocoder.as_ref(),
                );
                counts.after_proximity = candidates.len();
                tracing::info!(
                    "Phase 2 (proximity filter): {} -> {} products",
                    counts.after_constraints,
                    counts.after_proximity
                );
            }
            None => {
                counts.after_proximity = counts.after_constraints;
                tracing::info!("Phase 2 skipped: no target coordinates");
            }
        }

        if candidates.is_empty() {
            return Ok(ScreeningOutcome {
                products: vec![],
                counts,
            });
        }

        // Phase 3: semantic exclusion
        if hard.semantic_exclusions.has_terms() {
            let outcome = filter_by_exclusions(
                candidates,
                &hard.semantic_exclusions,
                self.settings.semantic_exclusion_threshold,
                self.embeddings.as_ref(),
            )
            .await;
            candidates = outcome.candidates;
            counts.after_exclusion = candidates.len();
            tracing::info!(
                "Phase 3 (semantic exclusion, {:?}): {} -> {} products",
                outcome.mode,
                counts.after_proximity,
                counts.after_exclusion
            );
        } else {
            counts.after_exclusion = counts.after_proximity;
            tracing::info!("Phase 3 skipped: no semantic exclusions");
        }

        if candidates.is_empty() {
            return Ok(ScreeningOutcome {
                products: vec![],
                counts,
            });
        }

        // Phase 4: soft preference ranking, always applied
        let ranked = rank_by_preferences(candidates, soft, top_n, self.embeddings.as_ref()).await;
        counts.after_ranking = ranked.candidates.len();
        tracing::info!(
            "Phase 4 (ranking, {:?}): {} -> {} products",
            ranked.mode,
            counts.after_exclusion,
            counts.after_ranking
        );

        let products = ranked
            .candidates
            .into_iter()
            .map(Candidate::into_product)
            .collect();

        Ok(ScreeningOutcome { products, counts })
    }
}
