use crate::core::expansions::expand_exclusions;
use crate::core::similarity::cosine_similarity;
use crate::models::{Candidate, SemanticExclusions};
use crate::services::EmbeddingProvider;

/// Whether the exclusion filter actually compared embeddings or degraded
/// to a pass-through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Candidates were compared against the exclusion embedding
    Applied,
    /// No exclusion terms, or the provider failed: all candidates kept
    PassThrough,
}

/// Result of the semantic exclusion phase
#[derive(Debug)]
pub struct ExclusionOutcome {
    pub candidates: Vec<Candidate>,
    pub mode: FilterMode,
}

/// Drop candidates whose embedding is too similar to the combined exclusion
/// terms.
///
/// Each category's terms are first expanded against its static table, then
/// all terms across all categories form one text blob embedded in a single
/// provider call. Candidates survive when their cosine similarity is strictly
/// below the threshold and are annotated with that similarity (clamped to
/// [0, 1]). An empty blob or a provider failure keeps every candidate with
/// similarity 0.0; losing precision is preferred over losing availability.
pub async fn filter_by_exclusions(
    candidates: Vec<Candidate>,
    exclusions: &SemanticExclusions,
    threshold: f64,
    embeddings: &dyn EmbeddingProvider,
) -> ExclusionOutcome {
    if candidates.is_empty() {
        return ExclusionOutcome {
            candidates,
            mode: FilterMode::PassThrough,
        };
    }

    let exclusion_text = expand_exclusions(exclusions).combined_terms();
    if exclusion_text.trim().is_empty() {
        return ExclusionOutcome {
            candidates: annotate_all(candidates, 0.0),
            mode: FilterMode::PassThrough,
        };
    }

    let exclusion_vec = match embeddings.embed(&exclusion_text).await {
        Ok(vector) => vector,
        Err(e) => {
            tracing::warn!("Embedding generation failed: {}. Skipping semantic exclusion.", e);
            return ExclusionOutcome {
                candidates: annotate_all(candidates, 0.0),
                mode: FilterMode::PassThrough,
            };
        }
    };

    let before = candidates.len();

    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|mut candidate| {
            let similarity = if candidate.unit.embedding.is_empty() {
                0.0
            } else {
                cosine_similarity(&candidate.unit.embedding, &exclusion_vec)
            };

            // Strictly-below keeps; the boundary value itself is excluded
            if similarity < threshold {
                candidate.exclusion_similarity = Some(similarity.clamp(0.0, 1.0));
                Some(candidate)
            } else {
                None
            }
        })
        .collect();

    tracing::info!(
        "Semantic exclusion: {} -> {} products ({} excluded)",
        before,
        kept.len(),
        before - kept.len()
    );

    ExclusionOutcome {
        candidates: kept,
        mode: FilterMode::Applied,
    }
}

fn annotate_all(candidates: Vec<Candidate>, similarity: f64) -> Vec<Candidate> {
    candidates
        .into_iter()
        .map(|mut candidate| {
            candidate.exclusion_similarity = Some(similarity);
            candidate
        })
        .collect()
}
