use std::collections::HashSet;

use crate::core::similarity::{cosine_similarity, rescale_to_unit};
use crate::models::{Candidate, SoftPreferences};
use crate::services::EmbeddingProvider;

/// How the ranker scored the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMode {
    /// Scores came from embedding similarity
    Semantic,
    /// No usable preference text, or the provider failed: uniform 0.5
    Neutral,
}

/// Result of the soft preference ranking phase
#[derive(Debug)]
pub struct RankOutcome {
    pub candidates: Vec<Candidate>,
    pub mode: RankMode,
}

/// Score, order, deduplicate and truncate candidates by preference
/// similarity.
///
/// With no usable ranking text every candidate gets a neutral 0.5 and the
/// first `top_n` pass through in their existing order. Otherwise one
/// provider call embeds the ranking text and each candidate is scored
/// `(cos + 1) / 2`, clamped to [0, 1]; a provider failure falls back to
/// uniform neutral scores instead of aborting. Scored candidates are sorted
/// descending (stable, so equal scores keep their relative order),
/// deduplicated by product_id keeping the first occurrence after the sort,
/// and truncated to `top_n`.
pub async fn rank_by_preferences(
    candidates: Vec<Candidate>,
    preferences: &SoftPreferences,
    top_n: usize,
    embeddings: &dyn EmbeddingProvider,
) -> RankOutcome {
    if candidates.is_empty() {
        tracing::info!("Soft ranking: no products to rank");
        return RankOutcome {
            candidates,
            mode: RankMode::Neutral,
        };
    }

    let ranking_text = preferences.ranking_text();

    if ranking_text.trim().is_empty() {
        tracing::info!("Soft ranking: no preferences provided, returning with neutral scores");
        let mut neutral: Vec<Candidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                candidate.relevance_score = Some(0.5);
                candidate
            })
            .collect();
        neutral.truncate(top_n);
        return RankOutcome {
            candidates: neutral,
            mode: RankMode::Neutral,
        };
    }

    let (preference_vec, mode) = match embeddings.embed(&ranking_text).await {
        Ok(vector) => (Some(vector), RankMode::Semantic),
        Err(e) => {
            tracing::warn!("Embedding generation failed: {}. Using neutral scores.", e);
            (None, RankMode::Neutral)
        }
    };

    let before = candidates.len();

    let mut ranked: Vec<Candidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            let score = match &preference_vec {
                Some(vector) if !candidate.unit.embedding.is_empty() => {
                    rescale_to_unit(cosine_similarity(&candidate.unit.embedding, vector))
                }
                Some(_) => 0.0,
                None => 0.5,
            };
            candidate.relevance_score = Some(score);
            candidate
        })
        .collect();

    // Stable sort: ties keep their original relative order
    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // One row per product: the highest-scoring variant wins, first
    // occurrence breaking ties
    let mut seen_products = HashSet::new();
    ranked.retain(|candidate| seen_products.insert(candidate.unit.product_id.clone()));

    ranked.truncate(top_n);

    tracing::info!("Soft ranking: {} -> {} products (top {})", before, ranked.len(), top_n);

    RankOutcome {
        candidates: ranked,
        mode,
    }
}
