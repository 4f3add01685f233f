// Core algorithm exports
pub mod constraints;
pub mod distance;
pub mod exclusion;
pub mod expansions;
pub mod geo_filter;
pub mod pipeline;
pub mod ranker;
pub mod similarity;

pub use constraints::{compile, Clause, CompiledPredicate};
pub use distance::haversine_distance;
pub use exclusion::{filter_by_exclusions, ExclusionOutcome, FilterMode};
pub use expansions::{expand_exclusions, expand_terms};
pub use geo_filter::filter_by_proximity;
pub use pipeline::{Screener, ScreeningError};
pub use ranker::{rank_by_preferences, RankMode, RankOutcome};
pub use similarity::{cosine_similarity, rescale_to_unit};
