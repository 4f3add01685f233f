//! Trip Screener - multi-phase screening service for bookable travel products
//!
//! This library narrows a product catalog through non-negotiable hard
//! filters (structured constraints, geographic proximity, semantic
//! exclusion) and orders the survivors by preference similarity.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{cosine_similarity, haversine_distance, Screener, ScreeningError};
pub use self::models::{
    BookableUnit, GeoCoordinate, HardConstraints, PhaseCounts, RankedProduct, ScreenRequest,
    ScreenResponse, ScreeningOutcome, SemanticExclusions, SoftPreferences,
};
