// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BookableUnit, Candidate, GeoCoordinate, HardConstraints, PhaseCounts, RankedProduct,
    ScreeningOutcome, SemanticExclusions, SoftPreferences,
};
pub use requests::ScreenRequest;
pub use responses::{ErrorResponse, HealthResponse, ScreenResponse};
