use serde::{Deserialize, Serialize};

use crate::models::domain::{PhaseCounts, RankedProduct};

/// Response for the screen endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub products: Vec<RankedProduct>,
    pub counts: PhaseCounts,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
