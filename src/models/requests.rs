use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{HardConstraints, SoftPreferences};

/// Request to screen the catalog for one traveler
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScreenRequest {
    #[serde(alias = "hard_constraints", rename = "hardConstraints", default)]
    pub hard_constraints: HardConstraints,
    #[serde(alias = "soft_preferences", rename = "softPreferences", default)]
    pub soft_preferences: SoftPreferences,
    /// Maximum number of ranked products to return; service default when absent
    #[validate(range(min = 1, max = 100))]
    #[serde(alias = "top_n", rename = "topN", default)]
    pub top_n: Option<u16>,
}
