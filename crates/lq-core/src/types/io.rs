use crate::types::enums::{ContentFormat, Tier};
use crate::types::goal::Goal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoadmapInput {
    pub goal: Goal,
    pub tier: Tier,
    pub format: ContentFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileInput {
    pub display_name: String,
    /// Falls back to the service's configured starting balance.
    pub starting_tokens: Option<u32>,
}
