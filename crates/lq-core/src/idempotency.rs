use crate::error::LearnQuestError;
use crate::types::{CreateRoadmapInput, RoadmapId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: String,
    pub user_id: UserId,
    pub request_hash: String,
    pub roadmap_id: RoadmapId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub trait IdempotencyRepository {
    fn get(
        &self,
        key: &str,
        user_id: &UserId,
    ) -> Result<Option<IdempotencyRecord>, LearnQuestError>;
    /// Stores `record`, replacing any earlier record for the same key and user.
    fn insert(&self, record: &IdempotencyRecord) -> Result<(), LearnQuestError>;
    /// Deletes records that expired before `now`; returns how many.
    fn cleanup(&self, now: DateTime<Utc>) -> Result<u64, LearnQuestError>;
}

/// Stable fingerprint of a create request, used to tell a retry from a
/// different request reusing the same key.
pub fn request_hash(input: &CreateRoadmapInput) -> Result<String, LearnQuestError> {
    let body = serde_json::to_vec(input).map_err(LearnQuestError::internal)?;
    let digest = Sha256::digest(&body);
    Ok(hex::encode(digest))
}
