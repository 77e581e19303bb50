use crate::util::{from_rfc3339, to_rfc3339};
use chrono::{DateTime, Utc};
use lq_core::LearnQuestError;
use lq_core::idempotency::{IdempotencyRecord, IdempotencyRepository};
use lq_core::types::{RoadmapId, UserId};
use rusqlite::Connection;

pub struct IdempotencyStore<'a> {
    pub conn: &'a Connection,
}

impl<'a> IdempotencyStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> IdempotencyRepository for IdempotencyStore<'a> {
    fn get(
        &self,
        key: &str,
        user_id: &UserId,
    ) -> Result<Option<IdempotencyRecord>, LearnQuestError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, user_id, request_hash, roadmap_id, created_at, expires_at FROM idempotency_keys WHERE key = ?1 AND user_id = ?2")
            .map_err(LearnQuestError::internal)?;
        let mut rows = stmt
            .query([key, user_id.as_str()])
            .map_err(LearnQuestError::internal)?;
        let Some(row) = rows.next().map_err(LearnQuestError::internal)? else {
            return Ok(None);
        };
        Ok(Some(map_record_row(row)?))
    }

    fn insert(&self, record: &IdempotencyRecord) -> Result<(), LearnQuestError> {
        let sql = "INSERT INTO idempotency_keys (key, user_id, request_hash, roadmap_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(key, user_id) DO UPDATE SET request_hash = excluded.request_hash, roadmap_id = excluded.roadmap_id, created_at = excluded.created_at, expires_at = excluded.expires_at";
        let params = (
            record.key.as_str(),
            record.user_id.as_str(),
            record.request_hash.as_str(),
            record.roadmap_id.as_str(),
            to_rfc3339(&record.created_at),
            to_rfc3339(&record.expires_at),
        );
        self.conn
            .execute(sql, params)
            .map_err(LearnQuestError::internal)?;
        Ok(())
    }

    fn cleanup(&self, now: DateTime<Utc>) -> Result<u64, LearnQuestError> {
        let affected = self
            .conn
            .execute(
                "DELETE FROM idempotency_keys WHERE expires_at < ?1",
                [to_rfc3339(&now)],
            )
            .map_err(LearnQuestError::internal)?;
        Ok(affected as u64)
    }
}

fn map_record_row(row: &rusqlite::Row<'_>) -> Result<IdempotencyRecord, LearnQuestError> {
    let key: String = row.get(0).map_err(LearnQuestError::internal)?;
    let user_id: String = row.get(1).map_err(LearnQuestError::internal)?;
    let request_hash: String = row.get(2).map_err(LearnQuestError::internal)?;
    let roadmap_id: String = row.get(3).map_err(LearnQuestError::internal)?;
    let created_at: String = row.get(4).map_err(LearnQuestError::internal)?;
    let expires_at: String = row.get(5).map_err(LearnQuestError::internal)?;
    Ok(IdempotencyRecord {
        key,
        user_id: UserId::new(user_id).map_err(LearnQuestError::internal)?,
        request_hash,
        roadmap_id: RoadmapId::new(roadmap_id).map_err(LearnQuestError::internal)?,
        created_at: from_rfc3339(&created_at).map_err(LearnQuestError::internal)?,
        expires_at: from_rfc3339(&expires_at).map_err(LearnQuestError::internal)?,
    })
}
