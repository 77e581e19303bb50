use crate::util::{decode_enum, encode_enum, from_rfc3339, to_rfc3339};
use chrono::{DateTime, Utc};
use lq_core::LearnQuestError;
use lq_core::achievements::AchievementRepository;
use lq_core::types::{Achievement, AchievementKind, UserId};
use rusqlite::Connection;

pub struct AchievementRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> AchievementRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> AchievementRepository for AchievementRepo<'a> {
    fn unlock(
        &self,
        user_id: &UserId,
        kind: AchievementKind,
        at: DateTime<Utc>,
    ) -> Result<bool, LearnQuestError> {
        let affected = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO achievements (user_id, kind, unlocked_at) VALUES (?1, ?2, ?3)",
                (
                    user_id.as_str(),
                    encode_enum(&kind).map_err(LearnQuestError::internal)?,
                    to_rfc3339(&at),
                ),
            )
            .map_err(LearnQuestError::internal)?;
        Ok(affected == 1)
    }

    fn list(&self, user_id: &UserId) -> Result<Vec<Achievement>, LearnQuestError> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, unlocked_at FROM achievements WHERE user_id = ?1 ORDER BY unlocked_at ASC, kind ASC")
            .map_err(LearnQuestError::internal)?;
        let mut rows = stmt
            .query([user_id.as_str()])
            .map_err(LearnQuestError::internal)?;
        let mut achievements = Vec::new();
        while let Some(row) = rows.next().map_err(LearnQuestError::internal)? {
            let kind: String = row.get(0).map_err(LearnQuestError::internal)?;
            let unlocked_at: String = row.get(1).map_err(LearnQuestError::internal)?;
            achievements.push(Achievement {
                user_id: user_id.clone(),
                kind: decode_enum(&kind).map_err(LearnQuestError::internal)?,
                unlocked_at: from_rfc3339(&unlocked_at).map_err(LearnQuestError::internal)?,
            });
        }
        Ok(achievements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_repo::ProfileRepo;
    use crate::schema::with_test_db;
    use lq_core::profiles::ProfileRepository;
    use lq_core::types::IdGenerator;

    #[test]
    fn unlock_is_idempotent() {
        let conn = with_test_db().unwrap();
        let profile = ProfileRepo::new(&conn)
            .create(IdGenerator::new().user_id(), "Ada".to_string(), 0)
            .unwrap();
        let repo = AchievementRepo::new(&conn);
        let now = Utc::now();
        assert!(repo.unlock(&profile.id, AchievementKind::FirstRoadmap, now).unwrap());
        assert!(!repo.unlock(&profile.id, AchievementKind::FirstRoadmap, now).unwrap());
        let listed = repo.list(&profile.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, AchievementKind::FirstRoadmap);
    }
}
