use crate::util::{from_iso_date, from_rfc3339, to_iso_date, to_rfc3339, to_u32};
use chrono::NaiveDate;
use lq_core::LearnQuestError;
use lq_core::error::{ProfileError, TokenError};
use lq_core::profiles::ProfileRepository;
use lq_core::types::{UserId, UserProfile};
use rusqlite::{Connection, OptionalExtension};

const PROFILE_COLUMNS: &str =
    "id, display_name, tokens, streak_days, last_active_on, created_at, updated_at";

pub struct ProfileRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> ProfileRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: &UserId) -> Result<UserProfile, LearnQuestError> {
        Ok(self.get(id)?.ok_or(ProfileError::NotFound)?)
    }
}

fn db_err(err: impl std::fmt::Display) -> LearnQuestError {
    LearnQuestError::internal(err)
}

impl<'a> ProfileRepository for ProfileRepo<'a> {
    fn create(
        &self,
        id: UserId,
        display_name: String,
        tokens: u32,
    ) -> Result<UserProfile, LearnQuestError> {
        let now = chrono::Utc::now();
        let profile = UserProfile {
            id,
            display_name,
            tokens,
            streak_days: 0,
            last_active_on: None,
            created_at: now,
            updated_at: now,
        };
        let sql = format!("INSERT INTO profiles ({PROFILE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)");
        let params = (
            profile.id.as_str(),
            profile.display_name.as_str(),
            profile.tokens,
            profile.streak_days,
            profile.last_active_on.as_ref().map(to_iso_date),
            to_rfc3339(&profile.created_at),
            to_rfc3339(&profile.updated_at),
        );
        self.conn.execute(&sql, params).map_err(db_err)?;
        Ok(profile)
    }

    fn get(&self, id: &UserId) -> Result<Option<UserProfile>, LearnQuestError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([id.as_str()]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        Ok(Some(map_profile_row(row)?))
    }

    fn list(&self) -> Result<Vec<UserProfile>, LearnQuestError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at ASC, id ASC");
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            profiles.push(map_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn try_debit(&self, id: &UserId, cost: u32) -> Result<Option<u32>, LearnQuestError> {
        let now = to_rfc3339(&chrono::Utc::now());
        let balance: Option<i64> = self
            .conn
            .query_row(
                "UPDATE profiles SET tokens = tokens - ?1, updated_at = ?2 WHERE id = ?3 AND tokens >= ?1 RETURNING tokens",
                (cost, now, id.as_str()),
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        balance.map(to_u32).transpose().map_err(db_err)
    }

    fn credit(&self, id: &UserId, amount: u32) -> Result<UserProfile, LearnQuestError> {
        let headroom = u32::MAX - amount;
        let affected = self
            .conn
            .execute(
                "UPDATE profiles SET tokens = tokens + ?1, updated_at = ?2 WHERE id = ?3 AND tokens <= ?4",
                (amount, to_rfc3339(&chrono::Utc::now()), id.as_str(), headroom),
            )
            .map_err(db_err)?;
        if affected == 0 {
            self.require(id)?;
            return Err(TokenError::Overflow.into());
        }
        self.require(id)
    }

    fn record_activity(
        &self,
        id: &UserId,
        streak_days: u32,
        on: NaiveDate,
    ) -> Result<UserProfile, LearnQuestError> {
        let affected = self
            .conn
            .execute(
                "UPDATE profiles SET streak_days = ?1, last_active_on = ?2, updated_at = ?3 WHERE id = ?4",
                (
                    streak_days,
                    to_iso_date(&on),
                    to_rfc3339(&chrono::Utc::now()),
                    id.as_str(),
                ),
            )
            .map_err(db_err)?;
        if affected == 0 {
            return Err(ProfileError::NotFound.into());
        }
        self.require(id)
    }
}

fn map_profile_row(row: &rusqlite::Row<'_>) -> Result<UserProfile, LearnQuestError> {
    let id: String = row.get(0).map_err(db_err)?;
    let display_name: String = row.get(1).map_err(db_err)?;
    let tokens: i64 = row.get(2).map_err(db_err)?;
    let streak_days: i64 = row.get(3).map_err(db_err)?;
    let last_active_on: Option<String> = row.get(4).map_err(db_err)?;
    let created_at: String = row.get(5).map_err(db_err)?;
    let updated_at: String = row.get(6).map_err(db_err)?;

    Ok(UserProfile {
        id: UserId::new(id).map_err(db_err)?,
        display_name,
        tokens: to_u32(tokens).map_err(db_err)?,
        streak_days: to_u32(streak_days).map_err(db_err)?,
        last_active_on: last_active_on
            .as_deref()
            .map(from_iso_date)
            .transpose()
            .map_err(db_err)?,
        created_at: from_rfc3339(&created_at).map_err(db_err)?,
        updated_at: from_rfc3339(&updated_at).map_err(db_err)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use lq_core::types::IdGenerator;

    fn fresh_id() -> UserId {
        IdGenerator::new().user_id()
    }

    #[test]
    fn debit_is_conditional() {
        let conn = with_test_db().unwrap();
        let repo = ProfileRepo::new(&conn);
        let profile = repo.create(fresh_id(), "Ada".to_string(), 150).unwrap();

        assert_eq!(repo.try_debit(&profile.id, 200).unwrap(), None);
        assert_eq!(repo.get(&profile.id).unwrap().unwrap().tokens, 150);

        assert_eq!(repo.try_debit(&profile.id, 150).unwrap(), Some(0));
        assert_eq!(repo.get(&profile.id).unwrap().unwrap().tokens, 0);
    }

    #[test]
    fn debit_of_missing_profile_is_none() {
        let conn = with_test_db().unwrap();
        let repo = ProfileRepo::new(&conn);
        let ghost = fresh_id();
        assert_eq!(repo.try_debit(&ghost, 1).unwrap(), None);
    }

    #[test]
    fn credit_guards_overflow() {
        let conn = with_test_db().unwrap();
        let repo = ProfileRepo::new(&conn);
        let profile = repo.create(fresh_id(), "Grace".to_string(), u32::MAX - 5).unwrap();
        assert!(matches!(
            repo.credit(&profile.id, 10),
            Err(LearnQuestError::Token(TokenError::Overflow))
        ));
        assert_eq!(repo.credit(&profile.id, 5).unwrap().tokens, u32::MAX);
    }

    #[test]
    fn activity_is_persisted() {
        let conn = with_test_db().unwrap();
        let repo = ProfileRepo::new(&conn);
        let profile = repo.create(fresh_id(), "Linus".to_string(), 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let updated = repo.record_activity(&profile.id, 3, day).unwrap();
        assert_eq!(updated.streak_days, 3);
        assert_eq!(updated.last_active_on, Some(day));
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn create_keeps_the_minted_id() {
        let conn = with_test_db().unwrap();
        let repo = ProfileRepo::new(&conn);
        let id = fresh_id();
        let profile = repo.create(id.clone(), "Ada".to_string(), 10).unwrap();
        assert_eq!(profile.id, id);
        assert_eq!(repo.get(&id).unwrap().unwrap().display_name, "Ada");
    }

    #[test]
    fn storage_failures_are_internal() {
        let conn = with_test_db().unwrap();
        conn.execute_batch("DROP TABLE achievements; DROP TABLE idempotency_keys; DROP TABLE videos; DROP TABLE skills; DROP TABLE roadmaps; DROP TABLE profiles;")
            .unwrap();
        let repo = ProfileRepo::new(&conn);
        assert!(matches!(
            repo.get(&fresh_id()),
            Err(LearnQuestError::Internal { .. })
        ));
        assert!(matches!(
            repo.create(fresh_id(), "Ada".to_string(), 0),
            Err(LearnQuestError::Internal { .. })
        ));
    }
}
