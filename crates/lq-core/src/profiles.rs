use crate::error::LearnQuestError;
use crate::types::{UserId, UserProfile};
use chrono::NaiveDate;

pub trait ProfileRepository {
    fn create(
        &self,
        id: UserId,
        display_name: String,
        tokens: u32,
    ) -> Result<UserProfile, LearnQuestError>;
    fn get(&self, id: &UserId) -> Result<Option<UserProfile>, LearnQuestError>;
    fn list(&self) -> Result<Vec<UserProfile>, LearnQuestError>;
    /// Atomically subtracts `cost` if the balance covers it. Returns the new
    /// balance, or `None` when the profile is missing or cannot afford it.
    fn try_debit(&self, id: &UserId, cost: u32) -> Result<Option<u32>, LearnQuestError>;
    fn credit(&self, id: &UserId, amount: u32) -> Result<UserProfile, LearnQuestError>;
    fn record_activity(
        &self,
        id: &UserId,
        streak_days: u32,
        on: NaiveDate,
    ) -> Result<UserProfile, LearnQuestError>;
}
