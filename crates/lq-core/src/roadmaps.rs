use crate::error::LearnQuestError;
use crate::types::{Roadmap, RoadmapId, SkillId, UserId, VideoId};

pub trait RoadmapRepository {
    fn insert(&self, roadmap: &Roadmap) -> Result<(), LearnQuestError>;
    fn get(&self, id: &RoadmapId) -> Result<Option<Roadmap>, LearnQuestError>;
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Roadmap>, LearnQuestError>;
    /// Writes back skill progress, video completion and `updated_at`.
    fn update_progress(&self, roadmap: &Roadmap) -> Result<(), LearnQuestError>;
    fn find_by_skill(&self, skill_id: &SkillId) -> Result<Option<RoadmapId>, LearnQuestError>;
    fn find_by_video(&self, video_id: &VideoId) -> Result<Option<RoadmapId>, LearnQuestError>;
}
