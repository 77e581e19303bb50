use crate::types::enums::{AchievementKind, SkillProgress};
use crate::types::ids::{RoadmapId, SkillId, UserId, VideoId};
use crate::types::profile::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EventBody {
    ProfileCreated {
        profile: UserProfile,
    },
    TokensGranted {
        user_id: UserId,
        amount: u32,
        balance: u32,
    },
    TokensCharged {
        user_id: UserId,
        roadmap_id: RoadmapId,
        cost: u32,
        balance: u32,
    },
    RoadmapCreated {
        roadmap_id: RoadmapId,
        user_id: UserId,
        profession: String,
        skill_count: usize,
    },
    SkillProgressChanged {
        roadmap_id: RoadmapId,
        skill_id: SkillId,
        from: SkillProgress,
        to: SkillProgress,
        completion: u8,
    },
    VideoCompletionChanged {
        roadmap_id: RoadmapId,
        skill_id: SkillId,
        video_id: VideoId,
        completed: bool,
        completion: u8,
    },
    StreakUpdated {
        user_id: UserId,
        streak_days: u32,
    },
    AchievementUnlocked {
        user_id: UserId,
        achievement: AchievementKind,
    },
}
