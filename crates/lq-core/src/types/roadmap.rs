use crate::types::enums::{ContentFormat, SkillCategory, SkillLevel, SkillProgress, Tier};
use crate::types::goal::Goal;
use crate::types::ids::{RoadmapId, SkillId, UserId, VideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResource {
    pub id: VideoId,
    pub title: String,
    pub url: String,
    pub channel: String,
    pub duration_secs: u32,
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
    pub difficulty: Tier,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub completed: bool,
}

impl VideoResource {
    pub fn display_duration(&self) -> String {
        format_duration(self.duration_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    pub level: SkillLevel,
    pub category: SkillCategory,
    pub progress: SkillProgress,
    pub importance: u8,
    /// Names of skills worth learning first. Never gates progress.
    pub prerequisites: Vec<String>,
    pub resources: Vec<VideoResource>,
    pub estimated_time_to_learn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: RoadmapId,
    pub user_id: UserId,
    pub goal: Goal,
    pub tier: Tier,
    pub format: ContentFormat,
    pub cost: u32,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| &skill.id == id)
    }

    pub fn video_count(&self) -> usize {
        self.skills.iter().map(|skill| skill.resources.len()).sum()
    }
}

/// Derived rollup of a roadmap's progress. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapProgress {
    pub total_skills: usize,
    pub mastered: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub total_videos: usize,
    pub completed_videos: usize,
    pub completion: u8,
}

/// Renders seconds as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_duration(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
