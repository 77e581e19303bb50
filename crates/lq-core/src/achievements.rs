use crate::error::LearnQuestError;
use crate::progress;
use crate::types::{Achievement, AchievementKind, Roadmap, SkillProgress, UserId};
use chrono::{DateTime, Utc};

pub const WEEK_STREAK_DAYS: u32 = 7;

pub trait AchievementRepository {
    /// Returns `true` when the achievement was not unlocked before.
    fn unlock(
        &self,
        user_id: &UserId,
        kind: AchievementKind,
        at: DateTime<Utc>,
    ) -> Result<bool, LearnQuestError>;
    fn list(&self, user_id: &UserId) -> Result<Vec<Achievement>, LearnQuestError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnerStats {
    pub roadmaps_created: usize,
    pub skills_mastered: usize,
    pub roadmaps_completed: usize,
    pub streak_days: u32,
}

impl LearnerStats {
    pub fn collect(roadmaps: &[Roadmap], streak_days: u32) -> Self {
        let skills_mastered = roadmaps
            .iter()
            .flat_map(|roadmap| roadmap.skills.iter())
            .filter(|skill| skill.progress == SkillProgress::Mastered)
            .count();
        let roadmaps_completed = roadmaps
            .iter()
            .filter(|roadmap| !roadmap.skills.is_empty())
            .filter(|roadmap| progress::compute_completion(roadmap) == 100)
            .count();
        Self {
            roadmaps_created: roadmaps.len(),
            skills_mastered,
            roadmaps_completed,
            streak_days,
        }
    }
}

/// Every achievement the stats qualify for, in declaration order.
pub fn earned(stats: &LearnerStats) -> Vec<AchievementKind> {
    AchievementKind::ALL
        .iter()
        .copied()
        .filter(|kind| match kind {
            AchievementKind::FirstRoadmap => stats.roadmaps_created >= 1,
            AchievementKind::FirstSkillMastered => stats.skills_mastered >= 1,
            AchievementKind::RoadmapCompleted => stats.roadmaps_completed >= 1,
            AchievementKind::WeekStreak => stats.streak_days >= WEEK_STREAK_DAYS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_learner_has_nothing() {
        assert!(earned(&LearnerStats::default()).is_empty());
    }

    #[test]
    fn thresholds() {
        let stats = LearnerStats {
            roadmaps_created: 2,
            skills_mastered: 1,
            roadmaps_completed: 0,
            streak_days: 7,
        };
        assert_eq!(
            earned(&stats),
            vec![
                AchievementKind::FirstRoadmap,
                AchievementKind::FirstSkillMastered,
                AchievementKind::WeekStreak,
            ]
        );
        let stats = LearnerStats {
            streak_days: 6,
            ..stats
        };
        assert!(!earned(&stats).contains(&AchievementKind::WeekStreak));
    }
}
