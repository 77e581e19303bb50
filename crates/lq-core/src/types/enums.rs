use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Wire labels match the serde representation so the CLI, the database and
/// JSON output all agree on one spelling.
macro_rules! labeled_enum {
    ($name:ident, $kind:expr, { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == needle)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Domain,
    Tool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillProgress {
    NotStarted,
    InProgress,
    Mastered,
}

/// Difficulty tier. Drives roadmap cost and labels video difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentFormat {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementKind {
    FirstRoadmap,
    FirstSkillMastered,
    RoadmapCompleted,
    WeekStreak,
}

labeled_enum!(SkillLevel, "skill level", {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
    Expert => "expert",
});

labeled_enum!(SkillCategory, "skill category", {
    Technical => "technical",
    Soft => "soft",
    Domain => "domain",
    Tool => "tool",
});

labeled_enum!(SkillProgress, "skill progress", {
    NotStarted => "not-started",
    InProgress => "in-progress",
    Mastered => "mastered",
});

labeled_enum!(Tier, "tier", {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

labeled_enum!(ContentFormat, "format", {
    Short => "short",
    Long => "long",
});

labeled_enum!(AchievementKind, "achievement", {
    FirstRoadmap => "first-roadmap",
    FirstSkillMastered => "first-skill-mastered",
    RoadmapCompleted => "roadmap-completed",
    WeekStreak => "week-streak",
});

impl SkillLevel {
    /// Video difficulty for content teaching a skill at this level.
    pub fn video_tier(self) -> Tier {
        match self {
            Self::Beginner => Tier::Beginner,
            Self::Intermediate => Tier::Intermediate,
            Self::Advanced | Self::Expert => Tier::Advanced,
        }
    }
}

impl AchievementKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::FirstRoadmap => "Trailblazer",
            Self::FirstSkillMastered => "First Mastery",
            Self::RoadmapCompleted => "Finisher",
            Self::WeekStreak => "Week Warrior",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_serde_representation() {
        for progress in SkillProgress::ALL {
            let json = serde_json::to_value(progress).unwrap();
            assert_eq!(json, serde_json::Value::String(progress.as_str().to_string()));
        }
        for kind in AchievementKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("In-Progress".parse::<SkillProgress>(), Ok(SkillProgress::InProgress));
        assert_eq!(" LONG ".parse::<ContentFormat>(), Ok(ContentFormat::Long));
        let err = "expert".parse::<Tier>().unwrap_err();
        assert_eq!(err.kind, "tier");
    }

    #[test]
    fn expert_skills_use_advanced_videos() {
        assert_eq!(SkillLevel::Expert.video_tier(), Tier::Advanced);
        assert_eq!(SkillLevel::Beginner.video_tier(), Tier::Beginner);
    }
}
