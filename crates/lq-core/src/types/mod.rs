pub mod enums;
pub mod event;
pub mod goal;
pub mod ids;
pub mod io;
pub mod profile;
pub mod roadmap;

pub use enums::{
    AchievementKind, ContentFormat, SkillCategory, SkillLevel, SkillProgress, Tier, UnknownVariant,
};
pub use event::EventBody;
pub use goal::Goal;
pub use ids::{IdError, IdGenerator, RoadmapId, SkillId, UserId, VideoId};
pub use io::{CreateProfileInput, CreateRoadmapInput};
pub use profile::{Achievement, UserProfile};
pub use roadmap::{format_duration, Roadmap, RoadmapProgress, Skill, VideoResource};
