pub mod catalog;
pub mod events;
pub mod profile;
pub mod progress;
pub mod roadmap;
pub mod tokens;

use lq_core::catalog::SkillTemplate;
use lq_core::types::{
    Achievement, ContentFormat, Roadmap, RoadmapId, RoadmapProgress, Tier, UserProfile,
};
use lq_events::types::EventRecord;
use serde::Serialize;

/// What a command produced. Rendered as text or, with `--json`, as the bare
/// inner value.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Profile(UserProfile),
    Profiles(Vec<UserProfile>),
    Quote(Quote),
    Roadmap(Roadmap),
    Roadmaps(Vec<Roadmap>),
    Progress(ProgressReport),
    Catalog(CatalogEntry),
    Professions(Vec<&'static str>),
    Events(Vec<EventRecord>),
    Achievements(Vec<Achievement>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub tier: Tier,
    pub format: ContentFormat,
    pub cost: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affordable: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub roadmap_id: RoadmapId,
    pub title: String,
    #[serde(flatten)]
    pub progress: RoadmapProgress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub profession: String,
    pub skills: &'static [SkillTemplate],
}
