use crate::catalog::{self, SkillTemplate};
use crate::types::{
    CreateRoadmapInput, IdGenerator, Roadmap, Skill, SkillProgress, UserId, VideoResource,
};
use chrono::{DateTime, Utc};

/// Supplies the videos attached to a freshly generated skill.
pub trait VideoSource {
    fn videos_for(
        &self,
        template: &SkillTemplate,
        ids: &IdGenerator,
        generated_at: DateTime<Utc>,
    ) -> Vec<VideoResource>;
}

impl<V: VideoSource + ?Sized> VideoSource for Box<V> {
    fn videos_for(
        &self,
        template: &SkillTemplate,
        ids: &IdGenerator,
        generated_at: DateTime<Utc>,
    ) -> Vec<VideoResource> {
        (**self).videos_for(template, ids, generated_at)
    }
}

pub const VIDEOS_PER_SKILL: usize = 3;

const PARTS: [(&str, u32); VIDEOS_PER_SKILL] = [
    ("Introduction", 12 * 60 + 30),
    ("Core Concepts", 18 * 60 + 45),
    ("Hands-on Project", 35 * 60),
];

const CHANNELS: [&str; VIDEOS_PER_SKILL] = ["LearnQuest Academy", "Code Campus", "Skill Forge"];

/// Deterministic stand-in content: three search-link videos per skill with
/// fixed channels and durations, and no view or like counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderVideos;

impl VideoSource for PlaceholderVideos {
    fn videos_for(
        &self,
        template: &SkillTemplate,
        ids: &IdGenerator,
        generated_at: DateTime<Utc>,
    ) -> Vec<VideoResource> {
        PARTS
            .iter()
            .zip(CHANNELS)
            .map(|((part, duration_secs), channel)| {
                let title = format!("{}: {}", template.name, part);
                let query = encode_query(&format!("{} {}", template.name, part));
                VideoResource {
                    id: ids.video_id(),
                    url: format!("https://www.youtube.com/results?search_query={query}"),
                    thumbnail_url: format!("https://placehold.co/480x360?text={query}"),
                    title,
                    channel: channel.to_string(),
                    duration_secs: *duration_secs,
                    published_at: generated_at,
                    difficulty: template.level.video_tier(),
                    views: None,
                    likes: None,
                    completed: false,
                }
            })
            .collect()
    }
}

fn encode_query(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

pub struct RoadmapGenerator<V = PlaceholderVideos> {
    ids: IdGenerator,
    videos: V,
}

impl RoadmapGenerator<PlaceholderVideos> {
    pub fn new() -> Self {
        Self::with_source(PlaceholderVideos)
    }
}

impl Default for RoadmapGenerator<PlaceholderVideos> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VideoSource> RoadmapGenerator<V> {
    pub fn with_source(videos: V) -> Self {
        Self {
            ids: IdGenerator::new(),
            videos,
        }
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Builds an unpersisted roadmap for `owner`. Never fails: the catalog
    /// always yields templates and ids come from a monotonic generator.
    pub fn generate(&self, owner: &UserId, input: &CreateRoadmapInput, cost: u32) -> Roadmap {
        let now = Utc::now();
        let skills = catalog::lookup(&input.goal.profession)
            .iter()
            .map(|template| self.instantiate(template, now))
            .collect();
        Roadmap {
            id: self.ids.roadmap_id(),
            user_id: owner.clone(),
            goal: input.goal.clone(),
            tier: input.tier,
            format: input.format,
            cost,
            skills,
            created_at: now,
            updated_at: now,
        }
    }

    fn instantiate(&self, template: &SkillTemplate, now: DateTime<Utc>) -> Skill {
        Skill {
            id: self.ids.skill_id(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            level: template.level,
            category: template.category,
            progress: SkillProgress::NotStarted,
            importance: template.importance,
            prerequisites: template
                .prerequisites
                .iter()
                .map(|name| name.to_string())
                .collect(),
            resources: self.videos.videos_for(template, &self.ids, now),
            estimated_time_to_learn: Some(template.estimated_time.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentFormat, Goal, Tier};
    use std::collections::HashSet;

    fn input(profession: &str) -> CreateRoadmapInput {
        CreateRoadmapInput {
            goal: Goal::new("Learn it", profession),
            tier: Tier::Beginner,
            format: ContentFormat::Short,
        }
    }

    struct NoVideos;

    impl VideoSource for NoVideos {
        fn videos_for(
            &self,
            _template: &SkillTemplate,
            _ids: &IdGenerator,
            _generated_at: DateTime<Utc>,
        ) -> Vec<VideoResource> {
            Vec::new()
        }
    }

    #[test]
    fn web_developer_roadmap_starts_with_html() {
        let generator = RoadmapGenerator::new();
        let owner = generator.ids().user_id();
        let roadmap = generator.generate(&owner, &input("web developer"), 200);
        assert_eq!(roadmap.skills.len(), 13);
        assert_eq!(roadmap.skills[0].name, "HTML Fundamentals");
        assert_eq!(roadmap.user_id, owner);
        assert_eq!(roadmap.cost, 200);
        assert_eq!(roadmap.created_at, roadmap.updated_at);
        assert!(roadmap
            .skills
            .iter()
            .all(|skill| skill.progress == SkillProgress::NotStarted));
    }

    #[test]
    fn unmatched_profession_uses_generic_skills() {
        let generator = RoadmapGenerator::new();
        let owner = generator.ids().user_id();
        let roadmap = generator.generate(&owner, &input("astronaut"), 200);
        let names: Vec<_> = roadmap.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(&names[..2], &["Time Management", "Communication Skills"]);
    }

    #[test]
    fn back_to_back_roadmaps_share_no_ids() {
        let generator = RoadmapGenerator::new();
        let owner = generator.ids().user_id();
        let first = generator.generate(&owner, &input("web developer"), 200);
        let second = generator.generate(&owner, &input("web developer"), 200);
        assert_ne!(first.id, second.id);
        let first_ids: HashSet<_> = first.skills.iter().map(|s| s.id.clone()).collect();
        assert!(second.skills.iter().all(|s| !first_ids.contains(&s.id)));
        let first_videos: HashSet<_> = first
            .skills
            .iter()
            .flat_map(|s| s.resources.iter().map(|v| v.id.clone()))
            .collect();
        assert!(second
            .skills
            .iter()
            .flat_map(|s| s.resources.iter())
            .all(|v| !first_videos.contains(&v.id)));
    }

    #[test]
    fn placeholder_videos_are_deterministic() {
        let generator = RoadmapGenerator::new();
        let owner = generator.ids().user_id();
        let roadmap = generator.generate(&owner, &input("web developer"), 200);
        let skill = &roadmap.skills[9];
        assert_eq!(skill.resources.len(), VIDEOS_PER_SKILL);
        let video = &skill.resources[0];
        assert_eq!(video.title, "Node.js & Express: Introduction");
        assert_eq!(
            video.url,
            "https://www.youtube.com/results?search_query=Node.js+%26+Express+Introduction"
        );
        assert_eq!(video.channel, "LearnQuest Academy");
        assert_eq!(video.display_duration(), "12:30");
        assert_eq!(video.views, None);
        assert!(!video.completed);
    }

    #[test]
    fn injected_source_replaces_placeholder_content() {
        let generator = RoadmapGenerator::with_source(NoVideos);
        let owner = generator.ids().user_id();
        let roadmap = generator.generate(&owner, &input("ux designer"), 300);
        assert_eq!(roadmap.video_count(), 0);
        assert_eq!(roadmap.skills[0].name, "Design Principles");
    }
}
