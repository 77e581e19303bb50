//! Roadmap completion.
//!
//! Videos are the smallest unit of progress. A skill's three-state progress
//! is derived from its videos whenever a video changes, and may also be set
//! directly. Roadmap completion is always computed from skill states:
//! mastered counts fully, in-progress counts half.

use crate::error::RoadmapError;
use crate::types::{Roadmap, RoadmapProgress, Skill, SkillId, SkillProgress, VideoId, VideoResource};
use chrono::{DateTime, Utc};

/// `round_half_up((mastered + in_progress / 2) / total * 100)`, or 0 for an
/// empty roadmap. Integer arithmetic; the result never exceeds 100 as long as
/// `mastered + in_progress <= total`.
pub fn completion_from_counts(mastered: usize, in_progress: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let mastered = mastered.min(total);
    let in_progress = in_progress.min(total - mastered);
    let half_points = (2 * mastered + in_progress) * 100;
    let denominator = 2 * total;
    ((half_points + total) / denominator) as u8
}

pub fn compute_completion(roadmap: &Roadmap) -> u8 {
    summarize(roadmap).completion
}

pub fn summarize(roadmap: &Roadmap) -> RoadmapProgress {
    let mut mastered = 0;
    let mut in_progress = 0;
    let mut not_started = 0;
    for skill in &roadmap.skills {
        match skill.progress {
            SkillProgress::Mastered => mastered += 1,
            SkillProgress::InProgress => in_progress += 1,
            SkillProgress::NotStarted => not_started += 1,
        }
    }
    let total_videos = roadmap.video_count();
    let completed_videos = roadmap
        .skills
        .iter()
        .flat_map(|skill| skill.resources.iter())
        .filter(|video| video.completed)
        .count();
    RoadmapProgress {
        total_skills: roadmap.skills.len(),
        mastered,
        in_progress,
        not_started,
        total_videos,
        completed_videos,
        completion: completion_from_counts(mastered, in_progress, roadmap.skills.len()),
    }
}

/// Progress implied by a skill's videos; `None` when it has no videos.
pub fn derive_skill_progress(videos: &[VideoResource]) -> Option<SkillProgress> {
    if videos.is_empty() {
        return None;
    }
    let done = videos.iter().filter(|video| video.completed).count();
    Some(if done == 0 {
        SkillProgress::NotStarted
    } else if done == videos.len() {
        SkillProgress::Mastered
    } else {
        SkillProgress::InProgress
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillChange {
    pub skill_id: SkillId,
    pub from: SkillProgress,
    pub to: SkillProgress,
    pub completion: u8,
    /// Whether anything on the roadmap changed, including video flags.
    pub touched: bool,
}

impl SkillChange {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoChange {
    pub skill: SkillChange,
    pub video_id: VideoId,
    pub completed: bool,
    pub video_changed: bool,
}

fn skill_mut<'a>(roadmap: &'a mut Roadmap, id: &SkillId) -> Result<&'a mut Skill, RoadmapError> {
    roadmap
        .skills
        .iter_mut()
        .find(|skill| &skill.id == id)
        .ok_or(RoadmapError::SkillNotFound)
}

/// Sets a skill's progress. `Mastered` completes every video, `NotStarted`
/// clears them, `InProgress` leaves them as they are.
pub fn set_skill_progress(
    roadmap: &mut Roadmap,
    skill_id: &SkillId,
    progress: SkillProgress,
    now: DateTime<Utc>,
) -> Result<SkillChange, RoadmapError> {
    let skill = skill_mut(roadmap, skill_id)?;
    let from = skill.progress;
    let mut touched = from != progress;
    match progress {
        SkillProgress::Mastered | SkillProgress::NotStarted => {
            let completed = progress == SkillProgress::Mastered;
            for video in skill.resources.iter_mut() {
                touched |= video.completed != completed;
                video.completed = completed;
            }
        }
        SkillProgress::InProgress => {}
    }
    skill.progress = progress;
    if touched {
        roadmap.updated_at = now;
    }
    Ok(SkillChange {
        skill_id: skill_id.clone(),
        from,
        to: progress,
        completion: compute_completion(roadmap),
        touched,
    })
}

/// Flags one video and re-derives its skill's progress from its videos.
pub fn set_video_completed(
    roadmap: &mut Roadmap,
    video_id: &VideoId,
    completed: bool,
    now: DateTime<Utc>,
) -> Result<VideoChange, RoadmapError> {
    let skill = roadmap
        .skills
        .iter_mut()
        .find(|skill| skill.resources.iter().any(|video| &video.id == video_id))
        .ok_or(RoadmapError::VideoNotFound)?;
    let from = skill.progress;
    let mut video_changed = false;
    for video in skill.resources.iter_mut().filter(|video| &video.id == video_id) {
        video_changed = video.completed != completed;
        video.completed = completed;
    }
    if let Some(derived) = derive_skill_progress(&skill.resources) {
        skill.progress = derived;
    }
    let to = skill.progress;
    let skill_id = skill.id.clone();
    let touched = video_changed || from != to;
    if touched {
        roadmap.updated_at = now;
    }
    Ok(VideoChange {
        skill: SkillChange {
            skill_id,
            from,
            to,
            completion: compute_completion(roadmap),
            touched,
        },
        video_id: video_id.clone(),
        completed,
        video_changed,
    })
}
