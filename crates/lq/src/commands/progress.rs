use clap::{Args, Subcommand};
use lq_core::types::{SkillId, SkillProgress, VideoId};
use lq_core::{LearnQuest, LearnQuestError, RequestContext, Store};

use super::Outcome;

#[derive(Subcommand)]
pub enum SkillCommand {
    /// Set a skill's progress (not-started, in-progress, mastered)
    Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
    pub id: SkillId,
    pub progress: SkillProgress,
}

#[derive(Subcommand)]
pub enum VideoCommand {
    Complete(VideoArgs),
    Reset(VideoArgs),
}

#[derive(Args)]
pub struct VideoArgs {
    pub id: VideoId,
}

pub fn handle_skill<S: Store>(
    lq: &LearnQuest<S>,
    ctx: &RequestContext,
    cmd: SkillCommand,
) -> Result<Outcome, LearnQuestError> {
    match cmd {
        SkillCommand::Set(args) => lq
            .roadmaps()
            .set_skill_progress(ctx, &args.id, args.progress)
            .map(Outcome::Roadmap),
    }
}

pub fn handle_video<S: Store>(
    lq: &LearnQuest<S>,
    ctx: &RequestContext,
    cmd: VideoCommand,
) -> Result<Outcome, LearnQuestError> {
    let (id, completed) = match cmd {
        VideoCommand::Complete(args) => (args.id, true),
        VideoCommand::Reset(args) => (args.id, false),
    };
    lq.roadmaps()
        .set_video_completed(ctx, &id, completed)
        .map(Outcome::Roadmap)
}
