use clap::{Args, Subcommand};
use lq_core::types::{ContentFormat, CreateRoadmapInput, Goal, RoadmapId, Tier, UserId};
use lq_core::{LearnQuest, LearnQuestError, RequestContext, Store};

use super::{Outcome, ProgressReport};

#[derive(Subcommand)]
pub enum RoadmapCommand {
    /// Generate a roadmap for a profession and charge its cost
    Create(CreateArgs),
    Show(ShowArgs),
    List(ListArgs),
    Progress(ShowArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub user: UserId,
    #[arg(long)]
    pub profession: String,
    /// Roadmap title; defaults to "Become a <profession>"
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, default_value = "beginner")]
    pub tier: Tier,
    #[arg(long, default_value = "short")]
    pub format: ContentFormat,
    #[arg(long)]
    pub short_term: Option<String>,
    #[arg(long)]
    pub long_term: Option<String>,
    /// Retrying with the same key returns the first roadmap without a second charge
    #[arg(long)]
    pub idempotency_key: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: RoadmapId,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub user: UserId,
}

pub fn handle<S: Store>(
    lq: &LearnQuest<S>,
    ctx: &RequestContext,
    cmd: RoadmapCommand,
) -> Result<Outcome, LearnQuestError> {
    match cmd {
        RoadmapCommand::Create(args) => {
            let ctx = match args.idempotency_key {
                Some(key) => ctx.clone().with_idempotency_key(key),
                None => ctx.clone(),
            };
            let title = args
                .title
                .unwrap_or_else(|| format!("Become a {}", args.profession.trim()));
            let goal = Goal {
                short_term_goals: args.short_term,
                long_term_goals: args.long_term,
                ..Goal::new(title, args.profession)
            };
            let input = CreateRoadmapInput {
                goal,
                tier: args.tier,
                format: args.format,
            };
            lq.roadmaps()
                .create(&ctx, &args.user, input)
                .map(Outcome::Roadmap)
        }
        RoadmapCommand::Show(args) => lq.roadmaps().get(&args.id).map(Outcome::Roadmap),
        RoadmapCommand::List(args) => lq.roadmaps().list(&args.user).map(Outcome::Roadmaps),
        RoadmapCommand::Progress(args) => {
            let roadmap = lq.roadmaps().get(&args.id)?;
            let progress = lq.roadmaps().progress(&args.id)?;
            Ok(Outcome::Progress(ProgressReport {
                roadmap_id: roadmap.id,
                title: roadmap.goal.title,
                progress,
            }))
        }
    }
}
