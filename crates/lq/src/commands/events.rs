use clap::Args;
use lq_core::types::UserId;
use lq_core::{LearnQuest, LearnQuestError, Store};

use super::Outcome;

#[derive(Args)]
pub struct EventsArgs {
    /// Only events with a sequence number greater than this
    #[arg(long)]
    pub after: Option<i64>,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct AchievementsArgs {
    pub user: UserId,
}

pub fn handle_events<S: Store>(
    lq: &LearnQuest<S>,
    args: EventsArgs,
) -> Result<Outcome, LearnQuestError> {
    lq.events()
        .list(args.after, args.limit)
        .map(Outcome::Events)
}

pub fn handle_achievements<S: Store>(
    lq: &LearnQuest<S>,
    args: AchievementsArgs,
) -> Result<Outcome, LearnQuestError> {
    lq.profiles()
        .achievements(&args.user)
        .map(Outcome::Achievements)
}
