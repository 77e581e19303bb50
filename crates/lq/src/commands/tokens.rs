use clap::Args;
use lq_core::types::{ContentFormat, Tier, UserId};
use lq_core::{LearnQuest, LearnQuestError, Store};

use super::{Outcome, Quote};

#[derive(Args)]
pub struct QuoteArgs {
    #[arg(long, default_value = "beginner")]
    pub tier: Tier,
    #[arg(long, default_value = "short")]
    pub format: ContentFormat,
    /// Also report whether this profile can afford it
    #[arg(long)]
    pub user: Option<UserId>,
}

pub fn handle<S: Store>(lq: &LearnQuest<S>, args: QuoteArgs) -> Result<Outcome, LearnQuestError> {
    let cost = lq.tokens().quote(args.tier, args.format);
    let (balance, affordable) = match &args.user {
        Some(user) => {
            let profile = lq.profiles().get(user)?;
            let affordable = lq.tokens().can_afford(user, args.tier, args.format)?;
            (Some(profile.tokens), Some(affordable))
        }
        None => (None, None),
    };
    Ok(Outcome::Quote(Quote {
        tier: args.tier,
        format: args.format,
        cost,
        balance,
        affordable,
    }))
}
