use clap::{Args, Subcommand};
use lq_core::types::{CreateProfileInput, UserId};
use lq_core::{LearnQuest, LearnQuestError, RequestContext, Store};

use super::Outcome;

#[derive(Subcommand)]
pub enum ProfileCommand {
    Create(CreateArgs),
    Show(ShowArgs),
    List,
    /// Credit tokens to a profile
    Grant(GrantArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    /// Starting balance; defaults to `starting_tokens` from config
    #[arg(long)]
    pub tokens: Option<u32>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: UserId,
}

#[derive(Args)]
pub struct GrantArgs {
    pub id: UserId,
    pub amount: u32,
}

pub fn handle<S: Store>(
    lq: &LearnQuest<S>,
    ctx: &RequestContext,
    cmd: ProfileCommand,
) -> Result<Outcome, LearnQuestError> {
    match cmd {
        ProfileCommand::Create(args) => {
            let input = CreateProfileInput {
                display_name: args.name,
                starting_tokens: args.tokens,
            };
            lq.profiles().create(ctx, input).map(Outcome::Profile)
        }
        ProfileCommand::Show(args) => lq.profiles().get(&args.id).map(Outcome::Profile),
        ProfileCommand::List => lq.profiles().list().map(Outcome::Profiles),
        ProfileCommand::Grant(args) => lq
            .profiles()
            .grant(ctx, &args.id, args.amount)
            .map(Outcome::Profile),
    }
}
