mod commands;
mod config;
mod error;
mod output;

use chrono::Utc;
use clap::{Parser, Subcommand};
use lq_core::idempotency::IdempotencyRepository;
use lq_core::{LearnQuest, LearnQuestError, LearnQuestOptions, RequestContext, Store};
use lq_db::{schema, DbStore};
use lq_events::bus::EventBus;
use lq_events::types::EventSource;
use owo_colors::{OwoColorize, Stream};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::catalog::CatalogArgs;
use crate::commands::events::{AchievementsArgs, EventsArgs};
use crate::commands::profile::ProfileCommand;
use crate::commands::progress::{SkillCommand, VideoCommand};
use crate::commands::roadmap::RoadmapCommand;
use crate::commands::tokens::QuoteArgs;
use crate::commands::Outcome;
use crate::config::{Config, EnvOverrides};
use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "lq", version, about = "Skill roadmaps, progress and tokens")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Show the token cost of a roadmap
    Quote(QuoteArgs),
    #[command(subcommand)]
    Roadmap(RoadmapCommand),
    #[command(subcommand)]
    Skill(SkillCommand),
    #[command(subcommand)]
    Video(VideoCommand),
    /// Show the skills a profession resolves to
    Catalog(CatalogArgs),
    Events(EventsArgs),
    Achievements(AchievementsArgs),
}

fn main() {
    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref(), &EnvOverrides::from_env()) {
        Ok(config) => config,
        Err(err) => exit_with(&err.into()),
    };
    init_tracing(&config.log_filter);

    let result = run(cli.command, &config).and_then(|outcome| output::print(&outcome, cli.json));
    if let Err(err) = result {
        exit_with(&err);
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn exit_with(err: &CliError) -> ! {
    eprintln!(
        "{} {err}",
        "error:".if_supports_color(Stream::Stderr, |t| t.red())
    );
    std::process::exit(1)
}

fn run(command: Command, config: &Config) -> Result<Outcome> {
    let command = match command {
        Command::Catalog(args) => return Ok(commands::catalog::handle(args)),
        other => other,
    };
    let lq = open_service(config)?;
    let ctx = RequestContext::new(EventSource::Cli, None);
    let outcome = match command {
        Command::Profile(cmd) => commands::profile::handle(&lq, &ctx, cmd)?,
        Command::Quote(args) => commands::tokens::handle(&lq, args)?,
        Command::Roadmap(cmd) => commands::roadmap::handle(&lq, &ctx, cmd)?,
        Command::Skill(cmd) => commands::progress::handle_skill(&lq, &ctx, cmd)?,
        Command::Video(cmd) => commands::progress::handle_video(&lq, &ctx, cmd)?,
        Command::Events(args) => commands::events::handle_events(&lq, args)?,
        Command::Achievements(args) => commands::events::handle_achievements(&lq, args)?,
        Command::Catalog(args) => commands::catalog::handle(args),
    };
    Ok(outcome)
}

fn open_service(config: &Config) -> Result<LearnQuest<DbStore>> {
    if let Some(parent) = Path::new(&config.db_path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|source| CliError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = schema::open_and_migrate(&config.db_path).map_err(LearnQuestError::internal)?;
    let store = DbStore::new(conn);
    match store.idempotency().cleanup(Utc::now()) {
        Ok(0) => {}
        Ok(removed) => tracing::debug!(removed, "expired idempotency keys removed"),
        Err(err) => tracing::warn!("idempotency cleanup failed: {err}"),
    }
    let options = LearnQuestOptions {
        starting_tokens: config.starting_tokens,
        ..LearnQuestOptions::default()
    };
    Ok(LearnQuest::with_options(store, EventBus::new(64), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lq_core::types::SkillProgress;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn temp_config(dir: &tempfile::TempDir) -> Config {
        Config {
            db_path: dir
                .path()
                .join("data/learnquest.db")
                .to_string_lossy()
                .into_owned(),
            ..Config::default()
        }
    }

    fn exec(config: &Config, args: &[&str]) -> Outcome {
        run(parse(args).command, config).unwrap()
    }

    #[test]
    fn parses_enum_arguments_case_insensitively() {
        let cli = parse(&["lq", "quote", "--tier", "Advanced", "--format", "LONG", "--json"]);
        assert!(cli.json);
        match cli.command {
            Command::Quote(args) => {
                assert_eq!(args.tier.as_str(), "advanced");
                assert_eq!(args.format.as_str(), "long");
            }
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(Cli::try_parse_from(["lq", "profile", "show", "roadmap_nope"]).is_err());
        assert!(Cli::try_parse_from(["lq", "skill", "set", "skill_x", "bogus"]).is_err());
    }

    #[test]
    fn catalog_needs_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        exec(&config, &["lq", "catalog", "ux designer"]);
        assert!(!Path::new(&config.db_path).exists());
    }

    #[test]
    fn full_flow_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            starting_tokens: 500,
            ..temp_config(&dir)
        };

        let user = match exec(&config, &["lq", "profile", "create", "--name", "Grace"]) {
            Outcome::Profile(profile) => profile,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(user.tokens, 500);
        let user_id = user.id.to_string();

        let roadmap = match exec(
            &config,
            &[
                "lq",
                "roadmap",
                "create",
                "--user",
                &user_id,
                "--profession",
                "web developer",
                "--idempotency-key",
                "k1",
            ],
        ) {
            Outcome::Roadmap(roadmap) => roadmap,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(roadmap.goal.title, "Become a web developer");
        assert_eq!(roadmap.cost, 200);

        let skill_id = roadmap.skills[0].id.to_string();
        match exec(&config, &["lq", "skill", "set", &skill_id, "mastered"]) {
            Outcome::Roadmap(updated) => {
                assert_eq!(updated.skills[0].progress, SkillProgress::Mastered)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let roadmap_id = roadmap.id.to_string();
        match exec(&config, &["lq", "roadmap", "progress", &roadmap_id]) {
            Outcome::Progress(report) => assert_eq!(report.progress.completion, 8),
            other => panic!("unexpected outcome: {other:?}"),
        }

        match exec(&config, &["lq", "quote", "--user", &user_id, "--tier", "advanced"]) {
            Outcome::Quote(quote) => {
                assert_eq!(quote.cost, 400);
                assert_eq!(quote.balance, Some(300));
                assert_eq!(quote.affordable, Some(false));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        match exec(&config, &["lq", "achievements", &user_id]) {
            Outcome::Achievements(list) => assert_eq!(list.len(), 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn service_errors_surface_as_cli_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            starting_tokens: 100,
            ..temp_config(&dir)
        };
        let user = match exec(&config, &["lq", "profile", "create", "--name", "Lin"]) {
            Outcome::Profile(profile) => profile,
            other => panic!("unexpected outcome: {other:?}"),
        };
        let user_id = user.id.to_string();
        let cli = parse(&[
            "lq",
            "roadmap",
            "create",
            "--user",
            &user_id,
            "--profession",
            "data scientist",
        ]);
        let err = run(cli.command, &config).unwrap_err();
        assert!(err.to_string().contains("insufficient tokens"));
    }
}
