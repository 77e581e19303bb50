use crate::commands::{CatalogEntry, Outcome, ProgressReport, Quote};
use crate::error::Result;
use lq_core::types::{Achievement, Roadmap, SkillProgress, UserProfile};
use lq_events::types::EventRecord;
use owo_colors::{OwoColorize, Stream};
use std::io::{self, Write};

const BAR_WIDTH: usize = 20;

pub fn print(outcome: &Outcome, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, outcome)?;
        writeln!(out)?;
    } else {
        render(&mut out, outcome)?;
    }
    Ok(())
}

pub fn render(out: &mut impl Write, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Profile(profile) => render_profile(out, profile),
        Outcome::Profiles(profiles) => {
            if profiles.is_empty() {
                return writeln!(out, "No profiles yet.");
            }
            for profile in profiles {
                writeln!(
                    out,
                    "{}  {}  {} tokens",
                    profile.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    profile.display_name,
                    profile.tokens
                )?;
            }
            Ok(())
        }
        Outcome::Quote(quote) => render_quote(out, quote),
        Outcome::Roadmap(roadmap) => render_roadmap(out, roadmap),
        Outcome::Roadmaps(roadmaps) => {
            if roadmaps.is_empty() {
                return writeln!(out, "No roadmaps yet.");
            }
            for roadmap in roadmaps {
                let completion = lq_core::progress::compute_completion(roadmap);
                writeln!(
                    out,
                    "{}  {} ({})  {}%",
                    roadmap.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    roadmap.goal.title,
                    roadmap.goal.profession,
                    completion
                )?;
            }
            Ok(())
        }
        Outcome::Progress(report) => render_progress(out, report),
        Outcome::Catalog(entry) => render_catalog(out, entry),
        Outcome::Professions(names) => {
            for name in names {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
        Outcome::Events(events) => render_events(out, events),
        Outcome::Achievements(achievements) => render_achievements(out, achievements),
    }
}

fn render_profile(out: &mut impl Write, profile: &UserProfile) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        profile
            .display_name
            .if_supports_color(Stream::Stdout, |t| t.bold()),
        profile.id.if_supports_color(Stream::Stdout, |t| t.dimmed())
    )?;
    writeln!(
        out,
        "  tokens: {}",
        profile
            .tokens
            .if_supports_color(Stream::Stdout, |t| t.yellow())
    )?;
    writeln!(out, "  streak: {} day(s)", profile.streak_days)
}

fn render_quote(out: &mut impl Write, quote: &Quote) -> io::Result<()> {
    writeln!(
        out,
        "{} / {}: {} tokens",
        quote.tier,
        quote.format,
        quote.cost.if_supports_color(Stream::Stdout, |t| t.yellow())
    )?;
    if let (Some(balance), Some(affordable)) = (quote.balance, quote.affordable) {
        let verdict = if affordable {
            "affordable".if_supports_color(Stream::Stdout, |t| t.green()).to_string()
        } else {
            "not enough tokens"
                .if_supports_color(Stream::Stdout, |t| t.red())
                .to_string()
        };
        writeln!(out, "  balance {balance}: {verdict}")?;
    }
    Ok(())
}

fn render_roadmap(out: &mut impl Write, roadmap: &Roadmap) -> io::Result<()> {
    let completion = lq_core::progress::compute_completion(roadmap);
    writeln!(
        out,
        "{} {}",
        roadmap
            .goal
            .title
            .if_supports_color(Stream::Stdout, |t| t.bold()),
        roadmap.id.if_supports_color(Stream::Stdout, |t| t.dimmed())
    )?;
    writeln!(
        out,
        "  {} · {} · {} · cost {}",
        roadmap.goal.profession, roadmap.tier, roadmap.format, roadmap.cost
    )?;
    writeln!(out, "  {} {completion}%", progress_bar(completion))?;
    for (index, skill) in roadmap.skills.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} {} {}",
            index + 1,
            progress_marker(skill.progress),
            skill.name,
            skill.id.if_supports_color(Stream::Stdout, |t| t.dimmed())
        )?;
        for video in &skill.resources {
            let mark = if video.completed { "x" } else { " " };
            writeln!(
                out,
                "       [{mark}] {} ({}) {}",
                video.title,
                video.display_duration(),
                video.id.if_supports_color(Stream::Stdout, |t| t.dimmed())
            )?;
        }
    }
    Ok(())
}

fn render_progress(out: &mut impl Write, report: &ProgressReport) -> io::Result<()> {
    let progress = &report.progress;
    writeln!(
        out,
        "{} {}",
        report.title.if_supports_color(Stream::Stdout, |t| t.bold()),
        report
            .roadmap_id
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
    )?;
    writeln!(
        out,
        "  {} {}%",
        progress_bar(progress.completion),
        progress.completion
    )?;
    writeln!(
        out,
        "  skills: {} mastered, {} in progress, {} not started",
        progress.mastered, progress.in_progress, progress.not_started
    )?;
    writeln!(
        out,
        "  videos: {}/{} watched",
        progress.completed_videos, progress.total_videos
    )
}

fn render_catalog(out: &mut impl Write, entry: &CatalogEntry) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        entry
            .profession
            .if_supports_color(Stream::Stdout, |t| t.bold())
    )?;
    for template in entry.skills {
        writeln!(
            out,
            "  {} [{} · {}] importance {}",
            template.name, template.level, template.category, template.importance
        )?;
    }
    Ok(())
}

fn render_events(out: &mut impl Write, events: &[EventRecord]) -> io::Result<()> {
    if events.is_empty() {
        return writeln!(out, "No events.");
    }
    for event in events {
        writeln!(
            out,
            "{:>5}  {}  {}",
            event.seq,
            event.at.format("%Y-%m-%d %H:%M:%S"),
            event
                .kind()
                .unwrap_or("Unknown")
                .if_supports_color(Stream::Stdout, |t| t.cyan())
        )?;
    }
    Ok(())
}

fn render_achievements(out: &mut impl Write, achievements: &[Achievement]) -> io::Result<()> {
    if achievements.is_empty() {
        return writeln!(out, "No achievements yet.");
    }
    for achievement in achievements {
        writeln!(
            out,
            "{} {}  {}",
            "*".if_supports_color(Stream::Stdout, |t| t.yellow()),
            achievement.kind.title(),
            achievement.unlocked_at.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

fn progress_marker(progress: SkillProgress) -> String {
    match progress {
        SkillProgress::Mastered => "[x]"
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        SkillProgress::InProgress => "[~]"
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
        SkillProgress::NotStarted => "[ ]".to_string(),
    }
}

fn progress_bar(completion: u8) -> String {
    let filled = usize::from(completion.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
