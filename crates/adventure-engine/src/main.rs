//! # Arduino Adventure
//!
//! Console shell for the Arduino Adventure progress tracker.
//!
//! All progression rules live in the library crates; this binary only
//! wires a `ProgressStore` and a `ProgressEngine` together and renders
//! their results as text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adventure_engine::{LevelState, ProgressEngine, LEVELS};
use adventure_store::ProgressStore;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("adventure=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut engine = ProgressEngine::new(ProgressStore::open_default());

    match args.first().map(String::as_str) {
        None | Some("status") => status(&engine),
        Some("complete") => {
            let index = args
                .get(1)
                .context("usage: adventure complete <level>")?
                .parse::<u32>()
                .context("level must be a number")?;
            complete(&mut engine, index)?;
        }
        Some("badges") => badges(&engine),
        Some("reset") => reset(&mut engine, args.get(1).map(String::as_str))?,
        Some("export") => {
            let payload = engine.store().export()?;
            match args.get(1) {
                Some(path) => {
                    fs::write(path, &payload).with_context(|| format!("writing {path}"))?;
                    println!("Exported progress to {path}");
                }
                None => println!("{payload}"),
            }
        }
        Some("import") => {
            let path = args.get(1).context("usage: adventure import <file>")?;
            let payload = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            let record = engine.store_mut().import(&payload)?;
            println!(
                "Imported progress: {} levels completed, {} XP",
                record.levels_completed, record.total_xp
            );
        }
        Some(other) => {
            usage();
            bail!("unknown command: {other}");
        }
    }

    Ok(())
}

fn usage() {
    println!("Arduino Adventure progress tracker");
    println!();
    println!("Commands:");
    println!("  status              show overall progress (default)");
    println!("  complete <level>    mark a level as completed");
    println!("  badges              list earned badges");
    println!("  reset --confirm     erase all progress");
    println!("  export [file]       export progress as JSON");
    println!("  import <file>       import previously exported progress");
}

fn status(engine: &ProgressEngine) {
    let record = engine.store().load();

    let name = if record.name.is_empty() {
        "Arduino Explorer"
    } else {
        record.name.as_str()
    };
    println!("{name} - {} XP", record.total_xp);
    println!(
        "{}/{} missions completed ({}%)",
        record.levels_completed,
        LEVELS.len(),
        engine.completion_rate(&record)
    );

    for lesson in &LEVELS {
        let marker = match engine.level_state(lesson.index, &record) {
            LevelState::Completed => "x",
            LevelState::Unlocked => ">",
            LevelState::Locked => " ",
        };
        println!("  [{marker}] {:2}  {}", lesson.index, lesson.title);
    }

    if let Some(badge) = engine.next_badge(&record) {
        println!("Next badge: {} ({})", badge.name, badge.rarity.display_name());
    }
}

fn complete(engine: &mut ProgressEngine, index: u32) -> Result<()> {
    let record = engine.store().load();
    let outcome = engine.complete_level(index, &record)?;

    println!(
        "Level {index} complete! {} XP total",
        outcome.progress.total_xp
    );
    for badge in &outcome.new_badges {
        println!("  Badge unlocked: {} - {}", badge.name, badge.description);
    }
    for achievement in &outcome.new_achievements {
        println!(
            "  Achievement unlocked: {} (+{} XP)",
            achievement.name, achievement.points
        );
    }
    if !outcome.persisted && outcome.progress.levels_completed > record.levels_completed {
        eprintln!("warning: progress could not be saved durably");
    }

    Ok(())
}

fn badges(engine: &ProgressEngine) {
    let record = engine.store().load();
    let earned = engine.earned_badges(&record);

    if earned.is_empty() {
        println!("No badges earned yet. Complete the first mission!");
        return;
    }

    for badge in earned {
        println!(
            "{} [{}] - {}",
            badge.name,
            badge.rarity.display_name(),
            badge.description
        );
    }
}

fn reset(engine: &mut ProgressEngine, flag: Option<&str>) -> Result<()> {
    if flag != Some("--confirm") {
        bail!("reset erases all progress; re-run as: adventure reset --confirm");
    }

    engine.store_mut().reset();
    info!("progress reset by user");
    println!("All progress has been reset.");
    Ok(())
}
