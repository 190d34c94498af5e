//! Questline CLI: daily quests, XP, ranks and streaks from the terminal.
//!
//! Commands: status, list, add, edit, delete, toggle

mod config;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::Parser;
use config::CliConfig;
use log::warn;
use questline_core::db::{open_db, open_db_in_memory};
use questline_core::{
    Attribute, Frequency, Quest, QuestDraft, QuestId, QuestKind, QuestSession, RankLevel,
    SnapshotRepository, SqliteSnapshotRepository, ToggleOutcome,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "questline")]
#[command(version)]
#[command(about = "Track daily quests, XP, ranks and streaks")]
struct Cli {
    /// Directory holding the database and logs
    #[arg(long, env = "QUESTLINE_DATA_DIR", default_value = ".questline", global = true)]
    data_dir: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long, env = "QUESTLINE_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Override the local date (YYYY-MM-DD)
    #[arg(long, env = "QUESTLINE_TODAY", global = true)]
    today: Option<NaiveDate>,
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show rank, level, XP, streak and combo
    Status,
    /// List quests in creation order
    #[command(alias = "ls")]
    List,
    /// Add a new quest
    Add {
        name: String,
        /// main|side
        #[arg(long)]
        kind: QuestKind,
        /// physical|mental|career|studying
        #[arg(long)]
        attribute: Option<Attribute>,
        /// normal|daily|weekly
        #[arg(long, default_value = "normal")]
        frequency: Frequency,
    },
    /// Change a quest's fields; omitted fields keep their value
    Edit {
        /// Quest id or name
        quest: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<QuestKind>,
        #[arg(long, conflicts_with = "clear_attribute")]
        attribute: Option<Attribute>,
        #[arg(long)]
        clear_attribute: bool,
        #[arg(long)]
        frequency: Option<Frequency>,
    },
    /// Delete a quest
    #[command(alias = "rm")]
    Delete {
        /// Quest id or name
        quest: String,
    },
    /// Complete a quest, or undo a completed one
    Toggle {
        /// Quest id or name
        quest: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    rank: String,
    level: u32,
    total_levels: u32,
    xp: u64,
    xp_into_level: u64,
    xp_per_level: u64,
    xp_to_next_level: u64,
    streak: u32,
    combo: u32,
    daily_main_quest_completed: bool,
    last_active_date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleView {
    id: QuestId,
    name: String,
    completed: bool,
    amount: u64,
    xp: u64,
    combo: u32,
    rank_changed_to: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(&cli.data_dir, cli.log_level.as_deref(), cli.today)?;
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory `{}`",
            config.data_dir.display()
        )
    })?;
    if let Err(message) = questline_core::init_logging(&config.log_level, config.log_dir()) {
        eprintln!("warning: logging disabled: {message}");
    }

    let conn = match open_db(config.db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=cli_db_fallback module=cli status=degraded error={err}");
            eprintln!("warning: {err}; changes will not be saved");
            open_db_in_memory().context("failed to open fallback database")?
        }
    };
    let mut session = QuestSession::open(SqliteSnapshotRepository::new(&conn), config.today);
    if !session.is_persisting() {
        eprintln!("warning: saved quests could not be read; changes will not be saved");
    }

    let Some(command) = cli.command else {
        return print_status(&session, cli.json);
    };

    match command {
        Commands::Status => print_status(&session, cli.json),
        Commands::List => print_quests(session.quests().as_slice(), cli.json),
        Commands::Add {
            name,
            kind,
            attribute,
            frequency,
        } => {
            let mut draft = QuestDraft::new(name, kind).with_frequency(frequency);
            draft.attribute = attribute;
            let id = session.add_quest(draft)?;
            print_quest(find_by_id(&session, id)?, cli.json, "added")
        }
        Commands::Edit {
            quest,
            name,
            kind,
            attribute,
            clear_attribute,
            frequency,
        } => {
            let current = resolve_quest(&session, &quest)?.clone();
            let draft = QuestDraft {
                name: name.unwrap_or(current.name),
                kind: kind.unwrap_or(current.kind),
                attribute: if clear_attribute {
                    None
                } else {
                    attribute.or(current.attribute)
                },
                frequency: frequency.unwrap_or(current.frequency),
            };
            session.edit_quest(current.id, draft)?;
            print_quest(find_by_id(&session, current.id)?, cli.json, "updated")
        }
        Commands::Delete { quest } => {
            let id = resolve_quest(&session, &quest)?.id;
            let removed = session.delete_quest(id)?;
            print_quest(&removed, cli.json, "deleted")
        }
        Commands::Toggle { quest } => {
            let id = resolve_quest(&session, &quest)?.id;
            let outcome = session.toggle_quest(id, config.today)?;
            print_toggle(&session, &outcome, cli.json)
        }
    }
}

/// Accepts a quest id or a case-insensitive quest name.
fn resolve_quest<'s, R: SnapshotRepository>(
    session: &'s QuestSession<R>,
    reference: &str,
) -> anyhow::Result<&'s Quest> {
    let by_id = Uuid::parse_str(reference.trim())
        .ok()
        .and_then(|id| session.quests().get(id));
    by_id
        .or_else(|| session.quests().find_by_name(reference))
        .ok_or_else(|| anyhow!("no quest matches `{reference}`"))
}

fn find_by_id<R: SnapshotRepository>(
    session: &QuestSession<R>,
    id: QuestId,
) -> anyhow::Result<&Quest> {
    session
        .quests()
        .get(id)
        .ok_or_else(|| anyhow!("quest {id} vanished after write"))
}

fn status_view<R: SnapshotRepository>(session: &QuestSession<R>) -> StatusView {
    let info: RankLevel = session.rank_info();
    let progression = session.progression();
    StatusView {
        rank: info.rank.name().to_string(),
        level: info.level,
        total_levels: info.total_levels,
        xp: progression.xp,
        xp_into_level: info.xp_into_level,
        xp_per_level: info.xp_per_level,
        xp_to_next_level: info.xp_to_next_level(),
        streak: progression.streak,
        combo: progression.combo,
        daily_main_quest_completed: progression.daily_main_quest_completed,
        last_active_date: progression.last_active_date,
    }
}

fn print_status<R: SnapshotRepository>(
    session: &QuestSession<R>,
    json: bool,
) -> anyhow::Result<()> {
    let view = status_view(session);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    println!("{} {} ({} XP)", view.rank, view.level, view.xp);
    if view.xp_to_next_level > 0 {
        println!(
            "  level progress {}/{}, {} XP to next level",
            view.xp_into_level, view.xp_per_level, view.xp_to_next_level
        );
    } else {
        println!("  top of the ladder");
    }
    println!("  streak {} day(s), combo x{}", view.streak, view.combo);
    if view.daily_main_quest_completed {
        println!("  main quest done today");
    }
    Ok(())
}

fn print_quests(quests: &[Quest], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(quests)?);
        return Ok(());
    }
    if quests.is_empty() {
        println!("no quests yet; add one with `questline add`");
        return Ok(());
    }
    for quest in quests {
        println!("{}", quest_line(quest));
    }
    Ok(())
}

fn print_quest(quest: &Quest, json: bool, verb: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(quest)?);
    } else {
        println!("{verb}: {}", quest_line(quest));
    }
    Ok(())
}

fn print_toggle<R: SnapshotRepository>(
    session: &QuestSession<R>,
    outcome: &ToggleOutcome,
    json: bool,
) -> anyhow::Result<()> {
    let quest = find_by_id(session, outcome.quest_id)?;
    let view = ToggleView {
        id: quest.id,
        name: quest.name.clone(),
        completed: outcome.completed,
        amount: outcome.amount,
        xp: outcome.xp_after,
        combo: outcome.combo,
        rank_changed_to: outcome
            .rank_change
            .map(|change| format!("{} {}", change.to.rank, change.to.level)),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if view.completed {
        println!("completed {}: +{} XP (combo x{})", view.name, view.amount, view.combo);
    } else {
        println!("undid {}: -{} XP", view.name, outcome.xp_before - outcome.xp_after);
    }
    if let Some(rank) = &view.rank_changed_to {
        println!("  now {rank}");
    }
    Ok(())
}

fn quest_line(quest: &Quest) -> String {
    let mark = if quest.done { "x" } else { " " };
    let attribute = quest
        .attribute
        .map(|attribute| format!(" {attribute}"))
        .unwrap_or_default();
    format!(
        "[{mark}] {} ({}, {}{}) {}",
        quest.name, quest.kind, quest.frequency, attribute, quest.id
    )
}
