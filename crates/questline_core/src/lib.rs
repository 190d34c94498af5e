//! Core domain logic for Questline.
//! This crate is the single source of truth for quest and progression rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod progression;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::progression::{ProgressionState, MIN_COMBO};
pub use model::quest::{
    Attribute, Frequency, ParseQuestFieldError, Quest, QuestDraft, QuestId, QuestKind,
    QuestValidationError,
};
pub use model::snapshot::Snapshot;
pub use progression::calculator::{
    rank_info_for_xp, scaled_xp_amount, xp_for_total_levels, RankLevel,
};
pub use progression::rank_table::{Rank, LEVELS_PER_RANK};
pub use repo::quest_store::{QuestStore, QuestStoreError, StoreResult};
pub use repo::snapshot_repo::{
    load_snapshot, save_snapshot, LoadOrigin, MemorySnapshotRepository, RepoResult,
    SnapshotRepoError, SnapshotRepository, SqliteSnapshotRepository, SNAPSHOT_KEY,
};
pub use service::day_cycle::{advance_day, classify_day, DayState, DayTransition, RolloverSummary};
pub use service::session::{QuestSession, RankChange, ToggleOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
