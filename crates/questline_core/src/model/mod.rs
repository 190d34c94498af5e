//! Domain model for quests and progression.
//!
//! # Responsibility
//! - Define the quest record, the progression counters and the persisted
//!   snapshot that bundles them.
//!
//! # Invariants
//! - Every quest is identified by a stable `QuestId`.
//! - Rank and level are derived from XP and are not part of the model.

pub mod progression;
pub mod quest;
pub mod snapshot;
