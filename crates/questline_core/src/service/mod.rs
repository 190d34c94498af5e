//! Use-case services over quests and progression.
//!
//! # Responsibility
//! - Run the day-boundary state machine.
//! - Orchestrate quest writes and toggles for one session.
//!
//! # Invariants
//! - Services never bypass `QuestStore` write rules.
//! - Services stay storage-agnostic behind `SnapshotRepository`.

pub mod day_cycle;
pub mod session;
