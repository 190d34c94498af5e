//! Quest collection and snapshot storage.
//!
//! # Responsibility
//! - Hold the session's quest list and its write rules (`QuestStore`).
//! - Define the snapshot persistence contract and its SQLite transport.
//!
//! # Invariants
//! - Quest writes return semantic errors (`DuplicateName`, `NotFound`)
//!   before any mutation happens.
//! - SQL details stay inside `snapshot_repo`.

pub mod quest_store;
pub mod snapshot_repo;
