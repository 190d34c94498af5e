//! Rank ladder and XP scoring rules.
//!
//! # Responsibility
//! - Own the single canonical XP curve.
//! - Convert cumulative XP into rank/level and quest kinds into XP deltas.
//!
//! # Invariants
//! - Higher ranks always cost strictly more XP per level.
//! - Rank/level is always recomputed from XP, never stored.

pub mod calculator;
pub mod rank_table;
