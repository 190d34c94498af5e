//! Pure XP arithmetic: rank lookup and scaled quest deltas.
//!
//! # Invariants
//! - Every function is total over `u64` XP and side-effect free.
//! - `scaled_xp_amount` serves gains, losses and decay alike, so undoing
//!   a quest at the same rank baseline removes exactly what was added.

use crate::model::quest::QuestKind;
use crate::progression::rank_table::{table_capacity, Rank, LEVELS_PER_RANK};
use serde::Serialize;

/// Percent of the current rank's per-level XP awarded for a main quest.
pub const MAIN_QUEST_PERCENT: u64 = 40;
/// Percent for a side quest (0.4x of a main quest).
pub const SIDE_QUEST_PERCENT: u64 = 16;
/// Lower bound for a main quest delta.
pub const MIN_MAIN_QUEST_XP: u64 = 10;
/// Lower bound for a side quest delta.
pub const MIN_SIDE_QUEST_XP: u64 = 4;

/// Rank and level derived from cumulative XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankLevel {
    pub rank: Rank,
    /// 1-based level inside `rank`.
    pub level: u32,
    /// Levels fully completed across the whole ladder.
    pub total_levels: u32,
    /// XP earned inside the current level.
    pub xp_into_level: u64,
    /// XP the current level costs.
    pub xp_per_level: u64,
}

impl RankLevel {
    /// Whether the ladder is exhausted.
    pub fn is_max(&self) -> bool {
        self.total_levels == max_total_levels()
    }

    /// XP still missing for the next level, `0` at the top of the ladder.
    pub fn xp_to_next_level(&self) -> u64 {
        if self.is_max() {
            return 0;
        }
        self.xp_per_level.saturating_sub(self.xp_into_level)
    }

    /// Same rank and level, ignoring progress inside the level.
    pub fn same_step(&self, other: &RankLevel) -> bool {
        self.rank == other.rank && self.level == other.level
    }
}

/// Number of levels in the whole ladder.
pub fn max_total_levels() -> u32 {
    Rank::ALL.len() as u32 * LEVELS_PER_RANK
}

/// Maps cumulative XP to rank, level and progress.
///
/// XP past the table's capacity clamps to the top rank's last level.
pub fn rank_info_for_xp(xp: u64) -> RankLevel {
    let mut remaining = xp;
    let mut total_levels = 0;

    for rank in Rank::ALL.into_iter().filter(|rank| !rank.is_highest()) {
        if remaining < rank.xp_for_rank() {
            return position_in_rank(rank, remaining, total_levels);
        }
        remaining -= rank.xp_for_rank();
        total_levels += LEVELS_PER_RANK;
    }

    position_in_rank(Rank::HIGHEST, remaining, total_levels)
}

/// Places `remaining` XP inside `rank`, capping at the rank's last level.
fn position_in_rank(rank: Rank, remaining: u64, levels_before: u32) -> RankLevel {
    let per_level = rank.xp_per_level();
    let completed = (remaining / per_level).min(u64::from(LEVELS_PER_RANK)) as u32;
    let level_index = completed.min(LEVELS_PER_RANK - 1);
    let xp_into_level = (remaining - u64::from(level_index) * per_level).min(per_level);
    RankLevel {
        rank,
        level: level_index + 1,
        total_levels: levels_before + completed,
        xp_into_level,
        xp_per_level: per_level,
    }
}

/// Cumulative XP needed to have completed `total_levels` levels.
///
/// Saturates at the table capacity.
pub fn xp_for_total_levels(total_levels: u32) -> u64 {
    let mut left = total_levels;
    let mut xp = 0;
    for rank in Rank::ALL {
        let levels = left.min(LEVELS_PER_RANK);
        xp += rank.xp_per_level() * u64::from(levels);
        left -= levels;
        if left == 0 {
            break;
        }
    }
    xp.min(table_capacity())
}

/// XP gained (or lost) for one quest toggle at `current_xp`.
///
/// Scales the current rank's per-level XP by the kind's percentage,
/// rounds half up, and floors at the kind's minimum.
pub fn scaled_xp_amount(current_xp: u64, kind: QuestKind) -> u64 {
    let per_level = rank_info_for_xp(current_xp).xp_per_level;
    let (percent, minimum) = match kind {
        QuestKind::Main => (MAIN_QUEST_PERCENT, MIN_MAIN_QUEST_XP),
        QuestKind::Side => (SIDE_QUEST_PERCENT, MIN_SIDE_QUEST_XP),
    };
    let scaled = (per_level * percent + 50) / 100;
    scaled.max(minimum)
}
