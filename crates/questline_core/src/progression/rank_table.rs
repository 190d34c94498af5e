//! Static rank ladder and XP-per-level curve.
//!
//! Curve: `xp_per_level(rank) = round(50 * 1.6^index)`, index 0 for Iron.
//! Tabulated below so every caller sees the exact same integers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Levels inside each rank.
pub const LEVELS_PER_RANK: u32 = 3;

const XP_PER_LEVEL: [u64; 7] = [50, 80, 128, 205, 328, 524, 839];

/// Ordered rank tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Emerald,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 7] = [
        Rank::Iron,
        Rank::Bronze,
        Rank::Silver,
        Rank::Gold,
        Rank::Platinum,
        Rank::Diamond,
        Rank::Emerald,
    ];

    /// Last rank of the ladder; XP past capacity stays here.
    pub const HIGHEST: Rank = Rank::Emerald;

    /// Zero-based position in the ladder.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
            Self::Emerald => "Emerald",
        }
    }

    /// XP required to complete one level inside this rank.
    pub fn xp_per_level(self) -> u64 {
        XP_PER_LEVEL[self.index()]
    }

    /// XP required to clear all levels of this rank.
    pub fn xp_for_rank(self) -> u64 {
        self.xp_per_level() * u64::from(LEVELS_PER_RANK)
    }

    pub fn is_highest(self) -> bool {
        self == Self::HIGHEST
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Total XP needed to clear the whole ladder.
pub fn table_capacity() -> u64 {
    Rank::ALL.iter().map(|rank| rank.xp_for_rank()).sum()
}
