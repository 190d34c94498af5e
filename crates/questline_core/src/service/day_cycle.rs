//! Day-boundary state machine.
//!
//! # Responsibility
//! - Decide whether `today` starts a new day relative to the last active date.
//! - Apply the rollover: streak bookkeeping, decay, daily resets, combo reset.
//!
//! # Invariants
//! - The rollover runs to completion on exclusively borrowed state.
//! - Weekly and normal quests keep their `done` flag across rollovers.
//! - After any call, `last_active_date == Some(today)`.

use crate::model::progression::{ProgressionState, MIN_COMBO};
use crate::model::quest::QuestKind;
use crate::progression::calculator::scaled_xp_amount;
use crate::repo::quest_store::QuestStore;
use chrono::NaiveDate;
use log::info;

/// Relation between the last active date and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    SameDay,
    /// Also used when no date was ever recorded, or the clock went back.
    NewDay,
}

/// What a rollover changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverSummary {
    pub previous_active_date: Option<NaiveDate>,
    pub today: NaiveDate,
    /// `true` when a main quest was done and the streak grew.
    pub streak_kept: bool,
    pub streak: u32,
    /// XP actually removed by decay (0 when the streak was kept).
    pub xp_decayed: u64,
    pub daily_quests_reset: usize,
}

/// Outcome of `advance_day`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayTransition {
    SameDay,
    NewDay(RolloverSummary),
}

impl DayTransition {
    pub fn is_new_day(&self) -> bool {
        matches!(self, Self::NewDay(_))
    }
}

pub fn classify_day(last_active: Option<NaiveDate>, today: NaiveDate) -> DayState {
    match last_active {
        Some(date) if date == today => DayState::SameDay,
        _ => DayState::NewDay,
    }
}

/// Runs the rollover when `today` differs from the last active date.
pub fn advance_day(
    quests: &mut QuestStore,
    progression: &mut ProgressionState,
    today: NaiveDate,
) -> DayTransition {
    let previous_active_date = progression.last_active_date;
    if classify_day(previous_active_date, today) == DayState::SameDay {
        return DayTransition::SameDay;
    }

    let streak_kept = quests.any_main_done();
    let mut xp_decayed = 0;
    if streak_kept {
        progression.streak = progression.streak.saturating_add(1);
    } else {
        progression.streak = 0;
        let penalty = scaled_xp_amount(progression.xp, QuestKind::Main);
        xp_decayed = penalty.min(progression.xp);
        progression.xp -= xp_decayed;
    }

    let daily_quests_reset = quests.reset_daily();
    progression.combo = MIN_COMBO;
    progression.daily_main_quest_completed = false;
    progression.last_active_date = Some(today);

    info!(
        "event=day_rollover module=day_cycle status=ok streak_kept={} streak={} xp_decayed={} daily_reset={}",
        streak_kept, progression.streak, xp_decayed, daily_quests_reset
    );

    DayTransition::NewDay(RolloverSummary {
        previous_active_date,
        today,
        streak_kept,
        streak: progression.streak,
        xp_decayed,
        daily_quests_reset,
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_day, DayState};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn classify_treats_missing_and_different_dates_as_new_day() {
        assert_eq!(classify_day(None, date(2)), DayState::NewDay);
        assert_eq!(classify_day(Some(date(1)), date(2)), DayState::NewDay);
        assert_eq!(classify_day(Some(date(3)), date(2)), DayState::NewDay);
        assert_eq!(classify_day(Some(date(2)), date(2)), DayState::SameDay);
    }
}
