//! Persisted progression counters.
//!
//! # Invariants
//! - `xp` never goes below zero (unsigned, saturating updates).
//! - `combo` is at least 1; `clamp` restores that after deserialization.
//! - Dates are written as `YYYY-MM-DD`. Older snapshots wrote the
//!   `Mon Oct 19 2026` form; both are read, anything else reads as unset.

use crate::logging::sanitize_for_log;
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const LEGACY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Lowest allowed combo value, also the value after each day rollover.
pub const MIN_COMBO: u32 = 1;

/// Session-owned progression counters.
///
/// Mutated only by toggle orchestration and day rollover. Rank and level
/// are derived from `xp` on demand and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressionState {
    pub xp: u64,
    /// Consecutive days with at least one completed main quest.
    pub streak: u32,
    /// Same-day completion counter; display only, never scales XP.
    pub combo: u32,
    #[serde(deserialize_with = "lenient_date")]
    pub last_completed_date: Option<NaiveDate>,
    pub daily_main_quest_completed: bool,
    #[serde(deserialize_with = "lenient_date")]
    pub last_active_date: Option<NaiveDate>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            xp: 0,
            streak: 0,
            combo: MIN_COMBO,
            last_completed_date: None,
            daily_main_quest_completed: false,
            last_active_date: None,
        }
    }
}

impl ProgressionState {
    /// Repairs values that the type system cannot rule out.
    pub fn clamp(&mut self) {
        self.combo = self.combo.max(MIN_COMBO);
    }
}

/// Parses a stored date in either the current or the legacy format.
pub fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, LEGACY_DATE_FORMAT))
        .ok()
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    let parsed = raw.as_str().and_then(parse_stored_date);
    if parsed.is_none() {
        warn!(
            "event=progression_decode module=progression status=degraded field=date value={}",
            sanitize_for_log(&raw.to_string())
        );
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{parse_stored_date, ProgressionState};
    use chrono::NaiveDate;

    #[test]
    fn both_date_formats_are_read() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 19);
        assert_eq!(parse_stored_date("2026-10-19"), expected);
        assert_eq!(parse_stored_date("Mon Oct 19 2026"), expected);
        assert_eq!(parse_stored_date("Fri Mar 06 2026"), NaiveDate::from_ymd_opt(2026, 3, 6));
        assert_eq!(parse_stored_date("yesterday"), None);
    }

    #[test]
    fn unreadable_dates_decode_as_unset() {
        let state: ProgressionState = serde_json::from_str(
            r#"{"xp": 40, "lastActiveDate": "someday", "lastCompletedDate": 12}"#,
        )
        .unwrap();
        assert_eq!(state.xp, 40);
        assert_eq!(state.last_active_date, None);
        assert_eq!(state.last_completed_date, None);
    }

    #[test]
    fn legacy_dates_decode_and_reencode_as_iso() {
        let state: ProgressionState =
            serde_json::from_str(r#"{"lastActiveDate": "Mon Oct 19 2026"}"#).unwrap();
        assert_eq!(state.last_active_date, NaiveDate::from_ymd_opt(2026, 10, 19));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["lastActiveDate"], "2026-10-19");
    }
}
