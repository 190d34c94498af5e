//! Snapshot: the single persisted unit.
//!
//! # Responsibility
//! - Bundle the quest list and progression counters for persistence.
//! - Define the JSON wire format and its defaults for absent fields.
//!
//! # Invariants
//! - Decoding never yields `combo < 1`.
//! - One undecodable quest is skipped on its own; it never discards the
//!   rest of the snapshot.
//! - Absent fields decode to defaults: no quests, zero xp/streak, combo 1,
//!   null dates, `false` flag.

use crate::model::progression::ProgressionState;
use crate::model::quest::Quest;
use log::warn;
use serde::{Deserialize, Serialize};

/// Serialized union of quests and progression state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub quests: Vec<Quest>,
    #[serde(flatten)]
    pub progression: ProgressionState,
}

impl Snapshot {
    /// Encodes this snapshot as a JSON payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a JSON payload, clamping out-of-range counters.
    ///
    /// Quests are decoded one by one; entries that do not decode are
    /// logged and dropped. Malformed progression fields fail the payload.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSnapshot = serde_json::from_str(payload)?;
        let mut quests = Vec::with_capacity(raw.quests.len());
        for (index, value) in raw.quests.into_iter().enumerate() {
            match serde_json::from_value::<Quest>(value) {
                Ok(quest) => quests.push(quest),
                Err(err) => warn!(
                    "event=quest_decode module=snapshot status=skipped index={index} error={err}"
                ),
            }
        }

        let mut progression = raw.progression;
        progression.clamp();
        Ok(Self {
            quests,
            progression,
        })
    }
}

/// Wire shape with quests left undecoded.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    quests: Vec<serde_json::Value>,
    #[serde(flatten)]
    progression: ProgressionState,
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::quest::{Attribute, Frequency, Quest, QuestKind};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn wire_fields_use_camel_case_and_type_key() {
        let mut snapshot = Snapshot::default();
        snapshot.quests.push(Quest {
            id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
            name: "Morning Workout".to_string(),
            kind: QuestKind::Main,
            attribute: Some(Attribute::Physical),
            frequency: Frequency::Daily,
            done: true,
        });
        snapshot.progression.xp = 245;
        snapshot.progression.last_active_date = NaiveDate::from_ymd_opt(2026, 2, 13);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["xp"], 245);
        assert_eq!(json["combo"], 1);
        assert_eq!(json["lastActiveDate"], "2026-02-13");
        assert_eq!(json["lastCompletedDate"], serde_json::Value::Null);
        assert_eq!(json["dailyMainQuestCompleted"], false);
        assert_eq!(json["quests"][0]["type"], "main");
        assert_eq!(json["quests"][0]["attribute"], "physical");
        assert_eq!(json["quests"][0]["frequency"], "daily");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.progression.combo, 1);
    }

    #[test]
    fn zero_combo_is_clamped_on_decode() {
        let snapshot = Snapshot::from_json(r#"{"xp": 10, "combo": 0}"#).unwrap();
        assert_eq!(snapshot.progression.combo, 1);
        assert_eq!(snapshot.progression.xp, 10);
    }

    #[test]
    fn legacy_quest_without_id_gets_fresh_id() {
        let snapshot = Snapshot::from_json(
            r#"{"quests": [{"name": "Read", "type": "side", "attribute": null, "frequency": "weekly", "done": true}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.quests.len(), 1);
        assert!(!snapshot.quests[0].id.is_nil());
        assert_eq!(snapshot.quests[0].frequency, Frequency::Weekly);
    }

    #[test]
    fn one_bad_quest_does_not_discard_the_snapshot() {
        let snapshot = Snapshot::from_json(
            r#"{
                "quests": [
                    {"name": "Run", "type": "main", "attribute": "", "done": true},
                    {"name": "Broken", "type": "epic"},
                    "not a quest",
                    {"name": "Read", "type": "side", "attribute": "mental"}
                ],
                "xp": 900,
                "streak": 12,
                "lastActiveDate": "Mon Oct 19 2026"
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = snapshot.quests.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, ["Run", "Read"]);
        assert_eq!(snapshot.quests[0].attribute, None);
        assert!(snapshot.quests[0].done);
        assert_eq!(snapshot.quests[1].attribute, Some(Attribute::Mental));
        assert_eq!(snapshot.progression.xp, 900);
        assert_eq!(snapshot.progression.streak, 12);
        assert_eq!(
            snapshot.progression.last_active_date,
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
    }

    #[test]
    fn negative_xp_is_rejected() {
        assert!(Snapshot::from_json(r#"{"xp": -5}"#).is_err());
    }
}
