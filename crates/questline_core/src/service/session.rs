//! Quest session: the single owner of quests and progression.
//!
//! # Responsibility
//! - Restore state, run the day rollover, then accept user operations.
//! - Orchestrate toggles into XP, combo and daily-flag updates.
//! - Mirror every committed change to the snapshot repository.
//!
//! # Invariants
//! - Persistence stays disarmed until restore and rollover have finished,
//!   and for the whole session when the storage read failed: state that was
//!   never loaded must not replace what is stored.
//! - Storage failures are logged and swallowed; memory stays authoritative.
//! - `xp` never underflows and `combo` never drops below 1.

use crate::logging::sanitize_for_log;
use crate::model::progression::{ProgressionState, MIN_COMBO};
use crate::model::quest::{Quest, QuestDraft, QuestId, QuestKind};
use crate::model::snapshot::Snapshot;
use crate::progression::calculator::{rank_info_for_xp, scaled_xp_amount, RankLevel};
use crate::repo::quest_store::{QuestStore, QuestStoreError, StoreResult};
use crate::repo::snapshot_repo::{load_snapshot, save_snapshot, LoadOrigin, SnapshotRepository};
use crate::service::day_cycle::{advance_day, DayTransition};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Rank/level before and after a toggle that moved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub from: RankLevel,
    pub to: RankLevel,
}

impl RankChange {
    pub fn is_promotion(&self) -> bool {
        self.to.total_levels > self.from.total_levels
    }
}

/// Result of one toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub quest_id: QuestId,
    /// `true` when the quest went from open to done.
    pub completed: bool,
    /// Scaled XP amount for this quest at the pre-toggle baseline.
    pub amount: u64,
    pub xp_before: u64,
    pub xp_after: u64,
    pub combo: u32,
    /// Set when rank or level differs before/after; informational only.
    pub rank_change: Option<RankChange>,
}

/// Session over one snapshot repository.
pub struct QuestSession<R: SnapshotRepository> {
    repo: R,
    quests: QuestStore,
    progression: ProgressionState,
    load_origin: LoadOrigin,
    loaded: bool,
}

impl<R: SnapshotRepository> QuestSession<R> {
    /// Restores state from `repo` and applies the rollover for `today`.
    ///
    /// The returned session is fully initialized; no caller can observe or
    /// mutate state before the rollover check completed.
    pub fn open(repo: R, today: NaiveDate) -> Self {
        let (snapshot, load_origin) = load_snapshot(&repo);
        let mut session = Self {
            repo,
            quests: QuestStore::from_quests(snapshot.quests),
            progression: snapshot.progression,
            load_origin,
            loaded: false,
        };

        let transition = session.refresh_day(today);
        if load_origin == LoadOrigin::Unavailable {
            warn!("event=session_open module=session status=read_only cause=storage_unavailable");
        } else {
            session.loaded = true;
            if transition.is_new_day() {
                session.persist("day_rollover");
            }
        }

        info!(
            "event=session_open module=session status=ok origin={:?} quests={} xp={} streak={}",
            session.load_origin,
            session.quests.len(),
            session.progression.xp,
            session.progression.streak
        );
        session
    }

    /// Re-evaluates the day boundary, e.g. when a process stays open past
    /// midnight. Persists when a rollover happened.
    pub fn refresh_day(&mut self, today: NaiveDate) -> DayTransition {
        let transition = advance_day(&mut self.quests, &mut self.progression, today);
        if transition.is_new_day() {
            self.persist("day_rollover");
        }
        transition
    }

    pub fn add_quest(&mut self, draft: QuestDraft) -> StoreResult<QuestId> {
        let result = self.quests.add(draft);
        match &result {
            Ok(id) => {
                info!("event=quest_add module=session status=ok id={id}");
                self.persist("quest_add");
            }
            Err(err) => log_rejection("quest_add", err),
        }
        result
    }

    pub fn edit_quest(&mut self, id: QuestId, draft: QuestDraft) -> StoreResult<()> {
        let result = self.quests.edit(id, draft);
        match &result {
            Ok(()) => {
                info!("event=quest_edit module=session status=ok id={id}");
                self.persist("quest_edit");
            }
            Err(err) => log_rejection("quest_edit", err),
        }
        result
    }

    pub fn delete_quest(&mut self, id: QuestId) -> StoreResult<Quest> {
        let result = self.quests.delete(id);
        match &result {
            Ok(quest) => {
                info!(
                    "event=quest_delete module=session status=ok id={id} name={}",
                    sanitize_for_log(&quest.name)
                );
                self.persist("quest_delete");
            }
            Err(err) => log_rejection("quest_delete", err),
        }
        result
    }

    /// Flips a quest and applies the matching XP/combo bookkeeping.
    ///
    /// Runs the day rollover for `today` first, so a stale day never
    /// scores a toggle.
    pub fn toggle_quest(&mut self, id: QuestId, today: NaiveDate) -> StoreResult<ToggleOutcome> {
        self.refresh_day(today);

        let (kind, completed) = match self.quests.toggle(id) {
            Ok(quest) => (quest.kind, quest.done),
            Err(err) => {
                log_rejection("quest_toggle", &err);
                return Err(err);
            }
        };

        let xp_before = self.progression.xp;
        let rank_before = rank_info_for_xp(xp_before);
        let amount = scaled_xp_amount(xp_before, kind);

        if completed {
            self.apply_completion(kind, amount, today);
        } else {
            self.apply_undo(kind, amount);
        }

        let rank_after = rank_info_for_xp(self.progression.xp);
        let rank_change = (!rank_before.same_step(&rank_after)).then_some(RankChange {
            from: rank_before,
            to: rank_after,
        });

        info!(
            "event=quest_toggle module=session status=ok id={id} completed={completed} amount={amount} xp={} combo={} rank_changed={}",
            self.progression.xp,
            self.progression.combo,
            rank_change.is_some()
        );
        self.persist("quest_toggle");

        Ok(ToggleOutcome {
            quest_id: id,
            completed,
            amount,
            xp_before,
            xp_after: self.progression.xp,
            combo: self.progression.combo,
            rank_change,
        })
    }

    pub fn quests(&self) -> &QuestStore {
        &self.quests
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    pub fn rank_info(&self) -> RankLevel {
        rank_info_for_xp(self.progression.xp)
    }

    /// Whether changes reach the repository; `false` after a failed read.
    pub fn is_persisting(&self) -> bool {
        self.loaded
    }

    pub fn load_origin(&self) -> LoadOrigin {
        self.load_origin
    }

    /// Current state as the persisted unit.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            quests: self.quests.as_slice().to_vec(),
            progression: self.progression.clone(),
        }
    }

    fn apply_completion(&mut self, kind: QuestKind, amount: u64, today: NaiveDate) {
        let progression = &mut self.progression;
        progression.xp = progression.xp.saturating_add(amount);
        progression.combo = progression.combo.saturating_add(1);
        if kind == QuestKind::Main {
            progression.daily_main_quest_completed = true;
            progression.last_completed_date = Some(today);
        }
    }

    fn apply_undo(&mut self, kind: QuestKind, amount: u64) {
        let progression = &mut self.progression;
        progression.xp = progression.xp.saturating_sub(amount);
        progression.combo = progression.combo.saturating_sub(1).max(MIN_COMBO);
        if kind == QuestKind::Main && !self.quests.any_main_done() {
            progression.daily_main_quest_completed = false;
        }
    }

    fn persist(&self, reason: &'static str) {
        if !self.loaded {
            debug!("event=snapshot_save module=session status=skipped reason={reason} cause=not_loaded");
            return;
        }
        if let Err(err) = save_snapshot(&self.repo, &self.snapshot()) {
            warn!(
                "event=snapshot_save module=session status=error reason={reason} locked={} error={err}",
                err.is_locked()
            );
        }
    }
}

fn log_rejection(event: &'static str, err: &QuestStoreError) {
    info!("event={event} module=session status=rejected error={err}");
}
