//! In-memory ordered quest collection.
//!
//! # Responsibility
//! - Provide add/edit/delete/toggle over the session's quest list.
//! - Enforce case-insensitive name uniqueness on every write.
//!
//! # Invariants
//! - No two quests share a name under case-insensitive comparison.
//! - Insertion order is preserved; ids never shift on delete.
//! - `toggle` only flips `done`; XP bookkeeping belongs to the session.

use crate::logging::sanitize_for_log;
use crate::model::quest::{Frequency, Quest, QuestDraft, QuestId, QuestValidationError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, QuestStoreError>;

/// Errors returned by quest store writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestStoreError {
    /// Input failed field validation.
    Validation(QuestValidationError),
    /// Another quest already uses this name (case-insensitive).
    DuplicateName { name: String, conflicting: QuestId },
    /// No quest with this id exists.
    NotFound(QuestId),
}

impl Display for QuestStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName { name, conflicting } => write!(
                f,
                "a quest named `{name}` already exists (id {conflicting})"
            ),
            Self::NotFound(id) => write!(f, "quest not found: {id}"),
        }
    }
}

impl Error for QuestStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuestValidationError> for QuestStoreError {
    fn from(value: QuestValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Ordered quest collection owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestStore {
    quests: Vec<Quest>,
}

impl QuestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from restored quests.
    ///
    /// Blank names and case-insensitive duplicates are dropped (first
    /// occurrence wins) so restored state honors the store invariants.
    pub fn from_quests(quests: impl IntoIterator<Item = Quest>) -> Self {
        let mut store = Self::new();
        for mut quest in quests {
            let trimmed = quest.name.trim().to_string();
            if trimmed.is_empty() {
                warn!(
                    "event=quest_restore module=quest_store status=skipped reason=empty_name id={}",
                    quest.id
                );
                continue;
            }
            if let Some(existing) = store.find_by_name(&trimmed) {
                warn!(
                    "event=quest_restore module=quest_store status=skipped reason=duplicate_name name={} kept_id={}",
                    sanitize_for_log(&trimmed),
                    existing.id
                );
                continue;
            }
            if store.get(quest.id).is_some() {
                quest.id = Uuid::new_v4();
            }
            quest.name = trimmed;
            store.quests.push(quest);
        }
        store
    }

    /// Appends a new quest with `done = false`.
    pub fn add(&mut self, draft: QuestDraft) -> StoreResult<QuestId> {
        let name = draft.normalized_name()?;
        self.ensure_unique(&name, None)?;

        let quest = Quest {
            id: Uuid::new_v4(),
            name,
            kind: draft.kind,
            attribute: draft.attribute,
            frequency: draft.frequency,
            done: false,
        };
        let id = quest.id;
        self.quests.push(quest);
        Ok(id)
    }

    /// Replaces name, kind, attribute and frequency; keeps `done`.
    pub fn edit(&mut self, id: QuestId, draft: QuestDraft) -> StoreResult<()> {
        let name = draft.normalized_name()?;
        let position = self.position(id)?;
        self.ensure_unique(&name, Some(id))?;

        let quest = &mut self.quests[position];
        quest.name = name;
        quest.kind = draft.kind;
        quest.attribute = draft.attribute;
        quest.frequency = draft.frequency;
        Ok(())
    }

    /// Removes a quest regardless of its state.
    pub fn delete(&mut self, id: QuestId) -> StoreResult<Quest> {
        let position = self.position(id)?;
        Ok(self.quests.remove(position))
    }

    /// Flips `done` and returns the updated quest.
    pub fn toggle(&mut self, id: QuestId) -> StoreResult<&Quest> {
        let position = self.position(id)?;
        let quest = &mut self.quests[position];
        quest.done = !quest.done;
        Ok(&*quest)
    }

    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    /// Case-insensitive lookup on the trimmed name.
    pub fn find_by_name(&self, name: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.name_matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn as_slice(&self) -> &[Quest] {
        &self.quests
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Whether at least one main quest is currently done.
    pub fn any_main_done(&self) -> bool {
        self.quests.iter().any(|quest| quest.is_main() && quest.done)
    }

    /// Clears `done` on every daily quest; returns how many changed.
    pub fn reset_daily(&mut self) -> usize {
        let mut reset = 0;
        for quest in &mut self.quests {
            if quest.frequency == Frequency::Daily && quest.done {
                quest.done = false;
                reset += 1;
            }
        }
        reset
    }

    fn position(&self, id: QuestId) -> StoreResult<usize> {
        self.quests
            .iter()
            .position(|quest| quest.id == id)
            .ok_or(QuestStoreError::NotFound(id))
    }

    fn ensure_unique(&self, name: &str, exclude: Option<QuestId>) -> StoreResult<()> {
        let conflict = self
            .quests
            .iter()
            .filter(|quest| Some(quest.id) != exclude)
            .find(|quest| quest.name_matches(name));
        match conflict {
            Some(quest) => Err(QuestStoreError::DuplicateName {
                name: quest.name.clone(),
                conflicting: quest.id,
            }),
            None => Ok(()),
        }
    }
}
