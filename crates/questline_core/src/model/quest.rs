//! Quest domain model.
//!
//! # Responsibility
//! - Define the quest record tracked by the quest store.
//! - Define the validated input shape (`QuestDraft`) supplied by callers.
//!
//! # Invariants
//! - `id` is stable for the quest lifetime and never reused.
//! - `name` is trimmed and non-empty once accepted by the store.
//! - Name uniqueness is case-insensitive and enforced by `QuestStore`.

use crate::logging::sanitize_for_log;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a quest.
pub type QuestId = Uuid;

/// Priority tier of a quest.
///
/// Main quests drive streak, decay and the daily completion flag; side
/// quests only earn XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Main,
    Side,
}

/// Self-improvement category a quest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Physical,
    Mental,
    Career,
    Studying,
}

/// How often a quest is expected to be repeated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// One-off quest; never reset automatically.
    #[default]
    Normal,
    /// Reset to not-done on every day rollover.
    Daily,
    /// Declared only; no automatic reset rule exists yet.
    Weekly,
}

impl QuestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Side => "side",
        }
    }
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
            Self::Career => "career",
            Self::Studying => "studying",
        }
    }
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl Display for QuestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a quest field cannot be parsed from text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuestFieldError {
    field: &'static str,
    value: String,
    expected: &'static str,
}

impl Display for ParseQuestFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported quest {} `{}`; expected {}",
            self.field, self.value, self.expected
        )
    }
}

impl Error for ParseQuestFieldError {}

fn parse_error(field: &'static str, value: &str, expected: &'static str) -> ParseQuestFieldError {
    ParseQuestFieldError {
        field,
        value: value.to_string(),
        expected,
    }
}

impl FromStr for QuestKind {
    type Err = ParseQuestFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "side" => Ok(Self::Side),
            _ => Err(parse_error("kind", value, "main|side")),
        }
    }
}

impl FromStr for Attribute {
    type Err = ParseQuestFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(Self::Physical),
            "mental" => Ok(Self::Mental),
            "career" => Ok(Self::Career),
            "studying" => Ok(Self::Studying),
            _ => Err(parse_error(
                "attribute",
                value,
                "physical|mental|career|studying",
            )),
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseQuestFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(parse_error("frequency", value, "normal|daily|weekly")),
        }
    }
}

/// One tracked quest.
///
/// Snapshots written before ids existed carry no `id`; such quests get a
/// fresh id when restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    #[serde(default = "Uuid::new_v4")]
    pub id: QuestId,
    pub name: String,
    /// Serialized as `type` to match the persisted snapshot schema.
    #[serde(rename = "type")]
    pub kind: QuestKind,
    /// Stored snapshots may carry `""` or an unknown category; both read as
    /// no attribute.
    #[serde(default, deserialize_with = "lenient_attribute")]
    pub attribute: Option<Attribute>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub done: bool,
}

impl Quest {
    /// Returns whether this quest counts toward streak and decay checks.
    pub fn is_main(&self) -> bool {
        self.kind == QuestKind::Main
    }

    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.trim().to_lowercase()
    }
}

fn lenient_attribute<'de, D>(deserializer: D) -> Result<Option<Attribute>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let text = match &raw {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::String(text) if text.trim().is_empty() => return Ok(None),
        serde_json::Value::String(text) => text.as_str(),
        _ => "",
    };
    match text.parse::<Attribute>() {
        Ok(attribute) => Ok(Some(attribute)),
        Err(_) => {
            warn!(
                "event=quest_decode module=quest status=degraded field=attribute value={}",
                sanitize_for_log(&raw.to_string())
            );
            Ok(None)
        }
    }
}

/// Validation failures for quest input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestValidationError {
    /// Name is empty after trimming.
    EmptyName,
}

impl Display for QuestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "quest name must not be blank"),
        }
    }
}

impl Error for QuestValidationError {}

/// Caller-supplied quest fields for add/edit.
///
/// The presentation layer fills this struct; core never reads form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDraft {
    pub name: String,
    pub kind: QuestKind,
    pub attribute: Option<Attribute>,
    pub frequency: Frequency,
}

impl QuestDraft {
    /// Creates a draft with no attribute and `normal` frequency.
    pub fn new(name: impl Into<String>, kind: QuestKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attribute: None,
            frequency: Frequency::default(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Returns the trimmed name, rejecting blank input.
    pub fn normalized_name(&self) -> Result<String, QuestValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(QuestValidationError::EmptyName);
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, Frequency, Quest, QuestDraft, QuestKind, QuestValidationError};

    fn decode_attribute(attribute: &str) -> Option<Attribute> {
        let json = format!(r#"{{"name": "Read", "type": "side", "attribute": {attribute}}}"#);
        serde_json::from_str::<Quest>(&json).unwrap().attribute
    }

    #[test]
    fn stored_attribute_decodes_leniently() {
        assert_eq!(decode_attribute(r#""mental""#), Some(Attribute::Mental));
        assert_eq!(decode_attribute(r#""""#), None);
        assert_eq!(decode_attribute(r#""  ""#), None);
        assert_eq!(decode_attribute(r#""cooking""#), None);
        assert_eq!(decode_attribute("null"), None);
        assert_eq!(decode_attribute("7"), None);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(" MAIN ".parse::<QuestKind>().unwrap(), QuestKind::Main);
        assert_eq!("Studying".parse::<Attribute>().unwrap(), Attribute::Studying);
        assert_eq!("daily".parse::<Frequency>().unwrap(), Frequency::Daily);
    }

    #[test]
    fn unknown_enum_value_reports_expected_choices() {
        let err = "monthly".parse::<Frequency>().unwrap_err();
        assert!(err.to_string().contains("normal|daily|weekly"));
    }

    #[test]
    fn draft_defaults_to_normal_frequency() {
        let draft = QuestDraft::new("Stretch", QuestKind::Side);
        assert_eq!(draft.frequency, Frequency::Normal);
        assert_eq!(draft.attribute, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let draft = QuestDraft::new("   ", QuestKind::Main);
        assert_eq!(
            draft.normalized_name().unwrap_err(),
            QuestValidationError::EmptyName
        );
    }
}
