//! # Domain Model
//!
//! Two record kinds live in the store: [`Note`] and [`Task`]. Both share the
//! [`Record`] trait so the stores, the codec and the command layer can be
//! written once and used for either kind.
//!
//! ## Decoding Is Lenient
//!
//! Records written by older versions (or edited by hand) must still load.
//! Every field therefore has a default, unknown keys are ignored, and the
//! task decoder understands the first prototype's shape:
//!
//! - integer ids (`"id": 3`) become the string `"3"`
//! - a `completed` flag with no `status` maps to `done` / `todo`
//! - `"2025-10-17 09:30:00"` timestamps are read as UTC
//!
//! A field that cannot be understood decodes to its default rather than
//! failing the whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::StudyNavError;

pub const DEFAULT_PRIORITY: u8 = 3;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Note,
    Task,
}

impl RecordKind {
    /// Prefix used by timestamp tokens (`n_...`, `t_...`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RecordKind::Note => "n",
            RecordKind::Task => "t",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Note => "note",
            RecordKind::Task => "task",
        }
    }

    pub fn collection_file_name(&self) -> &'static str {
        match self {
            RecordKind::Note => "notes.json",
            RecordKind::Task => "tasks.json",
        }
    }

    pub fn vault_dir_name(&self) -> &'static str {
        match self {
            RecordKind::Note => "notes",
            RecordKind::Task => "tasks",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Note => write!(f, "Note"),
            RecordKind::Task => write!(f, "Task"),
        }
    }
}

/// Behaviour shared by every stored record kind.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn title(&self) -> &str;

    /// Refresh `updated_at` after a mutation.
    fn touch(&mut self);
}

/// Current time at millisecond precision, which both codecs write back exactly.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A timestamp strictly after `previous`: now, or one millisecond past
/// `previous` when the clock has not moved on (or went backwards).
pub fn later_than(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + TimeDelta::milliseconds(1)
    }
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM:SS` one taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Sort rank: todo before doing before done.
    pub fn rank(&self) -> u8 {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::Doing => 1,
            TaskStatus::Done => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StudyNavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            other => Err(StudyNavError::Api(format!(
                "Unknown status '{}' (expected todo, doing or done)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: String, title: String, body: String, tags: Vec<String>) -> Self {
        let now = now();
        Self {
            id,
            title,
            body,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Append a paragraph to the body, separated by a blank line.
    pub fn append(&mut self, text: &str) {
        self.body = format!("{}\n\n{}", self.body, text).trim().to_string();
        self.touch();
    }

    /// Add tags not already present, keeping insertion order. Returns how many were new.
    pub fn add_tags<I, T>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut added = 0;
        for tag in tags {
            let tag = tag.into();
            if !self.has_tag(&tag) {
                self.tags.push(tag);
                added += 1;
            }
        }
        if added > 0 {
            self.touch();
        }
        added
    }
}

impl Record for Note {
    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn touch(&mut self) {
        self.updated_at = later_than(self.updated_at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: u8,
    pub due_date: Option<NaiveDate>,
    /// Weak reference to a note; nothing checks that the note exists.
    #[serde(rename = "note_id")]
    pub linked_note_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: DEFAULT_PRIORITY,
            due_date: None,
            linked_note_id: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl Task {
    pub fn new(id: String, title: String) -> Self {
        let now = now();
        Self {
            id,
            title,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Change the status. Returns false (and leaves `updated_at` alone) when nothing changed.
    pub fn set_status(&mut self, status: TaskStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.touch();
        true
    }

    pub fn link_note(&mut self, note_id: Option<String>) {
        self.linked_note_id = note_id;
        self.touch();
    }
}

impl Record for Task {
    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn touch(&mut self) {
        self.updated_at = later_than(self.updated_at);
    }
}

pub fn clamp_priority(value: i64) -> u8 {
    value.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as u8
}

// Tasks accept both the current shape and the first prototype's
// `{id: int, completed: bool, created_at: "YYYY-MM-DD HH:MM:SS"}` shape.
#[derive(Deserialize)]
struct TaskHelper {
    #[serde(default, deserialize_with = "lenient_id")]
    id: String,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    completed: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    due_date: Option<Value>,
    #[serde(default, alias = "linked_note_id")]
    note_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<Value>,
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = TaskHelper::deserialize(deserializer)?;

        let completed = helper.completed.as_ref().is_some_and(value_is_true);
        let status = helper
            .status
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(if completed {
                TaskStatus::Done
            } else {
                TaskStatus::Todo
            });

        let priority = match helper.priority {
            Some(Value::Number(n)) => n.as_i64().map(clamp_priority),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok().map(clamp_priority),
            _ => None,
        }
        .unwrap_or(DEFAULT_PRIORITY);

        let updated_at = helper
            .updated_at
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or(helper.created_at);

        Ok(Task {
            id: helper.id,
            title: helper.title.map(value_to_text).unwrap_or_default(),
            description: helper.description.map(value_to_text).unwrap_or_default(),
            status,
            priority,
            due_date: helper
                .due_date
                .as_ref()
                .and_then(Value::as_str)
                .and_then(parse_date),
            linked_note_id: helper.note_id.and_then(|v| match v {
                Value::Null => None,
                other => Some(value_to_text(other)),
            }),
            created_at: helper.created_at,
            updated_at,
        })
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(parse_timestamp)
        .unwrap_or_default())
}
