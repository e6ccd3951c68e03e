//! Data models for the Cadence Task API
//!
//! Defines the Rust types that mirror the JSON consumed from the remote
//! task service: tasks, completion entries and the global completion feed.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Display fallback for timestamps that cannot be parsed
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Maximum title length accepted by the server
pub const MAX_TITLE_LEN: usize = 255;

/// Numeric task identifier assigned by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wrap a raw identifier
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a user-supplied identifier (route parameter, CLI argument).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTaskId` for anything that is not a
    /// positive integer.
    pub fn parse(raw: &str) -> ApiResult<Self> {
        match raw.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ApiError::InvalidTaskId {
                raw: raw.to_string(),
            }),
        }
    }

    /// The raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Recurrence type of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl TaskType {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Daily => "daily",
            TaskType::Weekly => "weekly",
            TaskType::Monthly => "monthly",
            TaskType::Yearly => "yearly",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(TaskType::Daily),
            "weekly" => Ok(TaskType::Weekly),
            "monthly" => Ok(TaskType::Monthly),
            "yearly" => Ok(TaskType::Yearly),
            other => Err(ApiError::Validation {
                message: format!(
                    "Unknown task type '{}'. Expected one of: daily, weekly, monthly, yearly",
                    other
                ),
            }),
        }
    }
}

/// A timestamp exactly as the server sent it.
///
/// The raw string is kept so a malformed value never fails deserialization
/// of the surrounding record; callers parse on demand and fall back to
/// [`UNKNOWN_DATE`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw timestamp string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as an instant.
    ///
    /// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC).
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Human-readable form in `tz`, or [`UNKNOWN_DATE`] when unparsable.
    pub fn format_in<Tz>(&self, tz: &Tz, with_time: bool) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self.parse() {
            Some(instant) => {
                let local = instant.with_timezone(tz);
                if with_time {
                    local.format("%b %-d, %Y %H:%M").to_string()
                } else {
                    local.format("%b %-d, %Y").to_string()
                }
            }
            None => UNKNOWN_DATE.to_string(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339())
    }
}

/// A recurring task as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Creation timestamp
    pub created_at: Timestamp,

    /// Recurrence type
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Whether a completion exists for the server's current day
    #[serde(default)]
    pub completed_today: bool,
}

impl Task {
    /// Create a task with required fields, mostly for tests and fixtures
    pub fn new(id: u64, title: impl Into<String>, created_at: impl Into<Timestamp>) -> Self {
        Self {
            id: TaskId::new(id),
            title: title.into(),
            description: String::new(),
            created_at: created_at.into(),
            task_type: TaskType::Daily,
            completed_today: false,
        }
    }

    /// Set the recurrence type
    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completed-today flag
    pub fn with_completed_today(mut self, completed: bool) -> Self {
        self.completed_today = completed;
        self
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Payload for creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl NewTask {
    /// Create a new task payload
    pub fn new(title: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            task_type,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate before sending.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the title is blank or longer
    /// than [`MAX_TITLE_LEN`] characters.
    pub fn validate(&self) -> ApiResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation {
                message: "Task title cannot be empty".to_string(),
            });
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiError::Validation {
                message: format!("Task title cannot exceed {} characters", MAX_TITLE_LEN),
            });
        }
        Ok(())
    }
}

/// One recorded completion of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub id: u64,
    pub completed_at: Timestamp,
}

impl CompletionEntry {
    pub fn new(id: u64, completed_at: impl Into<Timestamp>) -> Self {
        Self {
            id,
            completed_at: completed_at.into(),
        }
    }
}

/// An entry of the global completion feed, carrying its task's details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: u64,
    pub completed_at: Timestamp,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub task_title: String,
    #[serde(default)]
    pub task_description: String,
}

/// Anything stamped with a completion time
pub trait Completed {
    fn completed_at(&self) -> &Timestamp;
}

impl Completed for CompletionEntry {
    fn completed_at(&self) -> &Timestamp {
        &self.completed_at
    }
}

impl Completed for FeedEntry {
    fn completed_at(&self) -> &Timestamp {
        &self.completed_at
    }
}

/// Sort entries newest first; unparsable timestamps sink to the end.
pub fn sort_newest_first<E: Completed>(entries: &mut [E]) {
    entries.sort_by_key(|entry| Reverse(entry.completed_at().parse()));
}

/// "1 entry" / "3 entries"
pub fn entry_count_label(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", count)
    }
}
