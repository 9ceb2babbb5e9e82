use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Canonical task identifier. A task created in the client carries a
/// provisional `Local` id (millisecond timestamp) until the server
/// acknowledges it with a durable `Remote` id; the swap happens through
/// `TaskStore::promote_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Local(i64),
    Remote(String),
}

impl TaskId {
    pub fn is_local(&self) -> bool {
        matches!(self, TaskId::Local(_))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Local(value) => write!(f, "{value}"),
            TaskId::Remote(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Incomplete,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Incomplete => "incomplete",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Normalizes an arbitrary wire value into the closed enumeration.
    /// Unknown values collapse to `Incomplete`, the initial state the
    /// client assigns on creation.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "incomplete" => Self::Incomplete,
            "in-progress" | "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            other => {
                warn!(status = other, "unknown task status; normalizing to incomplete");
                Self::Incomplete
            }
        }
    }

    /// Completion toggle. `Completed` flips to `Incomplete`; every other
    /// state flips to `Completed`, so a pending or in-progress task loses
    /// its original state after a toggle round trip.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Incomplete,
            _ => Self::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Optional start/end pair used by timeline and duration displays
/// (the `important` object on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, rename = "startTime")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, rename = "endTime")]
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// `end >= start` whenever both bounds are present.
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: TaskId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "dueDate", with = "due_date_serde")]
    pub due_date: Option<NaiveDate>,

    /// Free-text weekday label used for load-chart bucketing; not
    /// validated against `due_date`.
    #[serde(default)]
    pub day: Option<String>,

    #[serde(default, rename = "important")]
    pub window: Option<TimeWindow>,

    #[serde(default)]
    pub priority: Option<TaskPriority>,

    pub status: TaskStatus,
}

impl Task {
    /// Provisional task as created by the add form: local timestamp id
    /// and fixed initial status `incomplete`.
    pub fn new_local(
        title: String,
        description: String,
        due_date: Option<NaiveDate>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: TaskId::Local(now_ms),
            title,
            description,
            due_date,
            day: None,
            window: None,
            priority: None,
            status: TaskStatus::Incomplete,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Shallow-merges present patch fields into this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(day) = patch.day {
            self.day = day;
        }
        if let Some(window) = patch.window {
            self.window = window;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Field-level patch; `None` leaves a field untouched, `Some(None)`
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        rename = "dueDate",
        skip_serializing_if = "Option::is_none",
        with = "due_date_patch_serde"
    )]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Option<String>>,

    #[serde(rename = "important", skip_serializing_if = "Option::is_none")]
    pub window: Option<Option<TimeWindow>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<TaskPriority>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Parses a due date from either a plain `YYYY-MM-DD` value or the date
/// prefix of a full ISO datetime. Anything else is treated as absent,
/// which keeps overdue classification from silently comparing apples to
/// timestamps.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let prefix = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

pub(crate) mod due_date_serde {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_due_date))
    }
}

pub(crate) mod due_date_patch_serde {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<NaiveDate>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(Some(date)) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            _ => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<NaiveDate>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Some(raw.as_deref().and_then(super::parse_due_date)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{Task, TaskId, TaskPatch, TaskStatus, TimeWindow, parse_due_date};

    #[test]
    fn toggle_collapses_non_completed_states() {
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Incomplete);
        assert_eq!(TaskStatus::Incomplete.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);

        // A pending task loses its original state after a round trip.
        assert_eq!(
            TaskStatus::Pending.toggled().toggled(),
            TaskStatus::Incomplete
        );
    }

    #[test]
    fn status_parse_normalizes_unknown_values() {
        assert_eq!(TaskStatus::parse("pending"), TaskStatus::Pending);
        assert_eq!(TaskStatus::parse("In-Progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("completed"), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse("done"), TaskStatus::Incomplete);
        assert_eq!(TaskStatus::parse(""), TaskStatus::Incomplete);
    }

    #[test]
    fn due_date_accepts_plain_dates_and_iso_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        assert_eq!(parse_due_date("2025-01-01"), Some(expected));
        assert_eq!(parse_due_date("2025-01-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_due_date("tomorrow"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn time_window_ordering() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single();
        let end = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).single();

        let ordered = TimeWindow { start, end };
        assert!(ordered.is_ordered());

        let inverted = TimeWindow {
            start: end,
            end: start,
        };
        assert!(!inverted.is_ordered());

        let half_open = TimeWindow { start, end: None };
        assert!(half_open.is_ordered());
    }

    #[test]
    fn task_id_round_trips_untagged() {
        let local: TaskId = serde_json::from_str("1735689600000").expect("local id");
        assert_eq!(local, TaskId::Local(1_735_689_600_000));

        let remote: TaskId = serde_json::from_str("\"65f2a\"").expect("remote id");
        assert_eq!(remote, TaskId::Remote("65f2a".to_string()));

        assert_eq!(
            serde_json::to_string(&local).expect("serialize"),
            "1735689600000"
        );
        assert_eq!(
            serde_json::to_string(&remote).expect("serialize"),
            "\"65f2a\""
        );
    }

    #[test]
    fn task_parses_server_shape() {
        let raw = r#"{
            "_id": "65f2a",
            "title": "Ship report",
            "description": "quarterly",
            "dueDate": "2025-06-01T00:00:00.000Z",
            "status": "in-progress",
            "priority": "high",
            "important": {
                "startTime": "2025-06-01T09:00:00Z",
                "endTime": "2025-06-01T10:00:00Z"
            }
        }"#;

        let task: Task = serde_json::from_str(raw).expect("parse task");
        assert_eq!(task.id, TaskId::Remote("65f2a".to_string()));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(
            task.due_date,
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(task.window.as_ref().is_some_and(TimeWindow::is_ordered));
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut task = Task::new_local("A".to_string(), "old".to_string(), None, 1);
        task.apply(TaskPatch {
            description: Some("x".to_string()),
            ..TaskPatch::default()
        });

        assert_eq!(task.description, "x");
        assert_eq!(task.title, "A");
        assert_eq!(task.status, TaskStatus::Incomplete);
    }
}
