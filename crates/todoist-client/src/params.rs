//! Request parameter records sent to the remote service.
//!
//! Every optional field is skipped when `None`, so a record only ever
//! carries the values a caller actually supplied.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Project layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStyle {
    List,
    Board,
    Calendar,
}

impl ViewStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Board => "board",
            Self::Calendar => "calendar",
        }
    }
}

/// Unit of a task duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Minute,
    Day,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Day => "day",
        }
    }
}

/// A duration amount and unit. Always serialized as the
/// `duration` / `duration_unit` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationSpec {
    #[serde(rename = "duration")]
    pub amount: u32,
    #[serde(rename = "duration_unit")]
    pub unit: DurationUnit,
}

/// The single authoritative source of a task's due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueSpec {
    /// Natural-language, resolved remotely (e.g. "next Monday").
    Natural(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl DueSpec {
    /// RFC3339 text with an explicit numeric offset (`+00:00`, never `Z`).
    pub fn datetime_text(dt: &DateTime<FixedOffset>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

/// Flat wire representation of a [`DueSpec`].
#[derive(Debug, Serialize)]
struct DueFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    due_string: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<&'a NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_datetime: Option<String>,
}

impl Serialize for DueSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = match self {
            Self::Natural(s) => DueFields {
                due_string: Some(s),
                due_date: None,
                due_datetime: None,
            },
            Self::Date(d) => DueFields {
                due_string: None,
                due_date: Some(d),
                due_datetime: None,
            },
            Self::DateTime(dt) => DueFields {
                due_string: None,
                due_date: None,
                due_datetime: Some(Self::datetime_text(dt)),
            },
        };
        fields.serialize(serializer)
    }
}

/// Task placement and label filters for `GET /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    pub parent_id: Option<String>,
    pub label: Option<String>,
    pub ids: Vec<String>,
}

/// Natural-language filter for `GET /tasks/filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub query: String,
    pub lang: Option<String>,
}

/// The one entity a comment belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOwner {
    Project(String),
    Task(String),
}

impl CommentOwner {
    /// Query parameter name and value for this owner.
    pub fn as_pair(&self) -> (&'static str, &str) {
        match self {
            Self::Project(id) => ("project_id", id),
            Self::Task(id) => ("task_id", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_style: Option<ViewStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_style: Option<ViewStyle>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSection {
    pub name: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSection {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub due: Option<DueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_lang: Option<String>,
}

/// Fields to change on an existing task.
///
/// `assignee_id` is the only field with explicit-clear semantics:
/// `Some(None)` serializes as `null` and unassigns the task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub due: Option<DueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_lang: Option<String>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateComment {
    pub content: String,
    pub owner: CommentOwner,
    pub uids_to_notify: Option<Vec<String>>,
}

impl CreateComment {
    /// Wire body including the owner reference.
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "content": self.content });
        let (key, id) = self.owner.as_pair();
        body[key] = serde_json::Value::String(id.to_string());
        if let Some(uids) = &self.uids_to_notify {
            body["uids_to_notify"] = serde_json::json!(uids);
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateComment {
    pub content: String,
}
