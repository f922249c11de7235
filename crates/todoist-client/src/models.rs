//! Remote entity records.
//!
//! Each entity carries typed fields for what the adapter reads and a
//! flattened `extra` map for everything else, so structured output stays
//! lossless across API revisions. Typed fields keep the remote key names
//! on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Todoist project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_style: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A section inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(
        default,
        rename = "section_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resolved due information attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Due {
    #[serde(default)]
    pub string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Task deadline (date plus language hint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Estimated task duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub amount: u32,
    pub unit: String,
}

/// A Todoist task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Due>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TaskDuration>,
    #[serde(
        default,
        rename = "responsible_uid",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<String>,
    #[serde(default, rename = "checked")]
    pub is_completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_priority() -> u8 {
    1
}

/// A comment on a task or project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(default, rename = "item_id", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
