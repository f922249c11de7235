//! Parameter structs for all MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};

/// Deserialize a field so that a present `null` becomes `Some(None)`,
/// leaving absence (`None`, via `#[serde(default)]`) distinguishable.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Pagination controls shared by every list tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Maximum number of results to return across all pages.
    #[serde(default, deserialize_with = "double_option")]
    #[schemars(
        with = "Option<i64>",
        description = "Maximum number of results across all pages (default 100; null for no limit)"
    )]
    pub nmax: Option<Option<i64>>,
    /// Page size per request.
    #[schemars(description = "Results per page (1-200, default 200)")]
    pub limit: Option<i64>,
}

// ── Projects ──

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetProjectsParams {
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectIdParams {
    #[schemars(description = "ID of the project")]
    pub project_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddProjectParams {
    #[schemars(description = "Name of the project")]
    pub name: String,
    #[schemars(description = "Color name (e.g. 'berry_red', 'blue')")]
    pub color: Option<String>,
    #[schemars(description = "ID of the parent project, for a sub-project")]
    pub parent_id: Option<String>,
    #[schemars(description = "Whether the project is a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "Layout: 'list', 'board', or 'calendar'")]
    pub view_style: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateProjectParams {
    #[schemars(description = "ID of the project to update")]
    pub project_id: String,
    #[schemars(description = "New name")]
    pub name: Option<String>,
    #[schemars(description = "New color name")]
    pub color: Option<String>,
    #[schemars(description = "Whether the project is a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "Layout: 'list', 'board', or 'calendar'")]
    pub view_style: Option<String>,
}

// ── Sections ──

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSectionsParams {
    #[schemars(description = "Only sections of this project")]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SectionIdParams {
    #[schemars(description = "ID of the section")]
    pub section_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddSectionParams {
    #[schemars(description = "Name of the section")]
    pub name: String,
    #[schemars(description = "ID of the project the section belongs to")]
    pub project_id: String,
    #[schemars(description = "Position among the project's sections")]
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateSectionParams {
    #[schemars(description = "ID of the section to rename")]
    pub section_id: String,
    #[schemars(description = "New name")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateSectionByNameParams {
    #[schemars(description = "Name (or part of it) of the section to rename")]
    pub section_name: String,
    #[schemars(description = "New name")]
    pub name: String,
    #[schemars(description = "Only search sections of this project")]
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SectionNameParams {
    #[schemars(description = "Name (or part of it) of the section")]
    pub section_name: String,
    #[schemars(description = "Only search sections of this project")]
    pub project_id: Option<String>,
}

// ── Tasks ──

/// Optional task attributes shared by the create and update tools.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TaskDetailParams {
    #[schemars(description = "Task description (Markdown)")]
    pub description: Option<String>,
    #[schemars(description = "Label names; replaces the task's labels")]
    pub labels: Option<Vec<String>>,
    #[schemars(description = "Priority from 1 (normal) to 4 (urgent)")]
    pub priority: Option<i64>,
    #[schemars(description = "Natural-language due date (e.g. 'tomorrow at 3pm', 'every monday')")]
    pub due_string: Option<String>,
    #[schemars(description = "Due date as YYYY-MM-DD")]
    pub due_date: Option<String>,
    #[schemars(description = "Due date-time in RFC3339 (e.g. '2024-03-15T09:30:00Z')")]
    pub due_datetime: Option<String>,
    #[schemars(description = "Language code for due_string (e.g. 'en')")]
    pub due_lang: Option<String>,
    #[schemars(description = "Duration amount (positive); requires duration_unit")]
    pub duration: Option<i64>,
    #[schemars(description = "Duration unit: 'minute' or 'day'; requires duration")]
    pub duration_unit: Option<String>,
    #[schemars(description = "Deadline as YYYY-MM-DD")]
    pub deadline_date: Option<String>,
    #[schemars(description = "Language code for the deadline")]
    pub deadline_lang: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskIdParams {
    #[schemars(description = "ID of the task")]
    pub task_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskNameParams {
    #[schemars(description = "Name (or part of it) of the task")]
    pub task_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTasksParams {
    #[schemars(description = "Only tasks in this project")]
    pub project_id: Option<String>,
    #[schemars(description = "Only tasks in this section")]
    pub section_id: Option<String>,
    #[schemars(description = "Only sub-tasks of this task")]
    pub parent_id: Option<String>,
    #[schemars(description = "Only tasks with this label")]
    pub label: Option<String>,
    #[schemars(description = "Only tasks with these IDs")]
    pub ids: Option<Vec<String>>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FilterTasksParams {
    #[schemars(description = "Todoist filter query (e.g. 'today | overdue', '#Work & p1')")]
    pub filter: String,
    #[schemars(description = "Language of the filter query (e.g. 'en')")]
    pub lang: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddTaskParams {
    #[schemars(description = "Task title")]
    pub content: String,
    #[schemars(description = "ID of the project to add the task to (defaults to Inbox)")]
    pub project_id: Option<String>,
    #[schemars(description = "ID of the section to add the task to")]
    pub section_id: Option<String>,
    #[schemars(description = "ID of the parent task, for a sub-task")]
    pub parent_id: Option<String>,
    #[schemars(description = "Position among sibling tasks")]
    pub order: Option<i64>,
    #[schemars(description = "User ID to assign (shared projects only)")]
    pub assignee_id: Option<String>,
    #[serde(flatten)]
    pub details: TaskDetailParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    #[schemars(description = "ID of the task to update")]
    pub task_id: String,
    #[schemars(description = "New task title")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schemars(
        with = "Option<String>",
        description = "User ID to assign; null to unassign (shared projects only)"
    )]
    pub assignee_id: Option<Option<String>>,
    #[serde(flatten)]
    pub details: TaskDetailParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTaskByNameParams {
    #[schemars(description = "Name (or part of it) of the task to update")]
    pub task_name: String,
    #[schemars(description = "New task title")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schemars(
        with = "Option<String>",
        description = "User ID to assign; null to unassign (shared projects only)"
    )]
    pub assignee_id: Option<Option<String>>,
    #[serde(flatten)]
    pub details: TaskDetailParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MoveTaskParams {
    #[schemars(description = "ID of the task to move")]
    pub task_id: String,
    #[schemars(description = "Make the task a sub-task of this task")]
    pub parent_id: Option<String>,
    #[schemars(description = "Move the task into this section")]
    pub section_id: Option<String>,
    #[schemars(description = "Move the task into this project")]
    pub project_id: Option<String>,
}

// ── Comments ──

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommentIdParams {
    #[schemars(description = "ID of the comment")]
    pub comment_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCommentsParams {
    #[schemars(description = "Comments of this project (exclusive with task_id)")]
    pub project_id: Option<String>,
    #[schemars(description = "Comments of this task (exclusive with project_id)")]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddCommentParams {
    #[schemars(description = "Comment text (Markdown)")]
    pub content: String,
    #[schemars(description = "Comment on this project (exclusive with task_id)")]
    pub project_id: Option<String>,
    #[schemars(description = "Comment on this task (exclusive with project_id)")]
    pub task_id: Option<String>,
    #[schemars(description = "User IDs to notify")]
    pub uids_to_notify: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateCommentParams {
    #[schemars(description = "ID of the comment to update")]
    pub comment_id: String,
    #[schemars(description = "New comment text")]
    pub content: String,
}
