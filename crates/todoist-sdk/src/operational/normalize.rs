//! Argument normalization: raw tool arguments to remote parameter records.
//!
//! Everything here runs before the first network call. Constraint
//! violations that the tool surface treats as soft (priority range,
//! duration pairing, view style) drop the value; combination errors and
//! unparseable dates fail with a [`ToolError`].

use chrono::{DateTime, FixedOffset, NaiveDate};
use todoist_client::{
    CommentOwner, CreateComment, CreateProject, CreateSection, CreateTask, DueSpec, DurationSpec,
    UpdateProject, UpdateTask, ViewStyle,
};
use tracing::{debug, warn};

use super::enums::{parse_duration_unit, parse_view_style};
use super::outcome::{ToolError, ToolResult};

/// Due-date arguments as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueArgs {
    pub due_string: Option<String>,
    pub due_date: Option<String>,
    pub due_datetime: Option<String>,
    pub due_lang: Option<String>,
}

/// Mutable task fields shared by create and update.
///
/// `assignee_id` distinguishes absent (`None`) from explicit clear
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFieldArgs {
    pub content: Option<String>,
    pub description: Option<String>,
    pub labels: Option<Vec<String>>,
    pub priority: Option<i64>,
    pub due: DueArgs,
    pub assignee_id: Option<Option<String>>,
    pub duration: Option<i64>,
    pub duration_unit: Option<String>,
    pub deadline_date: Option<String>,
    pub deadline_lang: Option<String>,
}

/// Arguments for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskArgs {
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    pub parent_id: Option<String>,
    pub order: Option<i64>,
    pub fields: TaskFieldArgs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectArgs {
    pub name: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<String>,
    pub is_favorite: Option<bool>,
    pub view_style: Option<String>,
}

/// The single container a task is moved into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveDestination {
    Parent(String),
    Section(String),
    Project(String),
}

/// Keep `priority` only when it lies in 1..=4.
pub fn priority(value: Option<i64>) -> Option<u8> {
    let value = value?;
    match u8::try_from(value) {
        Ok(p @ 1..=4) => Some(p),
        _ => {
            debug!(priority = value, "Dropping out-of-range priority");
            None
        }
    }
}

/// Accept `duration` and `duration_unit` only as a valid pair.
pub fn duration(amount: Option<i64>, unit: Option<&str>) -> Option<DurationSpec> {
    match (amount, unit) {
        (None, None) => None,
        (Some(amount), Some(unit)) => {
            let Some(amount) = u32::try_from(amount).ok().filter(|a| *a > 0) else {
                warn!(duration = amount, "Dropping duration: amount must be positive");
                return None;
            };
            match parse_duration_unit(unit) {
                Ok(unit) => Some(DurationSpec { amount, unit }),
                Err(reason) => {
                    warn!(%reason, "Dropping duration");
                    None
                }
            }
        }
        (amount, unit) => {
            warn!(
                duration = ?amount,
                duration_unit = ?unit,
                "Dropping duration: duration and duration_unit must be provided together"
            );
            None
        }
    }
}

/// Keep `view_style` only when it names a known layout.
pub fn view_style(value: Option<&str>) -> Option<ViewStyle> {
    let value = value?;
    match parse_view_style(value) {
        Ok(style) => Some(style),
        Err(reason) => {
            debug!(%reason, "Dropping view_style");
            None
        }
    }
}

pub fn parse_date(field: &'static str, value: &str) -> ToolResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ToolError::invalid_argument(field, value, e))
}

/// Parse an RFC3339 timestamp, rewriting a trailing `Z` to `+00:00` first.
pub fn parse_datetime(field: &'static str, value: &str) -> ToolResult<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized)
        .map_err(|e| ToolError::invalid_argument(field, value, e))
}

/// Resolve the due arguments to at most one authoritative source.
pub fn due(args: &DueArgs) -> ToolResult<Option<DueSpec>> {
    let supplied = [&args.due_string, &args.due_date, &args.due_datetime]
        .iter()
        .filter(|v| v.is_some())
        .count();
    if supplied > 1 {
        return Err(ToolError::validation(
            "Only one of due_string, due_date, or due_datetime may be specified",
        ));
    }

    if let Some(s) = &args.due_string {
        return Ok(Some(DueSpec::Natural(s.clone())));
    }
    if let Some(d) = &args.due_date {
        return Ok(Some(DueSpec::Date(parse_date("due_date", d)?)));
    }
    if let Some(dt) = &args.due_datetime {
        return Ok(Some(DueSpec::DateTime(parse_datetime("due_datetime", dt)?)));
    }
    Ok(None)
}

fn deadline(fields: &TaskFieldArgs) -> ToolResult<Option<NaiveDate>> {
    fields
        .deadline_date
        .as_deref()
        .map(|d| parse_date("deadline_date", d))
        .transpose()
}

pub fn create_task(args: NewTaskArgs) -> ToolResult<CreateTask> {
    let NewTaskArgs {
        project_id,
        section_id,
        parent_id,
        order,
        fields,
    } = args;

    let content = fields
        .content
        .clone()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ToolError::validation("Task content must not be empty"))?;

    Ok(CreateTask {
        content,
        description: fields.description.clone(),
        project_id,
        section_id,
        parent_id,
        order,
        labels: fields.labels.clone(),
        priority: priority(fields.priority),
        due: due(&fields.due)?,
        due_lang: fields.due.due_lang.clone(),
        assignee_id: fields.assignee_id.clone().flatten(),
        duration: duration(fields.duration, fields.duration_unit.as_deref()),
        deadline_date: deadline(&fields)?,
        deadline_lang: fields.deadline_lang.clone(),
    })
}

/// Build a task update. An empty result means nothing would change.
pub fn update_task(fields: TaskFieldArgs) -> ToolResult<UpdateTask> {
    Ok(UpdateTask {
        due: due(&fields.due)?,
        deadline_date: deadline(&fields)?,
        priority: priority(fields.priority),
        duration: duration(fields.duration, fields.duration_unit.as_deref()),
        content: fields.content,
        description: fields.description,
        labels: fields.labels,
        due_lang: fields.due.due_lang,
        assignee_id: fields.assignee_id,
        deadline_lang: fields.deadline_lang,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn create_project(args: ProjectArgs) -> ToolResult<CreateProject> {
    let name = non_empty(args.name)
        .ok_or_else(|| ToolError::validation("Project name must not be empty"))?;
    Ok(CreateProject {
        name,
        color: non_empty(args.color),
        parent_id: non_empty(args.parent_id),
        is_favorite: args.is_favorite,
        view_style: view_style(args.view_style.as_deref()),
    })
}

/// Build a project update; empty strings count as not provided.
pub fn update_project(args: ProjectArgs) -> UpdateProject {
    UpdateProject {
        name: non_empty(args.name),
        color: non_empty(args.color),
        is_favorite: args.is_favorite,
        view_style: view_style(args.view_style.as_deref()),
    }
}

pub fn create_section(
    name: String,
    project_id: String,
    order: Option<i64>,
) -> ToolResult<CreateSection> {
    if name.trim().is_empty() {
        return Err(ToolError::validation("Section name must not be empty"));
    }
    if project_id.trim().is_empty() {
        return Err(ToolError::validation("project_id must not be empty"));
    }
    Ok(CreateSection {
        name,
        project_id,
        order,
    })
}

/// Exactly one of the three destinations must be set.
pub fn move_destination(
    parent_id: Option<String>,
    section_id: Option<String>,
    project_id: Option<String>,
) -> ToolResult<MoveDestination> {
    match (parent_id, section_id, project_id) {
        (Some(id), None, None) => Ok(MoveDestination::Parent(id)),
        (None, Some(id), None) => Ok(MoveDestination::Section(id)),
        (None, None, Some(id)) => Ok(MoveDestination::Project(id)),
        _ => Err(ToolError::validation(
            "Exactly one of parent_id, section_id, or project_id must be specified",
        )),
    }
}

/// Exactly one of project or task must own a comment.
pub fn comment_owner(
    project_id: Option<String>,
    task_id: Option<String>,
) -> ToolResult<CommentOwner> {
    match (project_id, task_id) {
        (Some(id), None) => Ok(CommentOwner::Project(id)),
        (None, Some(id)) => Ok(CommentOwner::Task(id)),
        _ => Err(ToolError::validation(
            "Exactly one of project_id or task_id must be specified",
        )),
    }
}

pub fn create_comment(
    content: String,
    project_id: Option<String>,
    task_id: Option<String>,
    uids_to_notify: Option<Vec<String>>,
) -> ToolResult<CreateComment> {
    let owner = comment_owner(project_id, task_id)?;
    if content.trim().is_empty() {
        return Err(ToolError::validation("Comment content must not be empty"));
    }
    Ok(CreateComment {
        content,
        owner,
        uids_to_notify: uids_to_notify.filter(|uids| !uids.is_empty()),
    })
}
