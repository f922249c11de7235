//! Task tools: reads, CRUD, completion, moves, and the by-name variants.

use todoist_client::{Task, TaskFilter, TaskQuery, TodoistApi};
use todoist_sdk::operational::commands::submit_move;
use todoist_sdk::operational::normalize::{self, DueArgs, NewTaskArgs, TaskFieldArgs};
use todoist_sdk::operational::outcome::{success, verify, ToolError, ToolResult};
use todoist_sdk::operational::pagination::{collect_pages, requested_nmax, PageLimits};
use todoist_sdk::operational::resolve;
use todoist_sdk::operational::responses::{format_collection, format_entity};
use todoist_sdk::OutputFormat;
use tracing::info;

use super::params::{
    AddTaskParams, FilterTasksParams, GetTasksParams, MoveTaskParams, TaskDetailParams,
    TaskIdParams, TaskNameParams, UpdateTaskByNameParams, UpdateTaskParams,
};

fn field_args(
    content: Option<String>,
    assignee_id: Option<Option<String>>,
    details: TaskDetailParams,
) -> TaskFieldArgs {
    TaskFieldArgs {
        content,
        description: details.description,
        labels: details.labels,
        priority: details.priority,
        due: DueArgs {
            due_string: details.due_string,
            due_date: details.due_date,
            due_datetime: details.due_datetime,
            due_lang: details.due_lang,
        },
        assignee_id,
        duration: details.duration,
        duration_unit: details.duration_unit,
        deadline_date: details.deadline_date,
        deadline_lang: details.deadline_lang,
    }
}

pub async fn get_task(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: TaskIdParams,
) -> ToolResult<String> {
    let task = api.get_task(&params.task_id).await?;
    format_entity(&task, format)
}

pub async fn get_tasks(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: GetTasksParams,
) -> ToolResult<String> {
    let query = TaskQuery {
        project_id: params.project_id,
        section_id: params.section_id,
        parent_id: params.parent_id,
        label: params.label,
        ids: params.ids.unwrap_or_default(),
    };
    let limits = PageLimits::new(params.page.limit, requested_nmax(params.page.nmax));
    let query = &query;
    let tasks: Vec<Task> = collect_pages(limits, move |page| api.list_tasks(query, page)).await?;
    info!(count = tasks.len(), "Retrieved tasks");
    format_collection(&tasks, format)
}

pub async fn filter_tasks(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: FilterTasksParams,
) -> ToolResult<String> {
    if params.filter.trim().is_empty() {
        return Err(ToolError::validation("filter must not be empty"));
    }
    let filter = TaskFilter {
        query: params.filter,
        lang: params.lang,
    };
    let limits = PageLimits::new(params.page.limit, requested_nmax(params.page.nmax));
    let filter = &filter;
    let tasks: Vec<Task> =
        collect_pages(limits, move |page| api.filter_tasks(filter, page)).await?;
    info!(count = tasks.len(), filter = %filter.query, "Filtered tasks");
    if tasks.is_empty() {
        return Ok("No tasks found matching the filter".to_string());
    }
    format_collection(&tasks, format)
}

pub async fn add_task(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: AddTaskParams,
) -> ToolResult<String> {
    let args = normalize::create_task(NewTaskArgs {
        project_id: params.project_id,
        section_id: params.section_id,
        parent_id: params.parent_id,
        order: params.order,
        fields: field_args(
            Some(params.content),
            params.assignee_id.map(Some),
            params.details,
        ),
    })?;
    let task = api.add_task(&args).await?;
    info!(task_id = %task.id, content = %task.content, "Created task");
    format_entity(&task, format)
}

pub async fn update_task(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateTaskParams,
) -> ToolResult<String> {
    let update = normalize::update_task(field_args(
        params.content,
        params.assignee_id,
        params.details,
    ))?;
    if update.is_empty() {
        return Ok(format!(
            "No update parameters provided for task ID: {}",
            params.task_id
        ));
    }

    verify("task", &params.task_id, "Update", api.get_task(&params.task_id)).await?;
    let task = api.update_task(&params.task_id, &update).await?;
    info!(task_id = %task.id, "Updated task");
    format_entity(&task, format)
}

pub async fn complete_task(api: &dyn TodoistApi, params: TaskIdParams) -> ToolResult<String> {
    let task = verify(
        "task",
        &params.task_id,
        "Task closing",
        api.get_task(&params.task_id),
    )
    .await?;
    api.close_task(&task.id).await?;
    info!(task_id = %task.id, "Closed task");
    Ok(success("closed", "task", &task.content, &task.id))
}

pub async fn uncomplete_task(api: &dyn TodoistApi, params: TaskIdParams) -> ToolResult<String> {
    let task = verify(
        "task",
        &params.task_id,
        "Task reopening",
        api.get_task(&params.task_id),
    )
    .await?;
    api.reopen_task(&task.id).await?;
    info!(task_id = %task.id, "Reopened task");
    Ok(success("reopened", "task", &task.content, &task.id))
}

pub async fn move_task(api: &dyn TodoistApi, params: MoveTaskParams) -> ToolResult<String> {
    let destination =
        normalize::move_destination(params.parent_id, params.section_id, params.project_id)?;
    let task = verify(
        "task",
        &params.task_id,
        "Task move",
        api.get_task(&params.task_id),
    )
    .await?;
    submit_move(api, &task.id, &destination).await?;
    info!(task_id = %task.id, ?destination, "Moved task");
    Ok(success("moved", "task", &task.content, &task.id))
}

pub async fn delete_task(api: &dyn TodoistApi, params: TaskIdParams) -> ToolResult<String> {
    let task = verify(
        "task",
        &params.task_id,
        "Deletion",
        api.get_task(&params.task_id),
    )
    .await?;
    api.delete_task(&task.id).await?;
    info!(task_id = %task.id, "Deleted task");
    Ok(success("deleted", "task", &task.content, &task.id))
}

pub async fn update_task_by_name(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateTaskByNameParams,
) -> ToolResult<String> {
    let update = normalize::update_task(field_args(
        params.content,
        params.assignee_id,
        params.details,
    ))?;
    if update.is_empty() {
        return Ok(format!(
            "No update parameters provided for task: {}",
            params.task_name
        ));
    }

    let task = resolve::task_by_name(api, &params.task_name).await?;
    let updated = api.update_task(&task.id, &update).await?;
    info!(task_id = %updated.id, "Updated task by name");
    format_entity(&updated, format)
}

pub async fn delete_task_by_name(
    api: &dyn TodoistApi,
    params: TaskNameParams,
) -> ToolResult<String> {
    let task = resolve::task_by_name(api, &params.task_name).await?;
    api.delete_task(&task.id).await?;
    info!(task_id = %task.id, "Deleted task by name");
    Ok(success("deleted", "task", &task.content, &task.id))
}

pub async fn complete_task_by_name(
    api: &dyn TodoistApi,
    params: TaskNameParams,
) -> ToolResult<String> {
    let task = resolve::task_by_name(api, &params.task_name).await?;
    api.close_task(&task.id).await?;
    info!(task_id = %task.id, "Closed task by name");
    Ok(success("closed", "task", &task.content, &task.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoist_client::testing::{CommandReply, InMemoryTodoist};

    fn update_params(task_id: &str, details: TaskDetailParams) -> UpdateTaskParams {
        UpdateTaskParams {
            task_id: task_id.into(),
            content: None,
            assignee_id: None,
            details,
        }
    }

    fn move_params(task_id: &str, parent: Option<&str>, section: Option<&str>) -> MoveTaskParams {
        MoveTaskParams {
            task_id: task_id.into(),
            parent_id: parent.map(String::from),
            section_id: section.map(String::from),
            project_id: None,
        }
    }

    #[tokio::test]
    async fn test_add_task_normalizes_arguments() {
        let api = InMemoryTodoist::new();
        let out = add_task(
            &api,
            OutputFormat::Json,
            AddTaskParams {
                content: "Write report".into(),
                project_id: None,
                section_id: None,
                parent_id: None,
                order: None,
                assignee_id: None,
                details: TaskDetailParams {
                    priority: Some(5),
                    due_datetime: Some("2024-03-15T09:30:00Z".into()),
                    duration: Some(30),
                    duration_unit: Some("minute".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["priority"], 1);
        assert_eq!(value["duration"]["amount"], 30);
        assert_eq!(value["due"]["datetime"], "2024-03-15T09:30:00+00:00");
    }

    #[tokio::test]
    async fn test_add_task_rejects_two_due_sources() {
        let api = InMemoryTodoist::new();
        let err = add_task(
            &api,
            OutputFormat::Json,
            AddTaskParams {
                content: "Write report".into(),
                project_id: None,
                section_id: None,
                parent_id: None,
                order: None,
                assignee_id: None,
                details: TaskDetailParams {
                    due_string: Some("tomorrow".into()),
                    due_date: Some("2024-03-15".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_nothing_effective_is_noop() {
        let api = InMemoryTodoist::new();
        let out = update_task(&api, OutputFormat::Json, update_params("t1", Default::default()))
            .await
            .unwrap();
        assert_eq!(out, "No update parameters provided for task ID: t1");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_verifies_then_updates() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        update_task(
            &api,
            OutputFormat::Text,
            update_params(
                &task.id,
                TaskDetailParams {
                    priority: Some(4),
                    ..Default::default()
                },
            ),
        )
        .await
        .unwrap();
        assert_eq!(
            api.calls(),
            vec![format!("get_task:{}", task.id), format!("update_task:{}", task.id)]
        );
        assert_eq!(api.task(&task.id).unwrap().priority, 4);
    }

    #[tokio::test]
    async fn test_update_clears_assignee() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Review PR");
        let mut params = update_params(&task.id, Default::default());
        params.assignee_id = Some(None);
        update_task(&api, OutputFormat::Json, params).await.unwrap();
        assert_eq!(api.task(&task.id).unwrap().assignee_id, None);
    }

    #[tokio::test]
    async fn test_move_with_two_destinations_issues_no_call() {
        let api = InMemoryTodoist::new();
        let err = move_task(&api, move_params("t1", Some("A"), Some("B")))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Exactly one of parent_id, section_id, or project_id must be specified"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_move_task_to_section() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        let out = move_task(&api, move_params(&task.id, None, Some("s1")))
            .await
            .unwrap();
        assert_eq!(
            out,
            format!("Successfully moved task: Buy milk (ID: {})", task.id)
        );
        assert_eq!(api.task(&task.id).unwrap().section_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_move_rejected_by_command_endpoint() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        api.set_command_reply(CommandReply::Status(serde_json::json!({"error": "Invalid"})));
        let err = move_task(&api, move_params(&task.id, Some("t0"), None))
            .await
            .unwrap_err();
        assert!(err.message("moving task").starts_with("Error moving task: command status"));
    }

    #[tokio::test]
    async fn test_complete_and_reopen() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        let id = TaskIdParams {
            task_id: task.id.clone(),
        };
        let out = complete_task(&api, id).await.unwrap();
        assert_eq!(out, format!("Successfully closed task: Buy milk (ID: {})", task.id));
        assert!(api.task(&task.id).unwrap().is_completed);

        let out = uncomplete_task(
            &api,
            TaskIdParams {
                task_id: task.id.clone(),
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Successfully reopened task: Buy milk"));
        assert!(!api.task(&task.id).unwrap().is_completed);
    }

    #[tokio::test]
    async fn test_delete_unknown_task_aborts() {
        let api = InMemoryTodoist::new();
        let err = delete_task(
            &api,
            TaskIdParams {
                task_id: "404".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not verify task with ID: 404. Deletion aborted."
        );
        assert_eq!(api.calls(), vec!["get_task:404".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_by_name_resolves_partial_match() {
        let api = InMemoryTodoist::new();
        api.seed_task("Walk dog");
        let milk = api.seed_task("Buy almond milk");
        let out = delete_task_by_name(
            &api,
            TaskNameParams {
                task_name: "Buy milk".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            format!("Successfully deleted task: Buy almond milk (ID: {})", milk.id)
        );
        assert!(api.task(&milk.id).is_none());
    }

    #[tokio::test]
    async fn test_complete_by_name_not_found() {
        let api = InMemoryTodoist::new();
        api.seed_task("Walk dog");
        let err = complete_task_by_name(
            &api,
            TaskNameParams {
                task_name: "Buy milk".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_tasks_by_ids_and_filter() {
        let api = InMemoryTodoist::new();
        let tasks = api.seed_tasks("Task", 3);
        let out = get_tasks(
            &api,
            OutputFormat::Json,
            GetTasksParams {
                project_id: None,
                section_id: None,
                parent_id: None,
                label: None,
                ids: Some(vec![tasks[0].id.clone(), tasks[2].id.clone()]),
                page: Default::default(),
            },
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);

        let out = filter_tasks(
            &api,
            OutputFormat::Text,
            FilterTasksParams {
                filter: "nothing matches".into(),
                lang: None,
                page: Default::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(out, "No tasks found matching the filter");
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces_as_error() {
        let api = InMemoryTodoist::new();
        api.fail_operation("list_tasks");
        let err = get_tasks(
            &api,
            OutputFormat::Json,
            GetTasksParams {
                project_id: None,
                section_id: None,
                parent_id: None,
                label: None,
                ids: None,
                page: Default::default(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.message("getting tasks"),
            "Error getting tasks: API error: 500 - list_tasks failed"
        );
    }
}
