//! MCP ServerHandler implementation for Todoist.
//!
//! Every tool delegates to a function in [`crate::tools`] and passes the
//! result through [`render`], so callers always receive a single text
//! payload:
//!
//! **Projects**
//! - `todoist_get_projects`, `todoist_get_project`, `todoist_add_project`,
//!   `todoist_update_project`, `todoist_delete_project`
//!
//! **Sections**
//! - `todoist_get_sections`, `todoist_get_section`, `todoist_add_section`,
//!   `todoist_update_section`, `todoist_delete_section`
//! - `todoist_update_section_by_name`, `todoist_delete_section_by_name`
//!
//! **Tasks**
//! - `todoist_get_task`, `todoist_get_tasks`, `todoist_filter_tasks`
//! - `todoist_add_task`, `todoist_update_task`, `todoist_delete_task`
//! - `todoist_complete_task`, `todoist_uncomplete_task`, `todoist_move_task`
//! - `todoist_update_task_by_name`, `todoist_delete_task_by_name`,
//!   `todoist_complete_task_by_name`
//!
//! **Comments**
//! - `todoist_get_comment`, `todoist_get_comments`, `todoist_add_comment`,
//!   `todoist_update_comment`, `todoist_delete_comment`

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use todoist_client::TodoistApi;
use todoist_sdk::{render, OutputFormat};

use crate::tools::{self, *};

/// Todoist MCP server handler over an injected API facade.
#[derive(Debug, Clone)]
pub struct TodoistMcpServer {
    tool_router: ToolRouter<Self>,
    api: Arc<dyn TodoistApi>,
    format: OutputFormat,
}

impl TodoistMcpServer {
    pub fn new(api: Arc<dyn TodoistApi>, format: OutputFormat) -> Self {
        Self {
            tool_router: Self::tool_router(),
            api,
            format,
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TodoistMcpServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "You manage a Todoist account: projects, sections, tasks and comments.\n\
             Reads: todoist_get_projects, todoist_get_sections, todoist_get_tasks, \
             todoist_filter_tasks (Todoist filter syntax, e.g. 'today | overdue'), \
             todoist_get_comments, plus single-item todoist_get_* tools.\n\
             List tools return at most 100 items unless 'nmax' is given; \
             pass nmax: null for all.\n\
             Writes: todoist_add_*, todoist_update_*, todoist_delete_*, todoist_complete_task, \
             todoist_uncomplete_task, todoist_move_task (exactly one of parent_id, section_id, \
             project_id).\n\
             When you only know a name, use todoist_update_task_by_name, \
             todoist_delete_task_by_name, \
             todoist_complete_task_by_name, todoist_update_section_by_name or \
             todoist_delete_section_by_name. Matching is case-insensitive: a substring match wins, \
             otherwise every word of the name must appear in order, so 'Buy milk' also matches \
             'Buy almond milk'. The first match is acted on; \
             confirm the target before deleting by name.\n\
             Results are returned as {}.",
            match self.format {
                OutputFormat::Json => "pretty-printed JSON",
                OutputFormat::Text => "plain-text summaries",
            }
        );

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "todoist-mcp".to_string(),
                title: Some("Todoist MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing Todoist projects, sections, tasks and comments"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}

#[tool_router(router = tool_router)]
impl TodoistMcpServer {
    // ── Projects ──

    #[tool(
        name = "todoist_get_projects",
        description = "List projects in the Todoist account. Returns at most 'nmax' projects (default 100, null for all), fetched 'limit' per page."
    )]
    pub async fn get_projects(&self, Parameters(params): Parameters<GetProjectsParams>) -> String {
        render(
            "getting projects",
            tools::projects::get_projects(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_get_project", description = "Get a single project by ID.")]
    pub async fn get_project(&self, Parameters(params): Parameters<ProjectIdParams>) -> String {
        render(
            "getting project",
            tools::projects::get_project(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_add_project",
        description = "Create a project. Unknown view_style values are ignored."
    )]
    pub async fn add_project(&self, Parameters(params): Parameters<AddProjectParams>) -> String {
        render(
            "creating project",
            tools::projects::add_project(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_update_project",
        description = "Update a project's name, color, favorite flag or view style. Empty strings are ignored."
    )]
    pub async fn update_project(
        &self,
        Parameters(params): Parameters<UpdateProjectParams>,
    ) -> String {
        render(
            "updating project",
            tools::projects::update_project(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_delete_project",
        description = "Delete a project and everything in it."
    )]
    pub async fn delete_project(&self, Parameters(params): Parameters<ProjectIdParams>) -> String {
        render(
            "deleting project",
            tools::projects::delete_project(self.api.as_ref(), params).await,
        )
    }

    // ── Sections ──

    #[tool(
        name = "todoist_get_sections",
        description = "List sections, optionally only those of one project. Supports 'nmax' and 'limit' like todoist_get_projects."
    )]
    pub async fn get_sections(&self, Parameters(params): Parameters<GetSectionsParams>) -> String {
        render(
            "getting sections",
            tools::sections::get_sections(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_get_section", description = "Get a single section by ID.")]
    pub async fn get_section(&self, Parameters(params): Parameters<SectionIdParams>) -> String {
        render(
            "getting section",
            tools::sections::get_section(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_add_section", description = "Create a section in a project.")]
    pub async fn add_section(&self, Parameters(params): Parameters<AddSectionParams>) -> String {
        render(
            "creating section",
            tools::sections::add_section(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_update_section", description = "Rename a section by ID.")]
    pub async fn update_section(
        &self,
        Parameters(params): Parameters<UpdateSectionParams>,
    ) -> String {
        render(
            "updating section",
            tools::sections::update_section(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_delete_section",
        description = "Delete a section and the tasks in it."
    )]
    pub async fn delete_section(&self, Parameters(params): Parameters<SectionIdParams>) -> String {
        render(
            "deleting section",
            tools::sections::delete_section(self.api.as_ref(), params).await,
        )
    }

    #[tool(
        name = "todoist_update_section_by_name",
        description = "Rename the first section whose name matches 'section_name' (case-insensitive substring, else all words in order). Acts on the first match only."
    )]
    pub async fn update_section_by_name(
        &self,
        Parameters(params): Parameters<UpdateSectionByNameParams>,
    ) -> String {
        render(
            "updating section",
            tools::sections::update_section_by_name(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_delete_section_by_name",
        description = "Delete the first section whose name matches 'section_name' (case-insensitive substring, else all words in order). Irreversible, removes the section's tasks, and acts on the first match only; prefer todoist_delete_section when the ID is known."
    )]
    pub async fn delete_section_by_name(
        &self,
        Parameters(params): Parameters<SectionNameParams>,
    ) -> String {
        render(
            "deleting section",
            tools::sections::delete_section_by_name(self.api.as_ref(), params).await,
        )
    }

    // ── Tasks ──

    #[tool(name = "todoist_get_task", description = "Get a single task by ID.")]
    pub async fn get_task(&self, Parameters(params): Parameters<TaskIdParams>) -> String {
        render(
            "getting task",
            tools::tasks::get_task(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_get_tasks",
        description = "List open tasks, filtered by project, section, parent, label or explicit IDs. Supports 'nmax' and 'limit'."
    )]
    pub async fn get_tasks(&self, Parameters(params): Parameters<GetTasksParams>) -> String {
        render(
            "getting tasks",
            tools::tasks::get_tasks(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_filter_tasks",
        description = "List tasks matching a Todoist filter query such as 'today | overdue' or '#Work & p1'. Supports 'nmax' and 'limit'."
    )]
    pub async fn filter_tasks(&self, Parameters(params): Parameters<FilterTasksParams>) -> String {
        render(
            "filtering tasks",
            tools::tasks::filter_tasks(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_add_task",
        description = "Create a task. Give at most one of due_string, due_date, due_datetime. Out-of-range priority and incomplete duration pairs are ignored."
    )]
    pub async fn add_task(&self, Parameters(params): Parameters<AddTaskParams>) -> String {
        render(
            "creating task",
            tools::tasks::add_task(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_update_task",
        description = "Update a task by ID. Only the given fields change; assignee_id: null unassigns."
    )]
    pub async fn update_task(&self, Parameters(params): Parameters<UpdateTaskParams>) -> String {
        render(
            "updating task",
            tools::tasks::update_task(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_complete_task", description = "Mark a task as completed.")]
    pub async fn complete_task(&self, Parameters(params): Parameters<TaskIdParams>) -> String {
        render(
            "closing task",
            tools::tasks::complete_task(self.api.as_ref(), params).await,
        )
    }

    #[tool(name = "todoist_uncomplete_task", description = "Reopen a completed task.")]
    pub async fn uncomplete_task(&self, Parameters(params): Parameters<TaskIdParams>) -> String {
        render(
            "reopening task",
            tools::tasks::uncomplete_task(self.api.as_ref(), params).await,
        )
    }

    #[tool(
        name = "todoist_move_task",
        description = "Move a task under a parent task, into a section, or into a project. Exactly one of parent_id, section_id, project_id must be given."
    )]
    pub async fn move_task(&self, Parameters(params): Parameters<MoveTaskParams>) -> String {
        render(
            "moving task",
            tools::tasks::move_task(self.api.as_ref(), params).await,
        )
    }

    #[tool(name = "todoist_delete_task", description = "Delete a task by ID.")]
    pub async fn delete_task(&self, Parameters(params): Parameters<TaskIdParams>) -> String {
        render(
            "deleting task",
            tools::tasks::delete_task(self.api.as_ref(), params).await,
        )
    }

    #[tool(
        name = "todoist_update_task_by_name",
        description = "Update the first open task whose content matches 'task_name' (case-insensitive substring, else all words in order). Acts on the first match only."
    )]
    pub async fn update_task_by_name(
        &self,
        Parameters(params): Parameters<UpdateTaskByNameParams>,
    ) -> String {
        render(
            "updating task",
            tools::tasks::update_task_by_name(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_delete_task_by_name",
        description = "Delete the first open task whose content matches 'task_name' (case-insensitive substring, else all words in order, so 'Buy milk' matches 'Buy almond milk'). Irreversible and acts on the first match only; prefer todoist_delete_task when the ID is known."
    )]
    pub async fn delete_task_by_name(
        &self,
        Parameters(params): Parameters<TaskNameParams>,
    ) -> String {
        render(
            "deleting task",
            tools::tasks::delete_task_by_name(self.api.as_ref(), params).await,
        )
    }

    #[tool(
        name = "todoist_complete_task_by_name",
        description = "Complete the first open task whose content matches 'task_name' (case-insensitive substring, else all words in order). Acts on the first match only."
    )]
    pub async fn complete_task_by_name(
        &self,
        Parameters(params): Parameters<TaskNameParams>,
    ) -> String {
        render(
            "closing task",
            tools::tasks::complete_task_by_name(self.api.as_ref(), params).await,
        )
    }

    // ── Comments ──

    #[tool(name = "todoist_get_comment", description = "Get a single comment by ID.")]
    pub async fn get_comment(&self, Parameters(params): Parameters<CommentIdParams>) -> String {
        render(
            "getting comment",
            tools::comments::get_comment(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_get_comments",
        description = "List the comments of exactly one project or task. Supports 'nmax' and 'limit'."
    )]
    pub async fn get_comments(&self, Parameters(params): Parameters<GetCommentsParams>) -> String {
        render(
            "getting comments",
            tools::comments::get_comments(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(
        name = "todoist_add_comment",
        description = "Comment on exactly one project or task, optionally notifying users."
    )]
    pub async fn add_comment(&self, Parameters(params): Parameters<AddCommentParams>) -> String {
        render(
            "creating comment",
            tools::comments::add_comment(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_update_comment", description = "Replace a comment's text.")]
    pub async fn update_comment(
        &self,
        Parameters(params): Parameters<UpdateCommentParams>,
    ) -> String {
        render(
            "updating comment",
            tools::comments::update_comment(self.api.as_ref(), self.format, params).await,
        )
    }

    #[tool(name = "todoist_delete_comment", description = "Delete a comment by ID.")]
    pub async fn delete_comment(&self, Parameters(params): Parameters<CommentIdParams>) -> String {
        render(
            "deleting comment",
            tools::comments::delete_comment(self.api.as_ref(), params).await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use todoist_client::testing::InMemoryTodoist;

    fn server_with(api: &Arc<InMemoryTodoist>, format: OutputFormat) -> TodoistMcpServer {
        TodoistMcpServer::new(api.clone(), format)
    }

    #[test]
    fn test_server_info() {
        let api = Arc::new(InMemoryTodoist::new());
        let info = server_with(&api, OutputFormat::Text).get_info();

        assert_eq!(info.server_info.name, "todoist-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        let instructions = info.instructions.unwrap();
        assert!(instructions.contains("todoist_filter_tasks"));
        assert!(instructions.contains("plain-text"));
    }

    #[test]
    fn test_router_registers_every_tool() {
        let api = Arc::new(InMemoryTodoist::new());
        let server = server_with(&api, OutputFormat::Json);
        let names: BTreeSet<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        let expected: BTreeSet<String> = [
            "todoist_get_projects",
            "todoist_get_project",
            "todoist_add_project",
            "todoist_update_project",
            "todoist_delete_project",
            "todoist_get_sections",
            "todoist_get_section",
            "todoist_add_section",
            "todoist_update_section",
            "todoist_delete_section",
            "todoist_update_section_by_name",
            "todoist_delete_section_by_name",
            "todoist_get_task",
            "todoist_get_tasks",
            "todoist_filter_tasks",
            "todoist_add_task",
            "todoist_update_task",
            "todoist_complete_task",
            "todoist_uncomplete_task",
            "todoist_move_task",
            "todoist_delete_task",
            "todoist_update_task_by_name",
            "todoist_delete_task_by_name",
            "todoist_complete_task_by_name",
            "todoist_get_comment",
            "todoist_get_comments",
            "todoist_add_comment",
            "todoist_update_comment",
            "todoist_delete_comment",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_by_name_delete_describes_fallback() {
        let api = Arc::new(InMemoryTodoist::new());
        let server = server_with(&api, OutputFormat::Json);
        let tool = server
            .tool_router
            .list_all()
            .into_iter()
            .find(|t| t.name == "todoist_delete_task_by_name")
            .unwrap();
        let description = tool.description.unwrap();
        assert!(description.contains("all words in order"));
        assert!(description.contains("Irreversible"));
    }

    #[tokio::test]
    async fn test_failure_becomes_text() {
        let api = Arc::new(InMemoryTodoist::new());
        let server = server_with(&api, OutputFormat::Json);
        let out = server
            .get_task(Parameters(TaskIdParams {
                task_id: "t404".into(),
            }))
            .await;
        assert_eq!(out, "Error getting task: API error: 404 - Task not found");
    }

    #[tokio::test]
    async fn test_add_then_complete_by_name() {
        let api = Arc::new(InMemoryTodoist::new());
        let server = server_with(&api, OutputFormat::Text);
        let params: AddTaskParams =
            serde_json::from_value(serde_json::json!({"content": "Buy almond milk"})).unwrap();
        let out = server.add_task(Parameters(params)).await;
        assert!(out.starts_with("- Buy almond milk (ID: "));

        let out = server
            .complete_task_by_name(Parameters(TaskNameParams {
                task_name: "buy milk".into(),
            }))
            .await;
        assert!(out.starts_with("Successfully closed task: Buy almond milk"));
        assert!(api.tasks()[0].is_completed);
    }
}
