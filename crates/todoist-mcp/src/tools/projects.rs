//! Project tools.

use todoist_client::{Project, TodoistApi};
use todoist_sdk::operational::normalize::{self, ProjectArgs};
use todoist_sdk::operational::outcome::{success, verify, ToolResult};
use todoist_sdk::operational::pagination::{collect_pages, requested_nmax, PageLimits};
use todoist_sdk::operational::responses::{format_collection, format_entity};
use todoist_sdk::OutputFormat;
use tracing::info;

use super::params::{AddProjectParams, GetProjectsParams, ProjectIdParams, UpdateProjectParams};

pub async fn get_projects(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: GetProjectsParams,
) -> ToolResult<String> {
    let limits = PageLimits::new(params.page.limit, requested_nmax(params.page.nmax));
    let projects: Vec<Project> = collect_pages(limits, move |page| api.list_projects(page)).await?;
    info!(count = projects.len(), "Retrieved projects");
    format_collection(&projects, format)
}

pub async fn get_project(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: ProjectIdParams,
) -> ToolResult<String> {
    let project = api.get_project(&params.project_id).await?;
    format_entity(&project, format)
}

pub async fn add_project(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: AddProjectParams,
) -> ToolResult<String> {
    let args = normalize::create_project(ProjectArgs {
        name: Some(params.name),
        color: params.color,
        parent_id: params.parent_id,
        is_favorite: params.is_favorite,
        view_style: params.view_style,
    })?;
    let project = api.add_project(&args).await?;
    info!(project_id = %project.id, name = %project.name, "Created project");
    format_entity(&project, format)
}

pub async fn update_project(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateProjectParams,
) -> ToolResult<String> {
    let update = normalize::update_project(ProjectArgs {
        name: params.name,
        color: params.color,
        parent_id: None,
        is_favorite: params.is_favorite,
        view_style: params.view_style,
    });
    if update.is_empty() {
        return Ok(format!(
            "No update parameters provided for project ID: {}",
            params.project_id
        ));
    }

    verify(
        "project",
        &params.project_id,
        "Update",
        api.get_project(&params.project_id),
    )
    .await?;
    let project = api.update_project(&params.project_id, &update).await?;
    info!(project_id = %project.id, "Updated project");
    format_entity(&project, format)
}

pub async fn delete_project(api: &dyn TodoistApi, params: ProjectIdParams) -> ToolResult<String> {
    let project = verify(
        "project",
        &params.project_id,
        "Deletion",
        api.get_project(&params.project_id),
    )
    .await?;
    api.delete_project(&project.id).await?;
    info!(project_id = %project.id, "Deleted project");
    Ok(success("deleted", "project", &project.name, &project.id))
}
