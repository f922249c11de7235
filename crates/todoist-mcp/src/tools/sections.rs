//! Section tools, including the by-name variants.

use todoist_client::{Section, TodoistApi, UpdateSection};
use todoist_sdk::operational::normalize;
use todoist_sdk::operational::outcome::{success, verify, ToolError, ToolResult};
use todoist_sdk::operational::pagination::{collect_pages, requested_nmax, PageLimits};
use todoist_sdk::operational::resolve;
use todoist_sdk::operational::responses::{format_collection, format_entity};
use todoist_sdk::OutputFormat;
use tracing::info;

use super::params::{
    AddSectionParams, GetSectionsParams, SectionIdParams, SectionNameParams,
    UpdateSectionByNameParams, UpdateSectionParams,
};

fn rename(name: String) -> ToolResult<UpdateSection> {
    if name.trim().is_empty() {
        return Err(ToolError::validation("Section name must not be empty"));
    }
    Ok(UpdateSection { name })
}

pub async fn get_sections(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: GetSectionsParams,
) -> ToolResult<String> {
    let limits = PageLimits::new(params.page.limit, requested_nmax(params.page.nmax));
    let project_id = params.project_id.as_deref();
    let sections: Vec<Section> =
        collect_pages(limits, move |page| api.list_sections(project_id, page)).await?;
    info!(count = sections.len(), project_id, "Retrieved sections");
    format_collection(&sections, format)
}

pub async fn get_section(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: SectionIdParams,
) -> ToolResult<String> {
    let section = api.get_section(&params.section_id).await?;
    format_entity(&section, format)
}

pub async fn add_section(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: AddSectionParams,
) -> ToolResult<String> {
    let args = normalize::create_section(params.name, params.project_id, params.order)?;
    let section = api.add_section(&args).await?;
    info!(section_id = %section.id, project_id = %section.project_id, "Created section");
    format_entity(&section, format)
}

pub async fn update_section(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateSectionParams,
) -> ToolResult<String> {
    let update = rename(params.name)?;
    verify(
        "section",
        &params.section_id,
        "Update",
        api.get_section(&params.section_id),
    )
    .await?;
    let section = api.update_section(&params.section_id, &update).await?;
    info!(section_id = %section.id, "Updated section");
    format_entity(&section, format)
}

pub async fn delete_section(api: &dyn TodoistApi, params: SectionIdParams) -> ToolResult<String> {
    let section = verify(
        "section",
        &params.section_id,
        "Deletion",
        api.get_section(&params.section_id),
    )
    .await?;
    api.delete_section(&section.id).await?;
    info!(section_id = %section.id, "Deleted section");
    Ok(success("deleted", "section", &section.name, &section.id))
}

pub async fn update_section_by_name(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateSectionByNameParams,
) -> ToolResult<String> {
    let update = rename(params.name)?;
    let section =
        resolve::section_by_name(api, &params.section_name, params.project_id.as_deref()).await?;
    let updated = api.update_section(&section.id, &update).await?;
    info!(section_id = %updated.id, "Updated section by name");
    format_entity(&updated, format)
}

pub async fn delete_section_by_name(
    api: &dyn TodoistApi,
    params: SectionNameParams,
) -> ToolResult<String> {
    let section =
        resolve::section_by_name(api, &params.section_name, params.project_id.as_deref()).await?;
    api.delete_section(&section.id).await?;
    info!(section_id = %section.id, "Deleted section by name");
    Ok(success("deleted", "section", &section.name, &section.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoist_client::testing::InMemoryTodoist;

    #[tokio::test]
    async fn test_get_sections_filtered_text() {
        let api = InMemoryTodoist::new();
        let project = api.seed_project("Home");
        let section = api.seed_section(&project.id, "Groceries");
        api.seed_section("other", "Chores");

        let out = get_sections(
            &api,
            OutputFormat::Text,
            GetSectionsParams {
                project_id: Some(project.id.clone()),
                page: Default::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            format!(
                "- Groceries (ID: {})\n  Project ID: {}\n  Order: 1",
                section.id, project.id
            )
        );
    }

    #[tokio::test]
    async fn test_rename_requires_name_before_any_call() {
        let api = InMemoryTodoist::new();
        let err = update_section(
            &api,
            OutputFormat::Json,
            UpdateSectionParams {
                section_id: "s1".into(),
                name: " ".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_section_by_name() {
        let api = InMemoryTodoist::new();
        let section = api.seed_section("p1", "Groceries");
        update_section_by_name(
            &api,
            OutputFormat::Json,
            UpdateSectionByNameParams {
                section_name: "grocer".into(),
                name: "Shopping".into(),
                project_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(api.sections()[0].name, "Shopping");
        assert_eq!(api.sections()[0].id, section.id);
    }

    #[tokio::test]
    async fn test_delete_section_by_name_not_found() {
        let api = InMemoryTodoist::new();
        api.seed_section("p1", "Groceries");
        let err = delete_section_by_name(
            &api,
            SectionNameParams {
                section_name: "Backlog".into(),
                project_id: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find a section matching \"Backlog\""
        );
        assert_eq!(api.sections().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_section_unverified() {
        let api = InMemoryTodoist::new();
        let err = delete_section(
            &api,
            SectionIdParams {
                section_id: "gone".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not verify section with ID: gone. Deletion aborted."
        );
    }
}
