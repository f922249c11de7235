//! Comment tools.

use todoist_client::{Comment, TodoistApi, UpdateComment};
use todoist_sdk::operational::normalize;
use todoist_sdk::operational::outcome::{success, verify, ToolError, ToolResult};
use todoist_sdk::operational::pagination::{collect_pages, requested_nmax, PageLimits};
use todoist_sdk::operational::responses::{format_collection, format_entity, Summarize};
use todoist_sdk::OutputFormat;
use tracing::info;

use super::params::{AddCommentParams, CommentIdParams, GetCommentsParams, UpdateCommentParams};

pub async fn get_comment(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: CommentIdParams,
) -> ToolResult<String> {
    let comment = api.get_comment(&params.comment_id).await?;
    format_entity(&comment, format)
}

pub async fn get_comments(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: GetCommentsParams,
) -> ToolResult<String> {
    let owner = normalize::comment_owner(params.project_id, params.task_id)?;
    let limits = PageLimits::new(params.page.limit, requested_nmax(params.page.nmax));
    let owner = &owner;
    let comments: Vec<Comment> =
        collect_pages(limits, move |page| api.list_comments(owner, page)).await?;
    info!(count = comments.len(), ?owner, "Retrieved comments");
    format_collection(&comments, format)
}

pub async fn add_comment(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: AddCommentParams,
) -> ToolResult<String> {
    let args = normalize::create_comment(
        params.content,
        params.project_id,
        params.task_id,
        params.uids_to_notify,
    )?;
    let comment = api.add_comment(&args).await?;
    info!(comment_id = %comment.id, "Created comment");
    format_entity(&comment, format)
}

pub async fn update_comment(
    api: &dyn TodoistApi,
    format: OutputFormat,
    params: UpdateCommentParams,
) -> ToolResult<String> {
    if params.content.trim().is_empty() {
        return Err(ToolError::validation("Comment content must not be empty"));
    }
    verify(
        "comment",
        &params.comment_id,
        "Update",
        api.get_comment(&params.comment_id),
    )
    .await?;
    let update = UpdateComment {
        content: params.content,
    };
    let comment = api.update_comment(&params.comment_id, &update).await?;
    info!(comment_id = %comment.id, "Updated comment");
    format_entity(&comment, format)
}

pub async fn delete_comment(api: &dyn TodoistApi, params: CommentIdParams) -> ToolResult<String> {
    let comment = verify(
        "comment",
        &params.comment_id,
        "Deletion",
        api.get_comment(&params.comment_id),
    )
    .await?;
    api.delete_comment(&comment.id).await?;
    info!(comment_id = %comment.id, "Deleted comment");
    Ok(success("deleted", "comment", &comment.label(), &comment.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoist_client::testing::InMemoryTodoist;
    use todoist_client::CommentOwner;

    #[tokio::test]
    async fn test_get_comments_requires_one_owner() {
        let api = InMemoryTodoist::new();
        let err = get_comments(
            &api,
            OutputFormat::Json,
            GetCommentsParams {
                project_id: Some("p1".into()),
                task_id: Some("t1".into()),
                page: Default::default(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Exactly one of project_id or task_id must be specified"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_comments_for_task() {
        let api = InMemoryTodoist::new();
        let owner = CommentOwner::Task("t9".into());
        api.seed_comment(&owner, "First");
        api.seed_comment(&owner, "Second");
        api.seed_comment(&CommentOwner::Project("p1".into()), "Elsewhere");

        let out = get_comments(
            &api,
            OutputFormat::Json,
            GetCommentsParams {
                project_id: None,
                task_id: Some("t9".into()),
                page: Default::default(),
            },
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["content"], "First");
    }

    #[tokio::test]
    async fn test_add_comment_checks_owner_before_content() {
        let api = InMemoryTodoist::new();
        let err = add_comment(
            &api,
            OutputFormat::Json,
            AddCommentParams {
                content: String::new(),
                project_id: None,
                task_id: None,
                uids_to_notify: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("project_id or task_id"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_text() {
        let api = InMemoryTodoist::new();
        let out = add_comment(
            &api,
            OutputFormat::Text,
            AddCommentParams {
                content: "Looks good".into(),
                project_id: None,
                task_id: Some("t3".into()),
                uids_to_notify: Some(vec![]),
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("- Looks good (ID: "));
        assert!(out.contains("Task ID: t3"));
    }

    #[tokio::test]
    async fn test_update_unknown_comment_aborts() {
        let api = InMemoryTodoist::new();
        let err = update_comment(
            &api,
            OutputFormat::Json,
            UpdateCommentParams {
                comment_id: "c404".into(),
                content: "Edited".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not verify comment with ID: c404. Update aborted."
        );
        assert_eq!(api.calls(), vec!["get_comment:c404".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_comment_uses_excerpt() {
        let api = InMemoryTodoist::new();
        let long = "x".repeat(60);
        let comment = api.seed_comment(&CommentOwner::Task("t1".into()), &long);
        let out = delete_comment(
            &api,
            CommentIdParams {
                comment_id: comment.id.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            format!(
                "Successfully deleted comment: {}... (ID: {})",
                "x".repeat(50),
                comment.id
            )
        );
        assert!(api.comments().is_empty());
    }
}
