//! The remote task-management facade.
//!
//! [`TodoistApi`] is the one capability the rest of the workspace depends
//! on. [`RestClient`](crate::RestClient) implements it over HTTPS; the
//! `testing` module provides an in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::models::{Comment, Project, Section, Task};
use crate::params::{
    CommentOwner, CreateComment, CreateProject, CreateSection, CreateTask, TaskFilter, TaskQuery,
    UpdateComment, UpdateProject, UpdateSection, UpdateTask,
};
use crate::sync::{SyncCommand, SyncResponse};

/// Position and size of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            cursor: None,
            limit,
        }
    }
}

/// One batch of entities plus the continuation cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            results,
            next_cursor,
        }
    }
}

/// Capability-typed handle to the remote service.
///
/// Implementations hold no mutable shared state and are shared across
/// concurrent tool calls behind an `Arc`.
#[async_trait]
pub trait TodoistApi: Send + Sync + std::fmt::Debug {
    // ── Projects ──
    async fn list_projects(&self, page: PageRequest) -> ClientResult<Page<Project>>;
    async fn get_project(&self, project_id: &str) -> ClientResult<Project>;
    async fn add_project(&self, args: &CreateProject) -> ClientResult<Project>;
    async fn update_project(&self, project_id: &str, args: &UpdateProject)
        -> ClientResult<Project>;
    async fn delete_project(&self, project_id: &str) -> ClientResult<()>;

    // ── Sections ──
    async fn list_sections(
        &self,
        project_id: Option<&str>,
        page: PageRequest,
    ) -> ClientResult<Page<Section>>;
    async fn get_section(&self, section_id: &str) -> ClientResult<Section>;
    async fn add_section(&self, args: &CreateSection) -> ClientResult<Section>;
    async fn update_section(&self, section_id: &str, args: &UpdateSection)
        -> ClientResult<Section>;
    async fn delete_section(&self, section_id: &str) -> ClientResult<()>;

    // ── Tasks ──
    async fn list_tasks(&self, query: &TaskQuery, page: PageRequest) -> ClientResult<Page<Task>>;
    async fn filter_tasks(&self, filter: &TaskFilter, page: PageRequest)
        -> ClientResult<Page<Task>>;
    async fn get_task(&self, task_id: &str) -> ClientResult<Task>;
    async fn add_task(&self, args: &CreateTask) -> ClientResult<Task>;
    async fn update_task(&self, task_id: &str, args: &UpdateTask) -> ClientResult<Task>;
    async fn close_task(&self, task_id: &str) -> ClientResult<()>;
    async fn reopen_task(&self, task_id: &str) -> ClientResult<()>;
    async fn delete_task(&self, task_id: &str) -> ClientResult<()>;

    // ── Comments ──
    async fn list_comments(
        &self,
        owner: &CommentOwner,
        page: PageRequest,
    ) -> ClientResult<Page<Comment>>;
    async fn get_comment(&self, comment_id: &str) -> ClientResult<Comment>;
    async fn add_comment(&self, args: &CreateComment) -> ClientResult<Comment>;
    async fn update_comment(&self, comment_id: &str, args: &UpdateComment)
        -> ClientResult<Comment>;
    async fn delete_comment(&self, comment_id: &str) -> ClientResult<()>;

    // ── Command endpoint ──
    /// Submit a synchronous batch of structural commands.
    async fn submit_commands(&self, commands: &[SyncCommand]) -> ClientResult<SyncResponse>;
}
