//! HTTPS implementation of [`TodoistApi`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::{Page, PageRequest, TodoistApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{Comment, Project, Section, Task};
use crate::params::{
    CommentOwner, CreateComment, CreateProject, CreateSection, CreateTask, TaskFilter, TaskQuery,
    UpdateComment, UpdateProject, UpdateSection, UpdateTask,
};
use crate::sync::{SyncCommand, SyncResponse};

/// Longest error body kept in an [`ClientError::ApiError`] message.
const MAX_ERROR_BODY: usize = 500;

/// Todoist client over the unified REST API and the sync command endpoint.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("todoist-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(self.config.api_token.expose_secret())
    }

    async fn send_json<T: DeserializeOwned>(&self, rb: RequestBuilder) -> ClientResult<T> {
        let (path, body) = Self::send(rb).await?;
        decode(&path, &body)
    }

    async fn send_empty(&self, rb: RequestBuilder) -> ClientResult<()> {
        Self::send(rb).await.map(|_| ())
    }

    /// Returns the request path with the body of a successful response.
    async fn send(rb: RequestBuilder) -> ClientResult<(String, String)> {
        let resp = rb.send().await?;
        let status = resp.status();
        let path = resp.url().path().to_string();
        let body = resp.text().await?;
        debug!(status = status.as_u16(), path = %path, bytes = body.len(), "Todoist response");

        if !status.is_success() {
            return Err(ClientError::api_error(
                status.as_u16(),
                truncate_body(&body, status.canonical_reason()),
            ));
        }
        Ok((path, body))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, String)],
        page: &PageRequest,
    ) -> ClientResult<Page<T>> {
        let mut query: Vec<(&str, String)> = filters.to_vec();
        query.push(("limit", page.limit.to_string()));
        if let Some(cursor) = &page.cursor {
            query.push(("cursor", cursor.clone()));
        }
        self.send_json(self.request(Method::GET, path).query(&query))
            .await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }
}

/// Parse a success body; a body that does not match the expected shape is
/// reported against the request path.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::invalid_response(path, e.to_string()))
}

fn truncate_body(body: &str, fallback: Option<&str>) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.unwrap_or("empty response").to_string();
    }
    if trimmed.chars().count() <= MAX_ERROR_BODY {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
    out.push_str("...");
    out
}

fn task_query_pairs(query: &TaskQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(v) = &query.project_id {
        pairs.push(("project_id", v.clone()));
    }
    if let Some(v) = &query.section_id {
        pairs.push(("section_id", v.clone()));
    }
    if let Some(v) = &query.parent_id {
        pairs.push(("parent_id", v.clone()));
    }
    if let Some(v) = &query.label {
        pairs.push(("label", v.clone()));
    }
    if !query.ids.is_empty() {
        pairs.push(("ids", query.ids.join(",")));
    }
    pairs
}

#[async_trait]
impl TodoistApi for RestClient {
    async fn list_projects(&self, page: PageRequest) -> ClientResult<Page<Project>> {
        self.get_page("projects", &[], &page).await
    }

    async fn get_project(&self, project_id: &str) -> ClientResult<Project> {
        self.send_json(self.request(Method::GET, &format!("projects/{project_id}")))
            .await
    }

    async fn add_project(&self, args: &CreateProject) -> ClientResult<Project> {
        self.post_json("projects", args).await
    }

    async fn update_project(
        &self,
        project_id: &str,
        args: &UpdateProject,
    ) -> ClientResult<Project> {
        self.post_json(&format!("projects/{project_id}"), args)
            .await
    }

    async fn delete_project(&self, project_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("projects/{project_id}")))
            .await
    }

    async fn list_sections(
        &self,
        project_id: Option<&str>,
        page: PageRequest,
    ) -> ClientResult<Page<Section>> {
        let filters: Vec<(&str, String)> = project_id
            .map(|id| vec![("project_id", id.to_string())])
            .unwrap_or_default();
        self.get_page("sections", &filters, &page).await
    }

    async fn get_section(&self, section_id: &str) -> ClientResult<Section> {
        self.send_json(self.request(Method::GET, &format!("sections/{section_id}")))
            .await
    }

    async fn add_section(&self, args: &CreateSection) -> ClientResult<Section> {
        self.post_json("sections", args).await
    }

    async fn update_section(
        &self,
        section_id: &str,
        args: &UpdateSection,
    ) -> ClientResult<Section> {
        self.post_json(&format!("sections/{section_id}"), args)
            .await
    }

    async fn delete_section(&self, section_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("sections/{section_id}")))
            .await
    }

    async fn list_tasks(&self, query: &TaskQuery, page: PageRequest) -> ClientResult<Page<Task>> {
        self.get_page("tasks", &task_query_pairs(query), &page)
            .await
    }

    async fn filter_tasks(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> ClientResult<Page<Task>> {
        let mut filters = vec![("query", filter.query.clone())];
        if let Some(lang) = &filter.lang {
            filters.push(("lang", lang.clone()));
        }
        self.get_page("tasks/filter", &filters, &page).await
    }

    async fn get_task(&self, task_id: &str) -> ClientResult<Task> {
        self.send_json(self.request(Method::GET, &format!("tasks/{task_id}")))
            .await
    }

    async fn add_task(&self, args: &CreateTask) -> ClientResult<Task> {
        self.post_json("tasks", args).await
    }

    async fn update_task(&self, task_id: &str, args: &UpdateTask) -> ClientResult<Task> {
        self.post_json(&format!("tasks/{task_id}"), args).await
    }

    async fn close_task(&self, task_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::POST, &format!("tasks/{task_id}/close")))
            .await
    }

    async fn reopen_task(&self, task_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::POST, &format!("tasks/{task_id}/reopen")))
            .await
    }

    async fn delete_task(&self, task_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("tasks/{task_id}")))
            .await
    }

    async fn list_comments(
        &self,
        owner: &CommentOwner,
        page: PageRequest,
    ) -> ClientResult<Page<Comment>> {
        let (key, id) = owner.as_pair();
        self.get_page("comments", &[(key, id.to_string())], &page)
            .await
    }

    async fn get_comment(&self, comment_id: &str) -> ClientResult<Comment> {
        self.send_json(self.request(Method::GET, &format!("comments/{comment_id}")))
            .await
    }

    async fn add_comment(&self, args: &CreateComment) -> ClientResult<Comment> {
        self.post_json("comments", &args.to_body()).await
    }

    async fn update_comment(
        &self,
        comment_id: &str,
        args: &UpdateComment,
    ) -> ClientResult<Comment> {
        self.post_json(&format!("comments/{comment_id}"), args)
            .await
    }

    async fn delete_comment(&self, comment_id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("comments/{comment_id}")))
            .await
    }

    async fn submit_commands(&self, commands: &[SyncCommand]) -> ClientResult<SyncResponse> {
        let encoded = serde_json::to_string(commands)?;
        let rb = self
            .http
            .post(&self.config.sync_url)
            .bearer_auth(self.config.api_token.expose_secret())
            .form(&[("commands", encoded)]);
        self.send_json(rb).await
    }
}
