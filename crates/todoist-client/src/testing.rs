//! In-memory [`TodoistApi`] for tests.
//!
//! Entities live in insertion order, list calls paginate with an offset
//! cursor, and every facade call is recorded so tests can assert which
//! remote calls were (or were not) issued.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{Page, PageRequest, TodoistApi};
use crate::error::{ClientError, ClientResult};
use crate::models::{Comment, Deadline, Due, Project, Section, Task, TaskDuration};
use crate::params::{
    CommentOwner, CreateComment, CreateProject, CreateSection, CreateTask, DueSpec, TaskFilter,
    TaskQuery, UpdateComment, UpdateProject, UpdateSection, UpdateTask,
};
use crate::sync::{CommandArgs, SyncCommand, SyncResponse};

/// How the fake command endpoint acknowledges submitted commands.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    /// Apply the command and report `"ok"`.
    Ok,
    /// Report this status without applying the command.
    Status(Value),
    /// Leave the command out of `sync_status`.
    Omit,
}

#[derive(Debug, Default)]
struct Store {
    projects: Vec<Project>,
    sections: Vec<Section>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

#[derive(Debug)]
pub struct InMemoryTodoist {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    page_requests: Mutex<Vec<PageRequest>>,
    failing: Mutex<HashSet<String>>,
    command_reply: Mutex<CommandReply>,
    next_id: AtomicU64,
}

impl Default for InMemoryTodoist {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn not_found(kind: &str) -> ClientError {
    ClientError::api_error(404, format!("{kind} not found"))
}

fn paginate<T: Clone>(items: &[T], page: &PageRequest) -> ClientResult<Page<T>> {
    let offset = match &page.cursor {
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| ClientError::api_error(400, format!("invalid cursor '{cursor}'")))?,
        None => 0,
    };
    let limit = page.limit as usize;
    let end = (offset + limit).min(items.len());
    let results = items.get(offset..end).unwrap_or_default().to_vec();
    let next_cursor = (end < items.len()).then(|| end.to_string());
    Ok(Page::new(results, next_cursor))
}

fn apply_due(task: &mut Task, due: &DueSpec, lang: Option<&String>) {
    let (string, date, datetime) = match due {
        DueSpec::Natural(s) => (s.clone(), None, None),
        DueSpec::Date(d) => (d.to_string(), Some(d.to_string()), None),
        DueSpec::DateTime(dt) => (
            DueSpec::datetime_text(dt),
            Some(dt.date_naive().to_string()),
            Some(DueSpec::datetime_text(dt)),
        ),
    };
    task.due = Some(Due {
        string,
        date,
        datetime,
        is_recurring: false,
        timezone: None,
        lang: lang.cloned(),
    });
}

impl InMemoryTodoist {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            calls: Mutex::new(Vec::new()),
            page_requests: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            command_reply: Mutex::new(CommandReply::Ok),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, call: impl Into<String>) -> ClientResult<()> {
        let call = call.into();
        let op = call.split(':').next().unwrap_or_default().to_string();
        lock(&self.calls).push(call);
        if lock(&self.failing).contains(&op) {
            return Err(ClientError::api_error(500, format!("{op} failed")));
        }
        Ok(())
    }

    fn record_page(&self, call: &str, page: &PageRequest) -> ClientResult<()> {
        lock(&self.page_requests).push(page.clone());
        self.record(call)
    }

    // ── Seeding ──

    pub fn seed_project(&self, name: &str) -> Project {
        let project = Project {
            id: self.next_id("p"),
            name: name.to_string(),
            color: None,
            parent_id: None,
            is_favorite: false,
            is_shared: false,
            view_style: Some("list".into()),
            extra: Default::default(),
        };
        lock(&self.store).projects.push(project.clone());
        project
    }

    pub fn seed_section(&self, project_id: &str, name: &str) -> Section {
        let mut store = lock(&self.store);
        let order = store
            .sections
            .iter()
            .filter(|s| s.project_id == project_id)
            .count() as i64
            + 1;
        let section = Section {
            id: self.next_id("s"),
            project_id: project_id.to_string(),
            name: name.to_string(),
            order: Some(order),
            extra: Default::default(),
        };
        store.sections.push(section.clone());
        section
    }

    pub fn seed_task(&self, content: &str) -> Task {
        self.seed_task_in(content, None, None)
    }

    pub fn seed_task_in(
        &self,
        content: &str,
        project_id: Option<&str>,
        section_id: Option<&str>,
    ) -> Task {
        let task = Task {
            id: self.next_id("t"),
            content: content.to_string(),
            description: String::new(),
            project_id: project_id.map(String::from),
            section_id: section_id.map(String::from),
            parent_id: None,
            labels: Vec::new(),
            priority: 1,
            due: None,
            deadline: None,
            duration: None,
            assignee_id: None,
            is_completed: false,
            extra: Default::default(),
        };
        lock(&self.store).tasks.push(task.clone());
        task
    }

    /// Seed `count` tasks named `"<prefix> <n>"`.
    pub fn seed_tasks(&self, prefix: &str, count: usize) -> Vec<Task> {
        (1..=count)
            .map(|n| self.seed_task(&format!("{prefix} {n}")))
            .collect()
    }

    pub fn seed_comment(&self, owner: &CommentOwner, content: &str) -> Comment {
        let (task_id, project_id) = match owner {
            CommentOwner::Task(id) => (Some(id.clone()), None),
            CommentOwner::Project(id) => (None, Some(id.clone())),
        };
        let comment = Comment {
            id: self.next_id("c"),
            content: content.to_string(),
            task_id,
            project_id,
            posted_at: Some("2024-03-15T10:00:00.000000Z".into()),
            extra: Default::default(),
        };
        lock(&self.store).comments.push(comment.clone());
        comment
    }

    // ── Behaviour controls ──

    /// Make every subsequent call to `operation` (a trait method name)
    /// fail with a 500.
    pub fn fail_operation(&self, operation: &str) {
        lock(&self.failing).insert(operation.to_string());
    }

    pub fn set_command_reply(&self, reply: CommandReply) {
        *lock(&self.command_reply) = reply;
    }

    // ── Inspection ──

    /// Every facade call so far, as `"<method>"` or `"<method>:<id>"`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        lock(&self.page_requests).clone()
    }

    pub fn task(&self, task_id: &str) -> Option<Task> {
        lock(&self.store)
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.store).tasks.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        lock(&self.store).projects.clone()
    }

    pub fn sections(&self) -> Vec<Section> {
        lock(&self.store).sections.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        lock(&self.store).comments.clone()
    }
}

#[async_trait]
impl TodoistApi for InMemoryTodoist {
    async fn list_projects(&self, page: PageRequest) -> ClientResult<Page<Project>> {
        self.record_page("list_projects", &page)?;
        paginate(&lock(&self.store).projects, &page)
    }

    async fn get_project(&self, project_id: &str) -> ClientResult<Project> {
        self.record(format!("get_project:{project_id}"))?;
        lock(&self.store)
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(|| not_found("Project"))
    }

    async fn add_project(&self, args: &CreateProject) -> ClientResult<Project> {
        self.record("add_project")?;
        let project = Project {
            id: self.next_id("p"),
            name: args.name.clone(),
            color: args.color.clone(),
            parent_id: args.parent_id.clone(),
            is_favorite: args.is_favorite.unwrap_or(false),
            is_shared: false,
            view_style: Some(args.view_style.map_or("list", |v| v.as_str()).to_string()),
            extra: Default::default(),
        };
        lock(&self.store).projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: &str,
        args: &UpdateProject,
    ) -> ClientResult<Project> {
        self.record(format!("update_project:{project_id}"))?;
        let mut store = lock(&self.store);
        let project = store
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| not_found("Project"))?;
        if let Some(name) = &args.name {
            project.name = name.clone();
        }
        if let Some(color) = &args.color {
            project.color = Some(color.clone());
        }
        if let Some(favorite) = args.is_favorite {
            project.is_favorite = favorite;
        }
        if let Some(style) = args.view_style {
            project.view_style = Some(style.as_str().to_string());
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: &str) -> ClientResult<()> {
        self.record(format!("delete_project:{project_id}"))?;
        let mut store = lock(&self.store);
        let before = store.projects.len();
        store.projects.retain(|p| p.id != project_id);
        if store.projects.len() == before {
            return Err(not_found("Project"));
        }
        Ok(())
    }

    async fn list_sections(
        &self,
        project_id: Option<&str>,
        page: PageRequest,
    ) -> ClientResult<Page<Section>> {
        self.record_page("list_sections", &page)?;
        let sections: Vec<Section> = lock(&self.store)
            .sections
            .iter()
            .filter(|s| project_id.is_none_or(|id| s.project_id == id))
            .cloned()
            .collect();
        paginate(&sections, &page)
    }

    async fn get_section(&self, section_id: &str) -> ClientResult<Section> {
        self.record(format!("get_section:{section_id}"))?;
        lock(&self.store)
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
            .ok_or_else(|| not_found("Section"))
    }

    async fn add_section(&self, args: &CreateSection) -> ClientResult<Section> {
        self.record("add_section")?;
        let section = Section {
            id: self.next_id("s"),
            project_id: args.project_id.clone(),
            name: args.name.clone(),
            order: args.order,
            extra: Default::default(),
        };
        lock(&self.store).sections.push(section.clone());
        Ok(section)
    }

    async fn update_section(
        &self,
        section_id: &str,
        args: &UpdateSection,
    ) -> ClientResult<Section> {
        self.record(format!("update_section:{section_id}"))?;
        let mut store = lock(&self.store);
        let section = store
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| not_found("Section"))?;
        section.name = args.name.clone();
        Ok(section.clone())
    }

    async fn delete_section(&self, section_id: &str) -> ClientResult<()> {
        self.record(format!("delete_section:{section_id}"))?;
        let mut store = lock(&self.store);
        let before = store.sections.len();
        store.sections.retain(|s| s.id != section_id);
        if store.sections.len() == before {
            return Err(not_found("Section"));
        }
        Ok(())
    }

    async fn list_tasks(&self, query: &TaskQuery, page: PageRequest) -> ClientResult<Page<Task>> {
        self.record_page("list_tasks", &page)?;
        let tasks: Vec<Task> = lock(&self.store)
            .tasks
            .iter()
            .filter(|t| !t.is_completed)
            .filter(|t| {
                query
                    .project_id
                    .as_ref()
                    .is_none_or(|id| t.project_id.as_ref() == Some(id))
            })
            .filter(|t| {
                query
                    .section_id
                    .as_ref()
                    .is_none_or(|id| t.section_id.as_ref() == Some(id))
            })
            .filter(|t| {
                query
                    .parent_id
                    .as_ref()
                    .is_none_or(|id| t.parent_id.as_ref() == Some(id))
            })
            .filter(|t| query.label.as_ref().is_none_or(|l| t.labels.contains(l)))
            .filter(|t| query.ids.is_empty() || query.ids.contains(&t.id))
            .cloned()
            .collect();
        paginate(&tasks, &page)
    }

    /// Matches open tasks whose content contains the filter text
    /// (case-insensitive); `"all"` matches every open task.
    async fn filter_tasks(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> ClientResult<Page<Task>> {
        self.record_page("filter_tasks", &page)?;
        let needle = filter.query.to_lowercase();
        let tasks: Vec<Task> = lock(&self.store)
            .tasks
            .iter()
            .filter(|t| !t.is_completed)
            .filter(|t| needle == "all" || t.content.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        paginate(&tasks, &page)
    }

    async fn get_task(&self, task_id: &str) -> ClientResult<Task> {
        self.record(format!("get_task:{task_id}"))?;
        self.task(task_id).ok_or_else(|| not_found("Task"))
    }

    async fn add_task(&self, args: &CreateTask) -> ClientResult<Task> {
        self.record("add_task")?;
        let mut task = Task {
            id: self.next_id("t"),
            content: args.content.clone(),
            description: args.description.clone().unwrap_or_default(),
            project_id: args.project_id.clone(),
            section_id: args.section_id.clone(),
            parent_id: args.parent_id.clone(),
            labels: args.labels.clone().unwrap_or_default(),
            priority: args.priority.unwrap_or(1),
            due: None,
            deadline: args.deadline_date.map(|date| Deadline {
                date: date.to_string(),
                lang: args.deadline_lang.clone(),
            }),
            duration: args.duration.map(|d| TaskDuration {
                amount: d.amount,
                unit: d.unit.as_str().to_string(),
            }),
            assignee_id: args.assignee_id.clone(),
            is_completed: false,
            extra: Default::default(),
        };
        if let Some(due) = &args.due {
            apply_due(&mut task, due, args.due_lang.as_ref());
        }
        lock(&self.store).tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_id: &str, args: &UpdateTask) -> ClientResult<Task> {
        self.record(format!("update_task:{task_id}"))?;
        let mut store = lock(&self.store);
        let task = store
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task"))?;
        if let Some(content) = &args.content {
            task.content = content.clone();
        }
        if let Some(description) = &args.description {
            task.description = description.clone();
        }
        if let Some(labels) = &args.labels {
            task.labels = labels.clone();
        }
        if let Some(priority) = args.priority {
            task.priority = priority;
        }
        if let Some(due) = &args.due {
            apply_due(task, due, args.due_lang.as_ref());
        }
        if let Some(assignee) = &args.assignee_id {
            task.assignee_id = assignee.clone();
        }
        if let Some(duration) = args.duration {
            task.duration = Some(TaskDuration {
                amount: duration.amount,
                unit: duration.unit.as_str().to_string(),
            });
        }
        if let Some(date) = args.deadline_date {
            task.deadline = Some(Deadline {
                date: date.to_string(),
                lang: args.deadline_lang.clone(),
            });
        }
        Ok(task.clone())
    }

    async fn close_task(&self, task_id: &str) -> ClientResult<()> {
        self.record(format!("close_task:{task_id}"))?;
        let mut store = lock(&self.store);
        let task = store
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task"))?;
        task.is_completed = true;
        Ok(())
    }

    async fn reopen_task(&self, task_id: &str) -> ClientResult<()> {
        self.record(format!("reopen_task:{task_id}"))?;
        let mut store = lock(&self.store);
        let task = store
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task"))?;
        task.is_completed = false;
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> ClientResult<()> {
        self.record(format!("delete_task:{task_id}"))?;
        let mut store = lock(&self.store);
        let before = store.tasks.len();
        store.tasks.retain(|t| t.id != task_id);
        if store.tasks.len() == before {
            return Err(not_found("Task"));
        }
        Ok(())
    }

    async fn list_comments(
        &self,
        owner: &CommentOwner,
        page: PageRequest,
    ) -> ClientResult<Page<Comment>> {
        self.record_page("list_comments", &page)?;
        let comments: Vec<Comment> = lock(&self.store)
            .comments
            .iter()
            .filter(|c| match owner {
                CommentOwner::Task(id) => c.task_id.as_ref() == Some(id),
                CommentOwner::Project(id) => c.project_id.as_ref() == Some(id),
            })
            .cloned()
            .collect();
        paginate(&comments, &page)
    }

    async fn get_comment(&self, comment_id: &str) -> ClientResult<Comment> {
        self.record(format!("get_comment:{comment_id}"))?;
        lock(&self.store)
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned()
            .ok_or_else(|| not_found("Comment"))
    }

    async fn add_comment(&self, args: &CreateComment) -> ClientResult<Comment> {
        self.record("add_comment")?;
        let (task_id, project_id) = match &args.owner {
            CommentOwner::Task(id) => (Some(id.clone()), None),
            CommentOwner::Project(id) => (None, Some(id.clone())),
        };
        let comment = Comment {
            id: self.next_id("c"),
            content: args.content.clone(),
            task_id,
            project_id,
            posted_at: Some("2024-03-15T10:00:00.000000Z".into()),
            extra: Default::default(),
        };
        lock(&self.store).comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        comment_id: &str,
        args: &UpdateComment,
    ) -> ClientResult<Comment> {
        self.record(format!("update_comment:{comment_id}"))?;
        let mut store = lock(&self.store);
        let comment = store
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| not_found("Comment"))?;
        comment.content = args.content.clone();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, comment_id: &str) -> ClientResult<()> {
        self.record(format!("delete_comment:{comment_id}"))?;
        let mut store = lock(&self.store);
        let before = store.comments.len();
        store.comments.retain(|c| c.id != comment_id);
        if store.comments.len() == before {
            return Err(not_found("Comment"));
        }
        Ok(())
    }

    async fn submit_commands(&self, commands: &[SyncCommand]) -> ClientResult<SyncResponse> {
        self.record("submit_commands")?;
        let reply = lock(&self.command_reply).clone();
        let mut response = SyncResponse::default();
        for command in commands {
            let status = match &reply {
                CommandReply::Omit => continue,
                CommandReply::Status(value) => value.clone(),
                CommandReply::Ok => {
                    let CommandArgs::ItemMove(args) = &command.args;
                    let mut store = lock(&self.store);
                    match store.tasks.iter_mut().find(|t| t.id == args.id) {
                        Some(task) => {
                            if let Some(parent) = &args.parent_id {
                                task.parent_id = Some(parent.clone());
                            }
                            if let Some(section) = &args.section_id {
                                task.section_id = Some(section.clone());
                                task.parent_id = None;
                            }
                            if let Some(project) = &args.project_id {
                                task.project_id = Some(project.clone());
                                task.section_id = None;
                                task.parent_id = None;
                            }
                            Value::String("ok".into())
                        }
                        None => serde_json::json!({"error_code": 22, "error": "Item not found"}),
                    }
                }
            };
            response
                .sync_status
                .insert(command.uuid.to_string(), status);
        }
        Ok(response)
    }
}
