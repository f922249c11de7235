//! # Todoist Client Library
//!
//! Typed access to the Todoist unified API: REST CRUD endpoints for
//! projects, sections, tasks and comments, the natural-language task
//! filter, and the synchronous command endpoint used for task moves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoist_client::{ClientConfig, PageRequest, RestClient, TodoistApi};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new(ClientConfig::from_env()?)?;
//! let page = client.list_projects(PageRequest::first(50)).await?;
//! println!("{} projects", page.results.len());
//! # Ok(())
//! # }
//! ```
//!
//! Consumers depend on the [`TodoistApi`] trait rather than the concrete
//! client; enable the `test-utils` feature for an in-memory implementation.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod rest;
pub mod sync;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::{Page, PageRequest, TodoistApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use models::{Comment, Deadline, Due, Project, Section, Task, TaskDuration};
pub use params::{
    CommentOwner, CreateComment, CreateProject, CreateSection, CreateTask, DueSpec, DurationSpec,
    DurationUnit, TaskFilter, TaskQuery, UpdateComment, UpdateProject, UpdateSection, UpdateTask,
    ViewStyle,
};
pub use rest::RestClient;
pub use sync::{CommandArgs, CommandStatus, CommandType, ItemMoveArgs, SyncCommand, SyncResponse};
