//! Tool outcome taxonomy and the single error-to-text boundary.
//!
//! Tool functions return [`ToolResult<String>`]; the server passes every
//! result through [`render`], so a failure always reaches the host as a
//! normal single-line message.

use std::future::Future;

use thiserror::Error;
use todoist_client::{ClientError, ClientResult};
use tracing::{error, warn};

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Bad argument combination, detected before any remote call.
    #[error("Error: {0}")]
    Validation(String),

    /// A single argument value that cannot be interpreted.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Pre-mutation existence check failed.
    #[error("Could not verify {kind} with ID: {id}. {step} aborted.")]
    Unverified {
        kind: &'static str,
        id: String,
        step: &'static str,
    },

    /// Name-keyed lookup found no match.
    #[error("Could not find a {kind} matching \"{query}\"")]
    NotFound { kind: &'static str, query: String },

    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("command status {status}")]
    CommandRejected { status: String },

    #[error("failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_argument(
        field: &'static str,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidArgument {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, query: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            query: query.into(),
        }
    }

    /// Whether the message already stands on its own, without the
    /// `Error <action>:` prefix.
    fn is_self_describing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Unverified { .. } | Self::NotFound { .. }
        )
    }

    /// Caller-facing text for this error in the context of `action`
    /// (e.g. "updating task").
    pub fn message(&self, action: &str) -> String {
        if self.is_self_describing() {
            self.to_string()
        } else {
            format!("Error {action}: {self}")
        }
    }
}

/// Convert a tool result into the text returned to the host, logging
/// failures.
pub fn render(action: &str, result: ToolResult<String>) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            let message = err.message(action);
            if err.is_self_describing() {
                warn!(action, "{message}");
            } else {
                error!(action, error = %err, "Tool call failed");
            }
            message
        }
    }
}

/// Fetch the target of a mutation, turning any failure into
/// [`ToolError::Unverified`] so the mutation is never issued.
pub async fn verify<T, Fut>(
    kind: &'static str,
    id: &str,
    step: &'static str,
    fetch: Fut,
) -> ToolResult<T>
where
    Fut: Future<Output = ClientResult<T>>,
{
    fetch.await.map_err(|err| {
        warn!(
            kind,
            id,
            not_found = err.is_not_found(),
            error = %err,
            "Verification failed"
        );
        ToolError::Unverified {
            kind,
            id: id.to_string(),
            step,
        }
    })
}

/// Success line for mutations that do not return an entity.
pub fn success(verb: &str, kind: &str, label: &str, id: &str) -> String {
    format!("Successfully {verb} {kind}: {label} (ID: {id})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_has_no_action() {
        let err = ToolError::validation(
            "Exactly one of parent_id, section_id, or project_id must be specified",
        );
        assert_eq!(
            err.message("moving task"),
            "Error: Exactly one of parent_id, section_id, or project_id must be specified"
        );
    }

    #[test]
    fn test_remote_message_has_action_prefix() {
        let err = ToolError::from(ClientError::api_error(403, "Forbidden"));
        assert_eq!(
            err.message("deleting project"),
            "Error deleting project: API error: 403 - Forbidden"
        );
    }

    #[test]
    fn test_unverified_and_not_found_text() {
        let err = ToolError::Unverified {
            kind: "task",
            id: "t1".into(),
            step: "Task move",
        };
        assert_eq!(
            err.message("moving task"),
            "Could not verify task with ID: t1. Task move aborted."
        );
        let err = ToolError::not_found("task", "Buy milk");
        assert_eq!(
            err.message("deleting task"),
            "Could not find a task matching \"Buy milk\""
        );
    }

    #[test]
    fn test_invalid_argument_and_command_rejection() {
        let err = ToolError::invalid_argument(
            "due_date",
            "tomorrowish",
            "input contains invalid characters",
        );
        assert_eq!(
            err.message("creating task"),
            "Error creating task: invalid due_date 'tomorrowish': input contains invalid characters"
        );
        let err = ToolError::CommandRejected {
            status: "missing".into(),
        };
        assert_eq!(err.message("moving task"), "Error moving task: command status missing");
    }

    #[test]
    fn test_render_passes_success_through() {
        assert_eq!(render("getting task", Ok("done".into())), "done");
        assert_eq!(
            render("getting task", Err(ToolError::validation("bad"))),
            "Error: bad"
        );
    }

    #[tokio::test]
    async fn test_verify_maps_failure() {
        let result: ToolResult<()> = verify("section", "s1", "Deletion", async {
            Err(ClientError::api_error(404, "Section not found"))
        })
        .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Could not verify section with ID: s1. Deletion aborted."
        );
    }

    #[test]
    fn test_success_line() {
        assert_eq!(
            success("deleted", "task", "Buy milk", "t1"),
            "Successfully deleted task: Buy milk (ID: t1)"
        );
    }
}
