//! Result formatting for entities and collections.
//!
//! [`OutputFormat::Json`] serializes every entity field (including ones
//! the adapter does not model); [`OutputFormat::Text`] renders the summary
//! lines below, one block per entity separated by a blank line.

use serde::Serialize;
use todoist_client::{Comment, Project, Section, Task};

use super::enums::OutputFormat;
use super::outcome::ToolResult;

/// Longest comment excerpt used as a success-message label.
pub const COMMENT_LABEL_CHARS: usize = 50;

pub trait Summarize: Serialize {
    const KIND: &'static str;

    /// Short human-readable name used in success messages.
    fn label(&self) -> String;

    /// Multi-line text summary.
    fn summary(&self) -> String;

    fn empty_message() -> String {
        format!("No {}s found matching the criteria", Self::KIND)
    }
}

impl Summarize for Project {
    const KIND: &'static str = "project";

    fn label(&self) -> String {
        self.name.clone()
    }

    fn summary(&self) -> String {
        let mut text = format!("- {} (ID: {})", self.name, self.id);
        if self.is_favorite {
            text.push_str("\n  Favorite: Yes");
        }
        if self.is_shared {
            text.push_str("\n  Shared: Yes");
        }
        if let Some(parent) = &self.parent_id {
            text.push_str(&format!("\n  Parent ID: {parent}"));
        }
        text
    }

    fn empty_message() -> String {
        "No projects found in your Todoist account".to_string()
    }
}

impl Summarize for Section {
    const KIND: &'static str = "section";

    fn label(&self) -> String {
        self.name.clone()
    }

    fn summary(&self) -> String {
        let mut text = format!(
            "- {} (ID: {})\n  Project ID: {}",
            self.name, self.id, self.project_id
        );
        if let Some(order) = self.order {
            text.push_str(&format!("\n  Order: {order}"));
        }
        text
    }
}

impl Summarize for Task {
    const KIND: &'static str = "task";

    fn label(&self) -> String {
        self.content.clone()
    }

    fn summary(&self) -> String {
        let mut text = format!("- {} (ID: {})", self.content, self.id);
        if !self.description.is_empty() {
            text.push_str(&format!("\n  Description: {}", self.description));
        }
        if let Some(due) = &self.due {
            text.push_str(&format!("\n  Due: {}", due.string));
        }
        text.push_str(&format!("\n  Priority: {}", self.priority));
        if let Some(parent) = &self.parent_id {
            text.push_str(&format!("\n  Parent ID: {parent}"));
        }
        text
    }
}

impl Summarize for Comment {
    const KIND: &'static str = "comment";

    fn label(&self) -> String {
        truncate(&self.content, COMMENT_LABEL_CHARS)
    }

    fn summary(&self) -> String {
        let mut text = format!("- {} (ID: {})", self.content, self.id);
        if let Some(task) = &self.task_id {
            text.push_str(&format!("\n  Task ID: {task}"));
        }
        if let Some(project) = &self.project_id {
            text.push_str(&format!("\n  Project ID: {project}"));
        }
        if let Some(posted) = &self.posted_at {
            text.push_str(&format!("\n  Posted: {posted}"));
        }
        text
    }
}

/// Cut `text` to `max` characters, appending `...` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

pub fn format_entity<T: Summarize>(entity: &T, format: OutputFormat) -> ToolResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entity)?),
        OutputFormat::Text => Ok(entity.summary()),
    }
}

pub fn format_collection<T: Summarize>(items: &[T], format: OutputFormat) -> ToolResult<String> {
    if items.is_empty() {
        return Ok(T::empty_message());
    }
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Text => Ok(items
            .iter()
            .map(T::summary)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoist_client::testing::InMemoryTodoist;
    use todoist_client::CommentOwner;

    #[test]
    fn test_project_summary_flags() {
        let api = InMemoryTodoist::new();
        let mut project = api.seed_project("Work");
        project.is_favorite = true;
        project.parent_id = Some("p0".into());
        assert_eq!(
            project.summary(),
            format!("- Work (ID: {})\n  Favorite: Yes\n  Parent ID: p0", project.id)
        );
    }

    #[test]
    fn test_task_summary() {
        let api = InMemoryTodoist::new();
        let mut task = api.seed_task("Buy milk");
        task.description = "2 litres".into();
        task.priority = 4;
        assert_eq!(
            task.summary(),
            format!(
                "- Buy milk (ID: {})\n  Description: 2 litres\n  Priority: 4",
                task.id
            )
        );
    }

    #[test]
    fn test_json_is_lossless() {
        let api = InMemoryTodoist::new();
        let mut task = api.seed_task("Buy milk");
        task.extra
            .insert("child_order".into(), serde_json::json!(7));
        let out = format_entity(&task, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["child_order"], 7);
        assert_eq!(value["content"], "Buy milk");
    }

    #[test]
    fn test_format_is_deterministic() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        assert_eq!(
            format_entity(&task, OutputFormat::Json).unwrap(),
            format_entity(&task, OutputFormat::Json).unwrap()
        );
    }

    #[test]
    fn test_collection_text_and_empty() {
        let api = InMemoryTodoist::new();
        let sections = vec![
            api.seed_section("p1", "Backlog"),
            api.seed_section("p1", "Doing"),
        ];
        let text = format_collection(&sections, OutputFormat::Text).unwrap();
        assert_eq!(text.split("\n\n").count(), 2);
        assert!(text.starts_with("- Backlog"));

        assert_eq!(
            format_collection::<Section>(&[], OutputFormat::Json).unwrap(),
            "No sections found matching the criteria"
        );
        assert_eq!(
            format_collection::<Project>(&[], OutputFormat::Text).unwrap(),
            "No projects found in your Todoist account"
        );
    }

    #[test]
    fn test_comment_label_truncated() {
        let api = InMemoryTodoist::new();
        let long = "a".repeat(80);
        let comment = api.seed_comment(&CommentOwner::Task("t1".into()), &long);
        assert_eq!(comment.label(), format!("{}...", "a".repeat(50)));
        let short = api.seed_comment(&CommentOwner::Task("t1".into()), "ok");
        assert_eq!(short.label(), "ok");
    }
}
