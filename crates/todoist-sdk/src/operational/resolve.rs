//! Name-keyed lookup for the by-name task and section tools.
//!
//! Matching is case-insensitive. A candidate matches when its text
//! contains the query as a substring. When no candidate does, the first
//! candidate containing every query word, in order, is taken instead
//! (so "buy milk" still finds "Buy almond milk"). The fallback accepts
//! names a substring match would reject, and the by-name mutations act on
//! the first hit, so their tool descriptions say so.

use todoist_client::{Section, Task, TaskQuery, TodoistApi};
use tracing::{debug, info};

use super::outcome::{ToolError, ToolResult};
use super::pagination::{collect_pages, PageLimits};

/// An entity that can be looked up by its human-readable text.
pub trait Named {
    const KIND: &'static str;

    fn name_text(&self) -> &str;
}

impl Named for Task {
    const KIND: &'static str = "task";

    fn name_text(&self) -> &str {
        &self.content
    }
}

impl Named for Section {
    const KIND: &'static str = "section";

    fn name_text(&self) -> &str {
        &self.name
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Whether every query word appears among the text words in order.
fn words_in_order(text: &str, query: &str) -> bool {
    let mut text_words = words(text);
    words(query).all(|q| text_words.any(|t| t == q))
}

/// First item matching `query`, scanning in the given order.
pub fn find_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Option<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let lowered: Vec<String> = items
        .iter()
        .map(|item| item.name_text().to_lowercase())
        .collect();

    let index = lowered
        .iter()
        .position(|text| text.contains(&needle))
        .or_else(|| {
            lowered
                .iter()
                .position(|text| words_in_order(text, &needle))
        })?;
    items.get(index)
}

fn lookup<T: Named + Clone>(items: &[T], query: &str) -> ToolResult<T> {
    if query.trim().is_empty() {
        return Err(ToolError::validation(format!(
            "{} name must not be empty",
            T::KIND
        )));
    }
    match find_by_name(items, query) {
        Some(found) => {
            info!(kind = T::KIND, query, name = found.name_text(), "Resolved by name");
            Ok(found.clone())
        }
        None => {
            debug!(kind = T::KIND, query, candidates = items.len(), "No name match");
            Err(ToolError::not_found(T::KIND, query))
        }
    }
}

/// Resolve a task by name across every open task.
pub async fn task_by_name(api: &dyn TodoistApi, query: &str) -> ToolResult<Task> {
    if query.trim().is_empty() {
        return lookup::<Task>(&[], query);
    }
    let all = TaskQuery::default();
    let all = &all;
    let tasks =
        collect_pages(PageLimits::unbounded(), move |page| api.list_tasks(all, page)).await?;
    lookup(&tasks, query)
}

/// Resolve a section by name, optionally within one project.
pub async fn section_by_name(
    api: &dyn TodoistApi,
    query: &str,
    project_id: Option<&str>,
) -> ToolResult<Section> {
    if query.trim().is_empty() {
        return lookup::<Section>(&[], query);
    }
    let sections = collect_pages(PageLimits::unbounded(), move |page| {
        api.list_sections(project_id, page)
    })
    .await?;
    lookup(&sections, query)
}
