//! Text rendering for tool results.
//!
//! Each tool returns exactly one markdown-flavoured text block. The layout is
//! meant for people reading it through an assistant, not for parsing.

use bugherd::domain::{Comment, Project, Task, TasksResponse};
use std::borrow::Cow;

/// Shown when the API key can see no projects.
pub const NO_PROJECTS: &str = "No projects found.";

/// Shown when a task query matches nothing.
pub const NO_TASKS: &str = "No tasks found matching the specified filters.";

/// Shown when a task has no comments.
pub const NO_COMMENTS: &str = "No comments on this task.";

/// Maximum description length in task lists, in characters.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Cut `text` to `max_chars` characters, appending `...` only if it was longer.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn tags(task: &Task) -> Cow<'_, str> {
    if task.tag_names.is_empty() {
        Cow::Borrowed("none")
    } else {
        Cow::Owned(task.tag_names.join(", "))
    }
}

/// Render the project list.
#[must_use]
pub fn format_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return NO_PROJECTS.to_string();
    }

    let mut blocks = vec![format!("Found {} project(s):", projects.len())];
    blocks.extend(projects.iter().map(|p| {
        format!(
            "## {}\n- ID: {}\n- URL: {}\n- Active: {}",
            p.name,
            p.id,
            p.devurl,
            yes_no(p.is_active)
        )
    }));
    blocks.join("\n\n")
}

/// Render one page of tasks.
///
/// `requested_page` fills in the current page when the response carries no
/// pagination metadata.
#[must_use]
pub fn format_task_list(response: &TasksResponse, requested_page: Option<u32>) -> String {
    let tasks = &response.tasks;
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    let meta = response.meta.clone().unwrap_or_default();
    let current_page = meta.current_page.or(requested_page).unwrap_or(1);
    let total_pages = meta.total_pages.unwrap_or(current_page).max(current_page);
    let count = meta.count.unwrap_or(tasks.len() as u64);

    let mut blocks = vec![format!(
        "Page {current_page} of {total_pages} ({count} total tasks)"
    )];
    blocks.extend(tasks.iter().map(|t| {
        format!(
            "## Task #{} (ID: {})\n\
             - Status: {}\n\
             - Priority: {}\n\
             - Tags: {}\n\
             - Created: {}\n\
             - Description: {}\n\
             - Link: {}",
            t.local_task_id,
            t.id,
            t.status(),
            t.priority(),
            tags(t),
            t.created_at,
            truncate(&t.description, DESCRIPTION_PREVIEW_CHARS),
            t.admin_link
        )
    }));
    blocks.join("\n\n")
}

/// Render a single task with all its details.
#[must_use]
pub fn format_task(task: &Task) -> String {
    let assignee = task
        .assigned_to_id
        .map_or_else(|| "Unassigned".to_string(), |id| id.to_string());
    let screenshot = task
        .screenshot_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or("No screenshot available");
    let element = task.selector_info.as_ref().map_or_else(
        || "Not available".to_string(),
        |s| format!("URL: {}\nSelector: {}", s.url, s.path),
    );

    format!(
        "# Task #{local} (ID: {id})\n\n\
         - Status: {status}\n\
         - Priority: {priority}\n\
         - Tags: {tags}\n\
         - Created: {created}\n\
         - Updated: {updated}\n\
         - Requester: {requester}\n\
         - Assigned To: {assignee}\n\n\
         ## Description\n{description}\n\n\
         ## Screenshot\n{screenshot}\n\n\
         ## Element Info\n{element}\n\n\
         ## Admin Link\n{link}",
        local = task.local_task_id,
        id = task.id,
        status = task.status(),
        priority = task.priority(),
        tags = tags(task),
        created = task.created_at,
        updated = task.updated_at,
        requester = task.requester_email,
        description = task.description,
        link = task.admin_link,
    )
}

/// Render the comments on a task.
#[must_use]
pub fn format_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return NO_COMMENTS.to_string();
    }

    let entries: Vec<String> = comments
        .iter()
        .map(|c| {
            let author = if c.user.display_name.is_empty() {
                "Unknown user"
            } else {
                c.user.display_name.as_str()
            };
            format!("**{author}** ({}):\n{}", c.created_at, c.text)
        })
        .collect();

    format!(
        "Found {} comment(s):\n\n{}",
        comments.len(),
        entries.join("\n\n---\n\n")
    )
}
