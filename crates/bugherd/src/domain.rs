//! BugHerd response types.
//!
//! These are read-only projections of remote state. Every field that the API
//! may omit or send as `null` deserializes to a default, so a structurally
//! valid body never fails to parse because of missing data.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Status name used when a code has no mapping.
pub const UNKNOWN: &str = "unknown";

/// Status codes as used by the BugHerd API.
const STATUS_NAMES: &[(i64, &str)] = &[
    (0, "backlog"),
    (1, "todo"),
    (2, "doing"),
    (4, "done"),
    (5, "closed"),
];

/// Priority codes as used by the BugHerd API.
const PRIORITY_NAMES: &[(i64, &str)] = &[
    (0, "not set"),
    (1, "critical"),
    (2, "important"),
    (3, "normal"),
    (4, "minor"),
];

fn lookup(table: &[(i64, &'static str)], code: Option<i64>) -> &'static str {
    code.and_then(|c| table.iter().find(|(k, _)| *k == c))
        .map_or(UNKNOWN, |&(_, name)| name)
}

/// Human-readable name for a task status code.
#[must_use]
pub fn status_name(code: Option<i64>) -> &'static str {
    lookup(STATUS_NAMES, code)
}

/// Human-readable name for a task priority code.
#[must_use]
pub fn priority_name(code: Option<i64>) -> &'static str {
    lookup(PRIORITY_NAMES, code)
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A BugHerd project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Preview (development) URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub devurl: String,

    /// Whether the project is active.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
}

/// Element locator captured alongside a feedback item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorInfo {
    /// Page URL the feedback was left on.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Structural selector of the element.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
}

/// A BugHerd task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Global task identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,

    /// Project-local sequential number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub local_task_id: u64,

    /// Status code, see [`status_name`].
    #[serde(default)]
    pub status_id: Option<i64>,

    /// Priority code, see [`priority_name`].
    #[serde(default)]
    pub priority_id: Option<i64>,

    /// Free-text description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Tag names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_names: Vec<String>,

    /// Creation timestamp as sent by the API.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    /// Last update timestamp as sent by the API.
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,

    /// Email of the person who reported the task.
    #[serde(default, deserialize_with = "null_as_default")]
    pub requester_email: String,

    /// Assigned user, if any.
    #[serde(default)]
    pub assigned_to_id: Option<u64>,

    /// Screenshot URL, if any.
    #[serde(default)]
    pub screenshot_url: Option<String>,

    /// Element locator, if any.
    #[serde(default)]
    pub selector_info: Option<SelectorInfo>,

    /// Link to the task in the BugHerd web UI.
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_link: String,
}

impl Task {
    /// Human-readable status.
    #[must_use]
    pub fn status(&self) -> &'static str {
        status_name(self.status_id)
    }

    /// Human-readable priority.
    #[must_use]
    pub fn priority(&self) -> &'static str {
        priority_name(self.priority_id)
    }
}

/// Author of a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUser {
    /// User identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
}

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,

    /// Comment body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Creation timestamp as sent by the API.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    /// Authoring user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: CommentUser,
}

/// Pagination metadata attached to task lists.
///
/// All fields are optional; callers decide the fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current 1-based page.
    #[serde(default)]
    pub current_page: Option<u32>,

    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,

    /// Total number of items across all pages.
    #[serde(default)]
    pub count: Option<u64>,
}

/// `GET /projects.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsResponse {
    /// Projects visible to the API key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

/// `GET /projects/{id}.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResponse {
    /// The project.
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: Project,
}

/// `GET /projects/{id}/tasks.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksResponse {
    /// Tasks on the requested page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,

    /// Pagination metadata, if sent.
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}

/// `GET /projects/{id}/tasks/{id}.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// The task.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task: Task,
}

/// `GET /projects/{id}/tasks/{id}/comments.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsResponse {
    /// Comments on the task.
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

/// Task status filter values accepted by the tasks endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet triaged.
    Backlog,
    /// Ready to be worked on.
    Todo,
    /// In progress.
    Doing,
    /// Finished.
    Done,
    /// Archived.
    Closed,
}

impl TaskStatus {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority filter values accepted by the tasks endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Highest priority.
    Critical,
    /// Above normal.
    Important,
    /// Default priority.
    Normal,
    /// Lowest priority.
    Minor,
}

impl TaskPriority {
    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Normal => "normal",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filters for listing tasks.
///
/// Unset fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Status filter.
    pub status: Option<TaskStatus>,
    /// Priority filter.
    pub priority: Option<TaskPriority>,
    /// Tag name filter.
    pub tag: Option<String>,
    /// Assignee filter.
    pub assigned_to_id: Option<u64>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl TaskFilter {
    /// Query parameters in request order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.clone()));
        }
        if let Some(assignee) = self.assigned_to_id {
            pairs.push(("assigned_to_id", assignee.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::backlog(Some(0), "backlog")]
    #[case::todo(Some(1), "todo")]
    #[case::doing(Some(2), "doing")]
    #[case::done(Some(4), "done")]
    #[case::closed(Some(5), "closed")]
    #[case::gap(Some(3), UNKNOWN)]
    #[case::negative(Some(-1), UNKNOWN)]
    #[case::large(Some(99), UNKNOWN)]
    #[case::null(None, UNKNOWN)]
    fn test_status_name(#[case] code: Option<i64>, #[case] expected: &str) {
        assert_eq!(status_name(code), expected);
    }

    #[rstest]
    #[case::not_set(Some(0), "not set")]
    #[case::critical(Some(1), "critical")]
    #[case::important(Some(2), "important")]
    #[case::normal(Some(3), "normal")]
    #[case::minor(Some(4), "minor")]
    #[case::large(Some(5), UNKNOWN)]
    #[case::null(None, UNKNOWN)]
    fn test_priority_name(#[case] code: Option<i64>, #[case] expected: &str) {
        assert_eq!(priority_name(code), expected);
    }

    #[test]
    fn test_every_filter_status_has_a_code() {
        let all = [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::Doing,
            TaskStatus::Done,
            TaskStatus::Closed,
        ];
        for status in all {
            assert!(
                STATUS_NAMES.iter().any(|(_, name)| *name == status.as_str()),
                "{status} missing from status table"
            );
        }
    }

    #[test]
    fn test_task_minimal_body() {
        let task: Task = serde_json::from_value(json!({ "id": 9 })).unwrap();
        assert_eq!(task.id, 9);
        assert!(task.tag_names.is_empty());
        assert!(task.selector_info.is_none());
        assert!(task.assigned_to_id.is_none());
        assert_eq!(task.status(), UNKNOWN);
    }

    #[test]
    fn test_task_null_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "local_task_id": 3,
            "status_id": null,
            "description": null,
            "tag_names": null,
            "assigned_to_id": null,
            "selector_info": null
        }))
        .unwrap();
        assert_eq!(task.local_task_id, 3);
        assert_eq!(task.description, "");
        assert!(task.tag_names.is_empty());
        assert!(task.selector_info.is_none());
    }

    #[test]
    fn test_task_full_body() {
        let task: Task = serde_json::from_value(json!({
            "id": 100,
            "local_task_id": 12,
            "status_id": 2,
            "priority_id": 1,
            "description": "Button misaligned",
            "tag_names": ["ui", "mobile"],
            "created_at": "2024-01-15T10:30:00Z",
            "updated_at": "2024-01-16T08:00:00Z",
            "requester_email": "qa@example.com",
            "assigned_to_id": 42,
            "screenshot_url": "https://cdn.example.com/shot.png",
            "selector_info": { "url": "https://example.com/cart", "path": "div > button" },
            "admin_link": "https://www.bugherd.com/projects/1/tasks/12"
        }))
        .unwrap();
        assert_eq!(task.status(), "doing");
        assert_eq!(task.priority(), "critical");
        assert_eq!(task.tag_names, vec!["ui", "mobile"]);
        assert_eq!(task.assigned_to_id, Some(42));
        let selector = task.selector_info.unwrap();
        assert_eq!(selector.path, "div > button");
    }

    #[rstest]
    #[case::missing(json!({ "name": "No id", "is_active": true }))]
    #[case::null(json!({ "id": null, "name": "No id", "is_active": true }))]
    fn test_project_without_id(#[case] value: serde_json::Value) {
        let project: Project = serde_json::from_value(value).unwrap();
        assert_eq!(project.id, 0);
        assert_eq!(project.name, "No id");
    }

    #[test]
    fn test_task_without_id() {
        let task: Task =
            serde_json::from_value(json!({ "local_task_id": 3, "description": "d" })).unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.local_task_id, 3);
    }

    #[rstest]
    #[case::missing(json!({}))]
    #[case::null(json!({ "task": null }))]
    fn test_task_response_without_task(#[case] value: serde_json::Value) {
        let resp: TaskResponse = serde_json::from_value(value).unwrap();
        assert_eq!(resp.task, Task::default());
    }

    #[test]
    fn test_project_response_without_project() {
        let resp: ProjectResponse = serde_json::from_value(json!({ "project": null })).unwrap();
        assert_eq!(resp.project, Project::default());
    }

    #[test]
    fn test_comment_without_user() {
        let comment: Comment =
            serde_json::from_value(json!({ "text": "hi", "created_at": "now" })).unwrap();
        assert_eq!(comment.user, CommentUser::default());
    }

    #[test]
    fn test_tasks_response_without_meta() {
        let resp: TasksResponse = serde_json::from_value(json!({ "tasks": [] })).unwrap();
        assert!(resp.tasks.is_empty());
        assert!(resp.meta.is_none());
    }

    #[test]
    fn test_filter_omits_unset_fields() {
        assert!(TaskFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn test_filter_order() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Doing),
            priority: Some(TaskPriority::Critical),
            tag: Some("ui".to_string()),
            assigned_to_id: Some(7),
            page: Some(2),
        };
        let keys: Vec<&str> = filter.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["status", "priority", "tag", "assigned_to_id", "page"]);
    }

    #[rstest]
    #[case::backlog("\"backlog\"", TaskStatus::Backlog)]
    #[case::doing("\"doing\"", TaskStatus::Doing)]
    #[case::closed("\"closed\"", TaskStatus::Closed)]
    fn test_status_deserialize(#[case] input: &str, #[case] expected: TaskStatus) {
        assert_eq!(serde_json::from_str::<TaskStatus>(input).unwrap(), expected);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!(serde_json::from_str::<TaskStatus>("\"in_progress\"").is_err());
    }

    #[cfg(feature = "schemars")]
    #[test]
    fn test_filter_enum_schemas_match_wire_values() {
        let status = serde_json::to_value(schemars::schema_for!(TaskStatus))
            .unwrap()
            .to_string();
        for s in [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::Doing,
            TaskStatus::Done,
            TaskStatus::Closed,
        ] {
            assert!(status.contains(&format!("\"{s}\"")), "missing {s}");
        }

        let priority = serde_json::to_value(schemars::schema_for!(TaskPriority))
            .unwrap()
            .to_string();
        for p in [
            TaskPriority::Critical,
            TaskPriority::Important,
            TaskPriority::Normal,
            TaskPriority::Minor,
        ] {
            assert!(priority.contains(&format!("\"{p}\"")), "missing {p}");
        }
    }
}
