//! MCP tool argument models.
//!
//! The JSON schemas advertised in `tools/list` are derived from these types,
//! and incoming arguments are deserialized into them, so the advertised
//! schema and the validation are the same thing.

use bugherd::{TaskFilter, TaskPriority, TaskStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments for `bugherd_list_tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    /// The BugHerd project ID.
    pub project_id: u64,

    /// Only return tasks with this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Only return tasks with this priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    /// Only return tasks carrying this tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Only return tasks assigned to this user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,

    /// Page number, starting at 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListTasksParams {
    /// The client-side filter for these arguments.
    #[must_use]
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            priority: self.priority,
            tag: self.tag.clone(),
            assigned_to_id: self.assigned_to_id,
            page: self.page,
        }
    }
}

/// Arguments for tools addressing a single task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskParams {
    /// The BugHerd project ID.
    pub project_id: u64,

    /// The task ID (global ID, not the project-local number).
    pub task_id: u64,
}
