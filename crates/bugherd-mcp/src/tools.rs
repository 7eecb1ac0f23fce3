//! MCP tool implementations.
//!
//! Each tool validates its arguments, calls the BugHerd client and renders
//! the result as text. Errors are returned to the server layer, which turns
//! them into error-flagged tool results.

use crate::error::{Error, Result};
use crate::format::{format_comments, format_projects, format_task, format_task_list};
use bugherd::{BugherdClient, TaskFilter};
use tracing::debug;

/// Tool implementations for the BugHerd MCP server.
pub struct Tools {
    client: BugherdClient,
}

impl Tools {
    /// Create a new Tools instance backed by the given client.
    #[must_use]
    pub fn new(client: BugherdClient) -> Self {
        Self { client }
    }

    /// Pre-flight check run before every tool call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionFailed`] if the API cannot be reached with
    /// the current key, including when no key is set.
    pub async fn check_connection(&self) -> Result<()> {
        if self.client.test_connection().await {
            Ok(())
        } else {
            Err(Error::ConnectionFailed)
        }
    }

    /// List all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn list_projects(&self) -> Result<String> {
        let projects = self.client.list_projects().await?;
        debug!(count = projects.len(), "Listed projects");
        Ok(format_projects(&projects))
    }

    /// List tasks in a project.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is out of range or the API request fails.
    pub async fn list_tasks(&self, project_id: u64, filter: TaskFilter) -> Result<String> {
        validate_id("project_id", project_id)?;
        if let Some(page) = filter.page {
            validate_page(page)?;
        }

        let response = self.client.list_tasks(project_id, &filter).await?;
        debug!(project_id, count = response.tasks.len(), "Listed tasks");
        Ok(format_task_list(&response, filter.page))
    }

    /// Show one task in full.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is out of range or the API request fails.
    pub async fn get_task(&self, project_id: u64, task_id: u64) -> Result<String> {
        validate_id("project_id", project_id)?;
        validate_id("task_id", task_id)?;

        let task = self.client.get_task(project_id, task_id).await?;
        Ok(format_task(&task))
    }

    /// List comments on a task.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is out of range or the API request fails.
    pub async fn list_comments(&self, project_id: u64, task_id: u64) -> Result<String> {
        validate_id("project_id", project_id)?;
        validate_id("task_id", task_id)?;

        let comments = self.client.list_comments(project_id, task_id).await?;
        debug!(project_id, task_id, count = comments.len(), "Listed comments");
        Ok(format_comments(&comments))
    }
}

fn validate_id(field: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidArgument {
            field,
            value: value.to_string(),
            reason: "Must be a positive integer.",
        });
    }
    Ok(())
}

fn validate_page(page: u32) -> Result<()> {
    if page == 0 {
        return Err(Error::InvalidArgument {
            field: "page",
            value: page.to_string(),
            reason: "Pages start at 1.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::one(1, true)]
    #[case::large(u64::MAX, true)]
    #[case::zero(0, false)]
    fn test_validate_id(#[case] value: u64, #[case] ok: bool) {
        assert_eq!(validate_id("project_id", value).is_ok(), ok);
    }

    #[test]
    fn test_validate_id_message() {
        let err = validate_id("task_id", 0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid task_id: '0'. Must be a positive integer.");
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1).is_ok());
        assert!(matches!(
            validate_page(0),
            Err(Error::InvalidArgument { field: "page", .. })
        ));
    }
}
