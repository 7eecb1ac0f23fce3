//! BugHerd - a read-only client for the BugHerd REST API (v2).
//!
//! This crate covers the handful of endpoints needed to browse projects,
//! tasks and comments:
//!
//! - [`BugherdClient::list_projects`] / [`BugherdClient::get_project`]
//! - [`BugherdClient::list_tasks`] with a [`TaskFilter`]
//! - [`BugherdClient::get_task`]
//! - [`BugherdClient::list_comments`]
//!
//! Requests authenticate with the API key from `BUGHERD_API_KEY`, read at
//! request time.

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(feature = "test-util")]
pub mod testing;

pub use client::BugherdClient;
pub use config::{ApiKeySource, Config, RetryPolicy};
pub use domain::{Comment, Project, Task, TaskFilter, TaskPriority, TaskStatus};
pub use error::{Error, Result};
