//! MCP server for the BugHerd bug tracker.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! read-only BugHerd data to AI assistants like Claude.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling and wraps
//! `bugherd::BugherdClient`. Every tool call first checks that the API is
//! reachable, then validates its arguments, calls the API and renders the
//! result as a single text block.
//!
//! # Tools
//!
//! - `bugherd_list_projects` - List projects visible to the API key
//! - `bugherd_list_tasks` - List tasks with status/priority/tag/assignee filters
//! - `bugherd_get_task` - Show one task in full
//! - `bugherd_list_comments` - List comments on a task

pub mod cli;
pub mod error;
pub mod format;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::BugherdMcpServer;
