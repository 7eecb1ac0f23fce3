//! MCP server implementation.
//!
//! This module contains the main server setup using rmcp. Tool calls never
//! fail at the protocol level: connectivity problems, bad arguments, unknown
//! tool names and API errors all come back as a single error-flagged text
//! item.

use crate::error::{Error, Result};
use crate::models::{ListTasksParams, TaskParams};
use crate::tools::Tools;
use bugherd::BugherdClient;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{
    ErrorData as McpError, RoleServer, ServiceExt, handler::server::ServerHandler, tool,
    tool_router,
};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

/// The BugHerd MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct BugherdMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BugherdMcpServer {
    /// List all projects.
    #[tool(description = "List all BugHerd projects accessible with the configured API key.")]
    async fn bugherd_list_projects(&self) -> std::result::Result<CallToolResult, McpError> {
        Ok(text_result(self.tools.list_projects().await))
    }

    /// List tasks with optional filters.
    #[tool(
        description = "List tasks in a BugHerd project, optionally filtered by status (backlog, todo, doing, done, closed), priority (critical, important, normal, minor), tag or assignee. Results are paginated."
    )]
    async fn bugherd_list_tasks(
        &self,
        Parameters(params): Parameters<ListTasksParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(text_result(
            self.tools
                .list_tasks(params.project_id, params.filter())
                .await,
        ))
    }

    /// Show one task in full.
    #[tool(
        description = "Get full details of a BugHerd task: description, tags, requester, assignee, screenshot and the page element the feedback was left on."
    )]
    async fn bugherd_get_task(
        &self,
        Parameters(params): Parameters<TaskParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(text_result(
            self.tools.get_task(params.project_id, params.task_id).await,
        ))
    }

    /// List comments on a task.
    #[tool(description = "List the comments on a BugHerd task.")]
    async fn bugherd_list_comments(
        &self,
        Parameters(params): Parameters<TaskParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(text_result(
            self.tools
                .list_comments(params.project_id, params.task_id)
                .await,
        ))
    }
}

impl BugherdMcpServer {
    /// Create a new BugHerd MCP server backed by the given client.
    #[must_use]
    pub fn new(client: BugherdClient) -> Self {
        Self {
            tools: Arc::new(Tools::new(client)),
            tool_router: Self::tool_router(),
        }
    }

    /// The tool catalog advertised in `tools/list`.
    #[must_use]
    pub fn catalog(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.tool_router.list_all().iter().any(|t| t.name == name)
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be initialized or the service
    /// task fails.
    pub async fn run(self) -> Result<()> {
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        Ok(())
    }
}

/// Wrap a tool outcome in a single text item.
fn text_result(result: Result<String>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(e),
    }
}

/// A single error-flagged text item.
fn error_result(message: impl Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
}

impl ServerHandler for BugherdMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bugherd-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "BugHerd MCP server for browsing projects, tasks and comments. Requires BUGHERD_API_KEY."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.catalog()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let name = request.name.to_string();
        info!(tool = %name, "Tool call");

        if let Err(e) = self.tools.check_connection().await {
            return Ok(error_result(e));
        }
        if !self.has_tool(&name) {
            return Ok(error_result(Error::UnknownTool(name)));
        }

        // The router only fails when arguments do not match the tool's schema.
        let tcc = ToolCallContext::new(self, request, context);
        match self.tool_router.call(tcc).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(tool = %name, error = %e.message, "Rejected tool arguments");
                Ok(error_result(format!(
                    "Invalid arguments for {name}: {}",
                    e.message
                )))
            }
        }
    }
}
