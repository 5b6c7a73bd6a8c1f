//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{ArticleExtractHtmlParams, ArticleExtractParams, extract_html_impl, extract_impl};

use quire_client::ArticlePipeline;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for quire.
#[derive(Clone)]
pub struct QuireServer {
    pipeline: Arc<ArticlePipeline>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl QuireServer {
    /// Create a new server handler around a ready pipeline.
    pub fn new(pipeline: Arc<ArticlePipeline>) -> Self {
        Self { pipeline, tool_router: Self::tool_router() }
    }

    /// Fetch (or render) a URL and return it as a normalized article.
    #[tool(
        description = "Extract a web page as a normalized article: title, sanitized HTML content, author, publish date, excerpt, table of contents and image manifest. Returns JSON."
    )]
    async fn article_extract(&self, params: Parameters<ArticleExtractParams>) -> Result<CallToolResult, McpError> {
        extract_impl(&self.pipeline, params.0).await
    }

    /// Normalize caller-supplied HTML. No network requests are made.
    #[tool(description = "Normalize raw HTML into an article without any network access. Returns JSON.")]
    async fn article_extract_html(
        &self, params: Parameters<ArticleExtractHtmlParams>,
    ) -> Result<CallToolResult, McpError> {
        extract_html_impl(&self.pipeline, params.0).await
    }
}

impl ServerHandler for QuireServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "quire".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
