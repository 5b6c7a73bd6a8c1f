//! article_extract_html tool implementation.
//!
//! Normalizes markup the client already has. No network I/O is performed.

use quire_client::ArticlePipeline;
use quire_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for article_extract_html tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleExtractHtmlParams {
    /// The raw HTML of the page.
    pub html: String,

    /// URL the HTML came from; used to resolve image sources and stamped on the result.
    pub url: String,
}

/// Implementation of the article_extract_html tool.
pub async fn extract_html_impl(
    pipeline: &ArticlePipeline, params: ArticleExtractHtmlParams,
) -> Result<CallToolResult, McpError> {
    if params.html.trim().is_empty() {
        return Err(Error::InvalidInput("html cannot be empty".into()).into());
    }

    let article = pipeline.extract_html(&params.html, &params.url)?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&article).unwrap_or_default(),
    )]))
}
