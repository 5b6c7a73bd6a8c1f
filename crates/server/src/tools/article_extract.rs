//! article_extract tool implementation.
//!
//! Runs the full pipeline for a URL: strategy selection, fetch or headless
//! render, extraction with structural fallback, and normalization.

use quire_client::ArticlePipeline;
use quire_core::{Error, Strategy};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for article_extract tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleExtractParams {
    /// The article URL (http or https).
    pub url: String,

    /// Pin the extraction method instead of letting the URL pick one.
    /// - "primary": fetch and run the readability extractor only
    /// - "headless-render": render in a headless browser only
    ///
    /// A forced method never falls back, so its failure is returned as is.
    #[serde(default)]
    pub force_method: Option<String>,
}

/// Parse `force_method`; absent or blank means no forcing.
pub fn parse_force_method(raw: Option<&str>) -> Result<Option<Strategy>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(method) => method.parse().map(Some),
    }
}

/// Implementation of the article_extract tool.
pub async fn extract_impl(pipeline: &ArticlePipeline, params: ArticleExtractParams) -> Result<CallToolResult, McpError> {
    let forced = parse_force_method(params.force_method.as_deref())?;
    let article = pipeline.extract(&params.url, forced).await?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&article).unwrap_or_default(),
    )]))
}
