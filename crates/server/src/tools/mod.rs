//! MCP tool implementations.
//!
//! This module contains all tools exposed by the quire server.

pub mod article_extract;
pub mod article_extract_html;

pub use article_extract::{ArticleExtractParams, extract_impl};
pub use article_extract_html::{ArticleExtractHtmlParams, extract_html_impl};

/// Pipeline for tool tests: no renderer and a gate low enough for small fixtures.
#[cfg(test)]
pub(crate) fn test_pipeline() -> quire_client::ArticlePipeline {
    use std::sync::Arc;

    use quire_client::{ArticlePipeline, FetchClient, FetchConfig, LectitoExtractor, StructuralFallback};
    use quire_core::AppConfig;

    let config = AppConfig { render_enabled: false, quality_gate_min_chars: 10, ..Default::default() };
    ArticlePipeline::new(
        Arc::new(FetchClient::new(FetchConfig::from(&config)).unwrap()),
        None,
        Arc::new(LectitoExtractor::default()),
        Arc::new(StructuralFallback::from_config(&config)),
        &config,
    )
    .unwrap()
}
