//! Extraction pipeline for quire.
//!
//! This crate provides the page loaders (HTTP fetch and headless rendering),
//! the readability and structural extractors, sanitization, structural
//! annotation, metadata resolution, and the [`ArticlePipeline`] that sequences
//! them.

pub mod annotate;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod strategy;

pub use annotate::{AnnotatedContent, StructureAnnotator};
pub use extract::{ContentRule, ExtractConfig, Extractor, LectitoExtractor, StructuralFallback, TitleRule, extract_title};
pub use fetch::{DocumentSource, FetchClient, FetchConfig, FetchResponse, parse_article_url};
pub use metadata::{ArticleMetadata, MetadataExtractor};
pub use pipeline::{ArticlePipeline, PipelineSettings};
pub use render::{CommandRenderer, RenderError, RenderRequest, RenderedPage, Renderer};
pub use sanitize::{SanitizeProfile, Sanitizer};
pub use strategy::StrategySelector;

#[cfg(feature = "render")]
pub use render::HeadlessRenderer;
