//! Core types and shared functionality for quire.
//!
//! This crate provides:
//! - The article data model that crosses the pipeline boundary
//! - Unified error types
//! - Configuration structures

pub mod article;
pub mod config;
pub mod error;

pub use article::{
    ExtractionCandidate, ExtractionMethod, ImageRef, NormalizedArticle, SourceDocument, Strategy, TocEntry,
};
pub use config::{AppConfig, ConfigError, RenderBackend};
pub use error::Error;
