//! Headless rendering for JS-heavy pages.
//!
//! A renderer takes a URL plus a time budget and an output cap and returns the
//! fully rendered markup, or fails outright. Partial output is never returned:
//! a render that runs out of time or produces too much output is an error.
//!
//! Two backends are provided:
//! - [`CommandRenderer`] runs an external program (SingleFile by default) and reads
//!   the page from its stdout.
//! - `HeadlessRenderer` drives Chrome/Chromium directly (feature `render`).

pub mod command;
#[cfg(feature = "render")]
pub mod chromium;

use std::time::Duration;

use quire_core::{AppConfig, Error, SourceDocument};
use url::Url;

pub use command::CommandRenderer;
#[cfg(feature = "render")]
pub use chromium::HeadlessRenderer;

/// Errors that can occur during page rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Render did not finish within the budget.
    #[error("render timeout after {0}ms")]
    Timeout(u64),

    /// Rendered output exceeded the size limit.
    #[error("render output exceeded {0} bytes")]
    BufferExceeded(usize),

    /// Failed to launch the renderer (program or browser).
    #[error("renderer launch failed: {0}")]
    Launch(String),

    /// Renderer ran but failed.
    #[error("render process failed: {0}")]
    Process(String),

    /// Failed to navigate to the URL.
    #[error("navigation failed: {0}")]
    Navigation(String),
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Timeout(ms) => Error::RenderingTimeout(ms),
            RenderError::BufferExceeded(limit) => Error::RenderingBufferExceeded(limit),
            other => Error::RenderingProcess(other.to_string()),
        }
    }
}

/// A single render request.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: Url,

    /// Upper bound on the whole render.
    pub timeout: Duration,

    /// Upper bound on the rendered markup in bytes.
    pub max_bytes: usize,
}

impl RenderRequest {
    /// Build a request using the configured budget.
    pub fn new(url: Url, config: &AppConfig) -> Self {
        Self { url, timeout: config.render_timeout(), max_bytes: config.render_max_bytes }
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Result of rendering a page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Rendered HTML content.
    pub html: String,

    /// Final URL after redirects.
    pub final_url: Url,

    /// Time taken to render in milliseconds.
    pub render_time_ms: u64,
}

impl RenderedPage {
    pub fn into_document(self) -> SourceDocument {
        SourceDocument::new(self.final_url, self.html)
    }
}

/// Renderer trait for headless page rendering.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Render a URL to HTML within the request's budget.
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, RenderError>;
}
