//! Article data model shared by the pipeline and its consumers.
//!
//! `NormalizedArticle` is the only value that leaves the pipeline; its serde
//! shape (camelCase keys, kebab-case method names) is what the packaging
//! side reads.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// Raw markup plus the URL it came from.
///
/// Produced once by a fetch or a render and never modified afterwards.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: Url,
    pub html: String,
}

impl SourceDocument {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self { url, html: html.into() }
    }
}

/// Output of a single extractor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub title: Option<String>,
    pub content_html: String,
    pub byline: Option<String>,
    pub published_time: Option<String>,
    pub excerpt: Option<String>,
    /// Length of `content_html` in bytes.
    pub length: usize,
}

impl ExtractionCandidate {
    /// Build a candidate from content markup, deriving `length`.
    pub fn from_content(title: Option<String>, content_html: impl Into<String>) -> Self {
        let content_html = content_html.into();
        let length = content_html.len();
        Self { title, content_html, length, ..Default::default() }
    }
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TocEntry {
    /// Heading level, 1 through 6.
    pub level: u8,
    pub title: String,
    /// Anchor written back onto the heading element (`h2-0`, `h2-1`, ...).
    #[serde(rename = "id")]
    pub anchor_id: String,
}

/// One image in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// `img-<n>`, zero-based in document order.
    pub id: String,
    /// Placeholder path now present in the content's `src`.
    pub rewritten_src: String,
    /// Absolute source URL to download during packaging.
    pub original_src: String,
}

/// How the final content was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ExtractionMethod {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "fallback-structural")]
    FallbackStructural,
    #[serde(rename = "headless-render")]
    HeadlessRender,
    #[serde(rename = "headless-render+fallback")]
    HeadlessRenderFallback,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 4] = [
        ExtractionMethod::Primary,
        ExtractionMethod::FallbackStructural,
        ExtractionMethod::HeadlessRender,
        ExtractionMethod::HeadlessRenderFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Primary => "primary",
            ExtractionMethod::FallbackStructural => "fallback-structural",
            ExtractionMethod::HeadlessRender => "headless-render",
            ExtractionMethod::HeadlessRenderFallback => "headless-render+fallback",
        }
    }

    /// Whether the structural fallback produced the content.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ExtractionMethod::FallbackStructural | ExtractionMethod::HeadlessRenderFallback)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing decision for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Strategy {
    #[serde(rename = "use-primary-extractor")]
    UsePrimaryExtractor,
    #[serde(rename = "use-headless-render")]
    UseHeadlessRender,
}

impl Strategy {
    /// Method stamped when the primary extractor's candidate passes the gate.
    pub fn primary_method(&self) -> ExtractionMethod {
        match self {
            Strategy::UsePrimaryExtractor => ExtractionMethod::Primary,
            Strategy::UseHeadlessRender => ExtractionMethod::HeadlessRender,
        }
    }

    /// Method stamped when the structural fallback supplies the content.
    pub fn fallback_method(&self) -> ExtractionMethod {
        match self {
            Strategy::UsePrimaryExtractor => ExtractionMethod::FallbackStructural,
            Strategy::UseHeadlessRender => ExtractionMethod::HeadlessRenderFallback,
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "readability" | "use-primary-extractor" => Ok(Strategy::UsePrimaryExtractor),
            "headless-render" | "headless" | "render" | "use-headless-render" => Ok(Strategy::UseHeadlessRender),
            other => Err(Error::InvalidInput(format!("unsupported extraction method: {other}"))),
        }
    }
}

/// The normalized article handed to the packaging collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub title: String,
    /// Sanitized, annotated HTML.
    pub content: String,
    pub author: Option<String>,
    pub publish_date: Option<String>,
    pub excerpt: String,
    pub url: String,
    /// RFC 3339 capture timestamp.
    pub extracted_at: String,
    pub extraction_method: ExtractionMethod,
    /// Byte length of `content`.
    pub content_length: usize,
    pub toc_structure: Vec<TocEntry>,
    pub images: Vec<ImageRef>,
}
