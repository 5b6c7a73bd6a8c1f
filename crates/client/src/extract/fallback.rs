//! Structural fallback extraction.
//!
//! When the readability candidate is missing or too short, the page is searched
//! for well-known content regions in a fixed order. The cascade and the title
//! chain are plain rule lists so the order is data, not control flow.

use std::fmt;

use dom_query::{Document, Selection};
use quire_core::{AppConfig, Error, ExtractionCandidate, SourceDocument};

use super::Extractor;

/// Content-region selectors, tried in order.
pub const CONTENT_SELECTORS: [&str; 11] = [
    "article",
    ".post-content",
    ".article-content",
    ".content",
    ".main-content",
    ".post-body",
    ".entry-content",
    "[role=\"main\"]",
    "main",
    "#content",
    "#main",
];

/// Regions removed from the body before it is considered as content.
pub const NOISE_SELECTORS: [&str; 15] = [
    "nav",
    "header",
    "footer",
    ".nav",
    ".navigation",
    ".sidebar",
    ".comments",
    ".comment-area",
    ".share-buttons",
    ".related-posts",
    ".breadcrumb",
    ".ads",
    ".advertisement",
    "script",
    "style",
];

/// Title sources, tried in order.
pub const TITLE_RULES: [TitleRule; 4] = [
    TitleRule::FirstHeading,
    TitleRule::Selector("article h1, .post-title, .entry-title, .post__title"),
    TitleRule::MetaProperty("og:title"),
    TitleRule::DocumentTitle,
];

/// One step of the content cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    /// First element matching `css`, accepted when its inner markup is longer than `min_len` bytes.
    Selector { css: &'static str, min_len: usize },
    /// The body with noise regions removed, accepted when longer than `min_len` bytes.
    CleanedBody { min_len: usize },
    /// The untouched body, accepted when non-empty.
    RawBody,
}

impl fmt::Display for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRule::Selector { css, .. } => write!(f, "selector({})", css),
            ContentRule::CleanedBody { .. } => f.write_str("cleaned-body"),
            ContentRule::RawBody => f.write_str("raw-body"),
        }
    }
}

/// One step of the title chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// First `<h1>` with non-empty text.
    FirstHeading,
    /// First element matching the selector with non-empty text.
    Selector(&'static str),
    /// `content` of `<meta property="...">`.
    MetaProperty(&'static str),
    /// `<title>` with a trailing site-name suffix removed.
    DocumentTitle,
}

impl TitleRule {
    fn apply(&self, document: &Document) -> Option<String> {
        match self {
            TitleRule::FirstHeading => first_text(document, "h1"),
            TitleRule::Selector(css) => first_text(document, css),
            TitleRule::MetaProperty(property) => {
                let meta = document.select(&format!("meta[property=\"{}\"]", property)).first();
                meta.attr("content").map(|c| collapse_whitespace(&c)).filter(|c| !c.is_empty())
            }
            TitleRule::DocumentTitle => {
                let title = collapse_whitespace(&document.select("title").first().text());
                let stripped = strip_site_suffix(&title).to_string();
                (!stripped.is_empty()).then_some(stripped)
            }
        }
    }
}

/// A located content region and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedContent {
    pub rule: ContentRule,
    pub html: String,
}

/// Cascading content-region extractor.
#[derive(Debug, Clone)]
pub struct StructuralFallback {
    rules: Vec<ContentRule>,
}

impl Default for StructuralFallback {
    fn default() -> Self {
        Self::new(500, 1_000)
    }
}

impl StructuralFallback {
    /// Build the standard cascade with the given acceptance thresholds.
    pub fn new(selector_min_len: usize, body_min_len: usize) -> Self {
        let mut rules: Vec<ContentRule> = CONTENT_SELECTORS
            .into_iter()
            .map(|css| ContentRule::Selector { css, min_len: selector_min_len })
            .collect();
        rules.push(ContentRule::CleanedBody { min_len: body_min_len });
        rules.push(ContentRule::RawBody);
        Self { rules }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.fallback_selector_min_chars, config.fallback_body_min_chars)
    }

    pub fn rules(&self) -> &[ContentRule] {
        &self.rules
    }

    /// Walk the cascade over `html` and return the first accepted region.
    pub fn locate_content(&self, html: &str) -> Result<LocatedContent, Error> {
        let document = Document::from(html);

        for rule in &self.rules {
            let accepted = match rule {
                ContentRule::Selector { css, min_len } => {
                    let region = document.select(css).first();
                    if region.is_empty() {
                        continue;
                    }
                    Some(region.inner_html().to_string()).filter(|inner| inner.len() > *min_len)
                }
                ContentRule::CleanedBody { min_len } => {
                    let inner = cleaned_body(html);
                    (inner.len() > *min_len).then_some(inner)
                }
                ContentRule::RawBody => {
                    let inner = document.select("body").inner_html().to_string();
                    (!inner.trim().is_empty()).then_some(inner)
                }
            };

            if let Some(html) = accepted {
                return Ok(LocatedContent { rule: *rule, html });
            }
        }

        Err(Error::FallbackExhausted("document body is empty".into()))
    }
}

impl Extractor for StructuralFallback {
    fn extract(&self, doc: &SourceDocument) -> Result<ExtractionCandidate, Error> {
        let located = self.locate_content(&doc.html)?;
        tracing::debug!(url = %doc.url, rule = %located.rule, length = located.html.len(), "structural fallback matched");

        Ok(ExtractionCandidate::from_content(extract_title(&doc.html), located.html))
    }
}

/// Run the title chain over `html`. `None` when every rule comes up empty.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Document::from(html);
    TITLE_RULES.iter().find_map(|rule| rule.apply(&document))
}

/// Parse a separate copy so the raw body stays untouched for the last rule.
fn cleaned_body(html: &str) -> String {
    let document = Document::from(html);
    let body = document.select("body");
    body.select(&NOISE_SELECTORS.join(", ")).remove();
    body.inner_html().to_string()
}

fn first_text(document: &Document, css: &str) -> Option<String> {
    document
        .select(css)
        .nodes()
        .iter()
        .map(|node| collapse_whitespace(&Selection::from(*node).text()))
        .find(|text| !text.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop a trailing `| Site`, `— Site`, ` - Site` or ` _ Site` segment.
fn strip_site_suffix(title: &str) -> &str {
    let cut = ["|", "—", " - ", " _ "]
        .iter()
        .filter_map(|delim| title.rfind(delim))
        .max();

    match cut {
        Some(idx) if !title[..idx].trim().is_empty() => title[..idx].trim_end(),
        _ => title,
    }
}
