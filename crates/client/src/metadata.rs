//! Author, publish date and excerpt via ordered fallback chains.

use quire_core::{AppConfig, ExtractionCandidate};
use scraper::{ElementRef, Html, Selector};

/// Where a single metadata value may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// An attribute of the first element matching `selector`.
    Attr { selector: &'static str, attr: &'static str },
    /// The text of the first element matching the selector.
    Text(&'static str),
}

pub const AUTHOR_PROBES: [Probe; 6] = [
    Probe::Attr { selector: r#"meta[name="author"]"#, attr: "content" },
    Probe::Text(r#"[rel="author"]"#),
    Probe::Text(".author"),
    Probe::Text(".byline"),
    Probe::Text(".post-author"),
    Probe::Text(".entry-author"),
];

pub const DATE_PROBES: [Probe; 7] = [
    Probe::Attr { selector: r#"meta[property="article:published_time"]"#, attr: "content" },
    Probe::Attr { selector: r#"meta[name="date"]"#, attr: "content" },
    Probe::Attr { selector: "time[datetime]", attr: "datetime" },
    Probe::Text(".post-date"),
    Probe::Text(".entry-date"),
    Probe::Text(".publish-date"),
    Probe::Text(".date"),
];

impl Probe {
    fn selector(&self) -> &'static str {
        match self {
            Probe::Attr { selector, .. } => *selector,
            Probe::Text(selector) => *selector,
        }
    }

    /// Only the first match is inspected; an empty value moves on to the next probe.
    fn read(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(self.selector()).ok()?;
        let element = document.select(&selector).next()?;

        let value = match self {
            Probe::Attr { attr, .. } => element.value().attr(attr).map(collapse_whitespace),
            Probe::Text(_) => Some(element_text(&element)),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Metadata resolved for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub author: Option<String>,
    pub publish_date: Option<String>,
    pub excerpt: String,
}

/// Runs the author/date chains over the source page and builds the excerpt.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    excerpt_max_chars: usize,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(200)
    }
}

impl MetadataExtractor {
    pub fn new(excerpt_max_chars: usize) -> Self {
        Self { excerpt_max_chars }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.excerpt_max_chars)
    }

    /// Resolve metadata for a candidate.
    ///
    /// Values the extractor already reported win; the DOM chains run over
    /// `source_html` and the excerpt is cut from the final `content_html`.
    pub fn extract(&self, candidate: &ExtractionCandidate, source_html: &str, content_html: &str) -> ArticleMetadata {
        let source = Html::parse_document(source_html);

        let author = non_empty(candidate.byline.as_deref()).or_else(|| first_value(&source, &AUTHOR_PROBES));
        let publish_date =
            non_empty(candidate.published_time.as_deref()).or_else(|| first_value(&source, &DATE_PROBES));
        let excerpt = match non_empty(candidate.excerpt.as_deref()) {
            Some(excerpt) => self.truncate(&excerpt),
            None => self.excerpt(content_html),
        };

        ArticleMetadata { author, publish_date, excerpt }
    }

    pub fn author(&self, source_html: &str) -> Option<String> {
        first_value(&Html::parse_document(source_html), &AUTHOR_PROBES)
    }

    pub fn publish_date(&self, source_html: &str) -> Option<String> {
        first_value(&Html::parse_document(source_html), &DATE_PROBES)
    }

    /// First non-empty paragraph, or the whole text when there is none.
    pub fn excerpt(&self, content_html: &str) -> String {
        let fragment = Html::parse_fragment(content_html);

        let paragraph = Selector::parse("p").ok().and_then(|p| {
            fragment
                .select(&p)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty())
        });

        let text = paragraph.unwrap_or_else(|| collapse_whitespace(&fragment.root_element().text().collect::<String>()));
        self.truncate(&text)
    }

    fn truncate(&self, text: &str) -> String {
        if text.chars().count() <= self.excerpt_max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(self.excerpt_max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

fn first_value(document: &Html, probes: &[Probe]) -> Option<String> {
    probes.iter().find_map(|probe| probe.read(document))
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(collapse_whitespace).filter(|v| !v.is_empty())
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_selectors_parse() {
        for probe in AUTHOR_PROBES.iter().chain(DATE_PROBES.iter()) {
            assert!(Selector::parse(probe.selector()).is_ok(), "{:?}", probe);
        }
    }

    #[test]
    fn test_author_from_meta() {
        let html = r#"<html><head><meta name="author" content="Ada Lovelace"></head><body><span class="author">Other</span></body></html>"#;
        assert_eq!(MetadataExtractor::default().author(html).as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_author_from_rel() {
        let html = r#"<body><a rel="author" href="/ada">  Ada
            Lovelace </a></body>"#;
        assert_eq!(MetadataExtractor::default().author(html).as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_author_class_order() {
        let html = r#"<body><span class="post-author">Late</span><span class="byline">By Grace</span></body>"#;
        assert_eq!(MetadataExtractor::default().author(html).as_deref(), Some("By Grace"));
    }

    #[test]
    fn test_empty_meta_falls_through() {
        let html = r#"<head><meta name="author" content=" "></head><body><p class="author">Real</p></body>"#;
        assert_eq!(MetadataExtractor::default().author(html).as_deref(), Some("Real"));
    }

    #[test]
    fn test_no_author() {
        assert_eq!(MetadataExtractor::default().author("<p>nobody</p>"), None);
    }

    #[test]
    fn test_date_chain() {
        let extractor = MetadataExtractor::default();

        let meta = r#"<head><meta property="article:published_time" content="2024-03-01T10:00:00Z"><meta name="date" content="2020-01-01"></head>"#;
        assert_eq!(extractor.publish_date(meta).as_deref(), Some("2024-03-01T10:00:00Z"));

        let named = r#"<head><meta name="date" content="2020-01-01"></head>"#;
        assert_eq!(extractor.publish_date(named).as_deref(), Some("2020-01-01"));

        let time = r#"<body><time>yesterday</time><time datetime="2023-05-06">May 6</time></body>"#;
        assert_eq!(extractor.publish_date(time).as_deref(), Some("2023-05-06"));

        let class = r#"<body><div class="entry-date">June 1, 2022</div></body>"#;
        assert_eq!(extractor.publish_date(class).as_deref(), Some("June 1, 2022"));
    }

    #[test]
    fn test_excerpt_first_paragraph() {
        let excerpt = MetadataExtractor::default().excerpt("<h1>Title</h1><p> </p><p>First real\nparagraph.</p><p>Second.</p>");
        assert_eq!(excerpt, "First real paragraph.");
    }

    #[test]
    fn test_excerpt_truncated() {
        let long = "word ".repeat(100);
        let excerpt = MetadataExtractor::default().excerpt(&format!("<p>{}</p>", long));

        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= 203);
    }

    #[test]
    fn test_excerpt_without_paragraphs_uses_full_text() {
        let excerpt = MetadataExtractor::new(5).excerpt("<div>Hello <b>world</b></div>");
        assert_eq!(excerpt, "Hello...");
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let excerpt = MetadataExtractor::new(3).excerpt("<p>héllo</p>");
        assert_eq!(excerpt, "hél...");
    }

    #[test]
    fn test_candidate_values_win() {
        let candidate = ExtractionCandidate {
            byline: Some("From Extractor".into()),
            published_time: Some(" ".into()),
            excerpt: Some("Summary".into()),
            ..Default::default()
        };
        let source = r#"<head><meta name="author" content="From Meta"><meta name="date" content="2021-02-03"></head>"#;
        let meta = MetadataExtractor::default().extract(&candidate, source, "<p>Body</p>");

        assert_eq!(meta.author.as_deref(), Some("From Extractor"));
        assert_eq!(meta.publish_date.as_deref(), Some("2021-02-03"));
        assert_eq!(meta.excerpt, "Summary");
    }

    #[test]
    fn test_extract_from_dom() {
        let source = r#"<html><head><meta name="author" content="Meta Author"></head><body></body></html>"#;
        let meta = MetadataExtractor::default().extract(&ExtractionCandidate::default(), source, "<p>Opening line.</p>");

        assert_eq!(meta.author.as_deref(), Some("Meta Author"));
        assert_eq!(meta.publish_date, None);
        assert_eq!(meta.excerpt, "Opening line.");
    }
}
