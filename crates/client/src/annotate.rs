//! Heading anchors, table of contents and image manifest.

use std::collections::HashMap;

use dom_query::{Document, Selection};
use quire_core::{ImageRef, TocEntry};
use url::Url;

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

/// Attributes that would let a reader bypass the rewritten `src`.
const IMAGE_ATTRIBUTES_STRIPPED: [&str; 7] =
    ["loading", "srcset", "data-src", "data-srcset", "sizes", "data-original-src", "data-lazy-src"];

const IMAGE_STYLE: &str = "max-width: 100%; height: auto; display: block; margin: 1em 0;";

/// Content with anchors and image placeholders written in, plus what was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedContent {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub images: Vec<ImageRef>,
}

/// Assigns deterministic heading ids and catalogs images.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureAnnotator;

impl StructureAnnotator {
    pub fn new() -> Self {
        Self
    }

    /// Annotate `html`, resolving relative image sources against `base`.
    pub fn annotate(&self, html: &str, base: Option<&Url>) -> AnnotatedContent {
        let document = Document::from(html);
        let body = document.select("body");

        let toc = annotate_headings(&body);
        let images = annotate_images(&body, base);

        AnnotatedContent { html: body.inner_html().to_string(), toc, images }
    }
}

/// Ids are `<tag>-<n>` with `n` counted per tag over every heading of that tag.
/// Headings without text keep their index slot but get no entry.
fn annotate_headings(body: &Selection) -> Vec<TocEntry> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut toc = Vec::new();

    for node in body.select(HEADINGS).nodes() {
        let Some(tag) = node.node_name().map(|name| name.to_ascii_lowercase()) else {
            continue;
        };
        let Some(level) = tag.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) else {
            continue;
        };

        let counter = seen.entry(tag.clone()).or_insert(0);
        let index = *counter;
        *counter += 1;

        let heading = Selection::from(*node);
        let title = heading.text().split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            continue;
        }

        let anchor_id = format!("{}-{}", tag, index);
        heading.set_attr("id", &anchor_id);
        toc.push(TocEntry { level, title, anchor_id });
    }

    toc
}

fn annotate_images(body: &Selection, base: Option<&Url>) -> Vec<ImageRef> {
    let mut images = Vec::new();

    for (index, node) in body.select("img").nodes().iter().enumerate() {
        let img = Selection::from(*node);

        let Some(original_src) = image_source(&img).and_then(|raw| resolve(&raw, base)) else {
            tracing::debug!("skipping image without a resolvable source");
            continue;
        };

        let id = format!("img-{}", index);
        let rewritten_src = format!("images/{}.jpg", id);

        img.set_attr("src", &rewritten_src);
        for attr in IMAGE_ATTRIBUTES_STRIPPED {
            img.remove_attr(attr);
        }
        img.set_attr("style", IMAGE_STYLE);

        images.push(ImageRef { id, rewritten_src, original_src });
    }

    images
}

/// `src`, then `data-src`, then the first `srcset` candidate.
fn image_source(img: &Selection) -> Option<String> {
    let non_empty = |name: &str| img.attr(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    non_empty("src")
        .or_else(|| non_empty("data-src"))
        .or_else(|| non_empty("srcset").and_then(|srcset| first_srcset_url(&srcset)))
}

fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
}

fn resolve(raw: &str, base: Option<&Url>) -> Option<String> {
    match base {
        Some(base) => base.join(raw).ok().map(String::from),
        None => Some(Url::parse(raw).map(String::from).unwrap_or_else(|_| raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(html: &str) -> AnnotatedContent {
        let base = Url::parse("https://blog.example.com/posts/first").unwrap();
        StructureAnnotator::new().annotate(html, Some(&base))
    }

    #[test]
    fn test_heading_ids_and_toc() {
        let out = annotate("<article><h1>Title</h1><p>Intro text...</p><h2>Sub</h2><p>more</p></article>");

        assert_eq!(
            out.toc,
            vec![
                TocEntry { level: 1, title: "Title".into(), anchor_id: "h1-0".into() },
                TocEntry { level: 2, title: "Sub".into(), anchor_id: "h2-0".into() },
            ]
        );
        assert!(out.html.contains(r#"<h1 id="h1-0">Title</h1>"#));
        assert!(out.html.contains(r#"<h2 id="h2-0">Sub</h2>"#));
    }

    #[test]
    fn test_heading_index_counted_per_tag() {
        let out = annotate("<h2>A</h2><h3>B</h3><h2>C</h2><h2>D</h2><h3>E</h3>");
        let ids: Vec<&str> = out.toc.iter().map(|e| e.anchor_id.as_str()).collect();
        assert_eq!(ids, vec!["h2-0", "h3-0", "h2-1", "h2-2", "h3-1"]);
    }

    #[test]
    fn test_existing_heading_id_is_replaced() {
        let out = annotate(r#"<h2 id="intro">Intro</h2>"#);
        assert!(out.html.contains(r#"id="h2-0""#));
        assert!(!out.html.contains("intro\""));
    }

    #[test]
    fn test_anchor_ids_unique_and_increasing() {
        let out = annotate("<h1>a</h1><h2>b</h2><h2></h2><h2>c</h2><h1>d</h1><h4>e</h4><h2>f</h2>");

        let mut ids: Vec<&str> = out.toc.iter().map(|e| e.anchor_id.as_str()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);

        let mut last: HashMap<String, usize> = HashMap::new();
        for entry in &out.toc {
            let (tag, index) = entry.anchor_id.split_once('-').unwrap();
            let index: usize = index.parse().unwrap();
            if let Some(prev) = last.insert(tag.to_string(), index) {
                assert!(index > prev);
            }
        }
    }

    #[test]
    fn test_empty_heading_skipped() {
        let out = annotate("<h2>  </h2><h2>Real</h2>");
        assert_eq!(out.toc.len(), 1);
        assert_eq!(out.toc[0].anchor_id, "h2-1");
    }

    #[test]
    fn test_data_src_wins_over_srcset() {
        let out = annotate(r#"<p><img src="" data-src="https://x/y.png" srcset="a.png 1x, b.png 2x"></p>"#);

        assert_eq!(
            out.images,
            vec![ImageRef {
                id: "img-0".into(),
                rewritten_src: "images/img-0.jpg".into(),
                original_src: "https://x/y.png".into(),
            }]
        );
        assert!(out.html.contains(r#"src="images/img-0.jpg""#));
        assert!(!out.html.contains("srcset"));
        assert!(!out.html.contains("data-src"));
    }

    #[test]
    fn test_srcset_first_candidate() {
        let out = annotate(r#"<img srcset="/img/a.png 1x, /img/b.png 2x">"#);
        assert_eq!(out.images[0].original_src, "https://blog.example.com/img/a.png");
    }

    #[test]
    fn test_relative_src_resolved() {
        let out = annotate(r#"<img src="pics/cat.jpg" loading="lazy">"#);
        assert_eq!(out.images[0].original_src, "https://blog.example.com/posts/pics/cat.jpg");
        assert!(!out.html.contains("loading"));
        assert!(out.html.contains(IMAGE_STYLE));
    }

    #[test]
    fn test_image_ids_follow_document_index() {
        let out = annotate(r#"<img src="/a.png"><img alt="none"><div><img data-src="/b.png"></div><img src="/c.png">"#);

        let ids: Vec<&str> = out.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img-0", "img-2", "img-3"]);
        assert!(out.html.contains(r#"src="images/img-2.jpg""#));
        assert!(out.images[1].original_src.ends_with("/b.png"));
        assert!(out.images[2].original_src.ends_with("/c.png"));
    }

    #[test]
    fn test_without_base_keeps_raw_source() {
        let out = StructureAnnotator::new().annotate(r#"<img src="local.png">"#, None);
        assert_eq!(out.images[0].original_src, "local.png");
    }

    #[test]
    fn test_no_headings_or_images() {
        let out = annotate("<p>Just text</p>");
        assert!(out.toc.is_empty());
        assert!(out.images.is_empty());
        assert_eq!(out.html, "<p>Just text</p>");
    }
}
