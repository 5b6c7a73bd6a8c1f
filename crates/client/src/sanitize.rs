//! HTML sanitization for extracted content.
//!
//! The sanitizer parses a fragment, drops unsafe and noise elements, strips
//! script-bearing and presentational attributes, and serializes the body back
//! out. Serializing a parsed tree and parsing it again yields the same tree, so
//! running the sanitizer on its own output changes nothing.

use dom_query::{Document, Selection};
use quire_core::Error;

/// Elements removed under every profile.
const UNSAFE_ELEMENTS: [&str; 5] = ["script", "style", "iframe", "object", "embed"];

/// Page chrome removed under [`SanitizeProfile::Strict`].
const CHROME_ELEMENTS: [&str; 3] = ["nav", "header", "footer"];

/// Attributes that carry a URL and may not use the `javascript:` scheme.
const URL_ATTRIBUTES: [&str; 4] = ["href", "src", "action", "formaction"];

/// Which element kinds are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SanitizeProfile {
    /// Script-capable and embedded elements only.
    #[default]
    Standard,
    /// Also page chrome; used for content the structural fallback produced.
    Strict,
}

impl SanitizeProfile {
    fn removed_elements(&self) -> Vec<&'static str> {
        match self {
            SanitizeProfile::Standard => UNSAFE_ELEMENTS.to_vec(),
            SanitizeProfile::Strict => UNSAFE_ELEMENTS.iter().chain(CHROME_ELEMENTS.iter()).copied().collect(),
        }
    }
}

/// Stateless HTML sanitizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer;

impl Sanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Sanitize `html` and return the cleaned fragment.
    pub fn sanitize(&self, html: &str, profile: SanitizeProfile) -> Result<String, Error> {
        let document = Document::from(html);
        let body = document.select("body");
        if body.is_empty() {
            return Err(Error::SanitizationFailed("markup has no body to sanitize".into()));
        }

        body.select(&profile.removed_elements().join(", ")).remove();

        for node in body.select("*").nodes() {
            let element = Selection::from(*node);
            let is_img = node.node_name().is_some_and(|name| &*name == "img");

            let doomed: Vec<String> = node
                .attrs()
                .iter()
                .filter(|attr| is_forbidden(&attr.name.local, &attr.value, is_img))
                .map(|attr| attr.name.local.to_string())
                .collect();

            for name in doomed {
                element.remove_attr(&name);
            }
        }

        Ok(body.inner_html().to_string())
    }
}

/// `data-src` survives on images so lazy-loaded sources can still be resolved.
fn is_forbidden(name: &str, value: &str, is_img: bool) -> bool {
    let name = name.to_ascii_lowercase();

    if name.starts_with("on") || name == "style" {
        return true;
    }
    if name.starts_with("data-") {
        return !(is_img && name == "data-src");
    }
    URL_ATTRIBUTES.contains(&name.as_str()) && is_javascript_url(value)
}

/// Browsers ignore ASCII whitespace and control characters inside a scheme.
fn is_javascript_url(value: &str) -> bool {
    let scheme: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take("javascript:".len())
        .collect();
    scheme.eq_ignore_ascii_case("javascript:")
}
