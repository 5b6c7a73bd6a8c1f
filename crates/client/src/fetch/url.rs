//! Request URL validation.
//!
//! Article requests are rejected up front when the URL cannot be parsed, so no
//! fetch, render or extraction work starts for bad input.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for quire_core::Error {
    fn from(err: UrlError) -> Self {
        quire_core::Error::InvalidInput(err.to_string())
    }
}

/// Parse and normalize the URL of an article request.
///
/// The input must be an absolute `http`/`https` URL with a host. Surrounding
/// whitespace is ignored and the fragment is dropped, since it never changes
/// the fetched document.
pub fn parse_article_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
