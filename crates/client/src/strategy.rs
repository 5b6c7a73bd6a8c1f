//! Per-URL routing between the readability extractor and headless rendering.

use quire_core::{AppConfig, Error, Strategy};
use regex::Regex;
use url::Url;

/// Routes URLs matching any configured pattern to headless rendering.
///
/// Patterns are matched against the full URL string, so a pattern may pin a
/// path as well as a domain.
#[derive(Debug, Clone)]
pub struct StrategySelector {
    patterns: Vec<Regex>,
}

impl StrategySelector {
    pub fn new<I, S>(patterns: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref())
                    .map_err(|e| Error::Config(format!("invalid headless domain pattern {:?}: {}", p.as_ref(), e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.headless_domain_patterns)
    }

    /// Classify `url`. Pure; no network access.
    pub fn select(&self, url: &Url) -> Strategy {
        match self.matching_pattern(url) {
            Some(pattern) => {
                tracing::debug!(url = %url, pattern, "url matched headless pattern");
                Strategy::UseHeadlessRender
            }
            None => Strategy::UsePrimaryExtractor,
        }
    }

    /// The first pattern that matches `url`, if any.
    pub fn matching_pattern(&self, url: &Url) -> Option<&str> {
        self.patterns.iter().find(|p| p.is_match(url.as_str())).map(Regex::as_str)
    }
}
