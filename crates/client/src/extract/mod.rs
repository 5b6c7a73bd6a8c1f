//! Content extraction.
//!
//! ### Primary algorithm
//! - Uses Lectito's extraction pipeline (Readability.js-inspired): preprocessing,
//!   scoring, best-candidate selection and cleanup.
//!
//! ### Structural fallback
//! - [`StructuralFallback`] walks a fixed list of content-region selectors when the
//!   primary candidate is missing or too short.
//!
//! ### Stable abstraction
//! - Both sit behind the [`Extractor`] trait so the pipeline can be driven with
//!   deterministic fakes.

pub mod fallback;

pub use fallback::{ContentRule, StructuralFallback, TitleRule, extract_title};

use lectito_core::{Readability, ReadabilityConfig};
use quire_core::{Error, ExtractionCandidate, SourceDocument};

use crate::metadata::non_empty;

/// Configuration for the readability extractor.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum character count for a content block (default: 500)
    pub char_threshold: usize,

    /// Maximum number of top candidates to consider (default: 5)
    pub max_top_candidates: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { char_threshold: 500, max_top_candidates: 5 }
    }
}

impl ExtractConfig {
    fn to_readability_config(&self) -> ReadabilityConfig {
        ReadabilityConfig::builder()
            .char_threshold(self.char_threshold)
            .nb_top_candidates(self.max_top_candidates)
            .build()
    }
}

/// Stable extractor trait: one source document in, one candidate out.
pub trait Extractor: Send + Sync {
    /// Extract the main content of `doc`.
    fn extract(&self, doc: &SourceDocument) -> Result<ExtractionCandidate, Error>;
}

/// Readability extractor backed by Lectito.
#[derive(Debug, Clone, Default)]
pub struct LectitoExtractor {
    config: ExtractConfig,
}

impl LectitoExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }
}

impl Extractor for LectitoExtractor {
    fn extract(&self, doc: &SourceDocument) -> Result<ExtractionCandidate, Error> {
        if doc.html.trim().is_empty() {
            return Err(Error::ExtractFailed("document is empty".into()));
        }

        let reader = Readability::with_config(self.config.to_readability_config());
        let article = reader
            .parse_with_url(&doc.html, doc.url.as_str())
            .map_err(|e| Error::ExtractFailed(format!("readability failed: {}", e)))?;

        let metadata = &article.metadata;
        let candidate = ExtractionCandidate {
            byline: non_empty(metadata.author.as_deref()),
            published_time: non_empty(metadata.date.as_deref()),
            excerpt: non_empty(metadata.excerpt.as_deref()),
            ..ExtractionCandidate::from_content(non_empty(metadata.title.as_deref()), article.content.to_string())
        };

        tracing::debug!(url = %doc.url, length = candidate.length, "readability candidate");
        Ok(candidate)
    }
}
