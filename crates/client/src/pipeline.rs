//! Article extraction pipeline.
//!
//! ### Flow
//! 1. Validate the URL (no I/O on failure)
//! 2. Pick a strategy, unless the caller forced one
//! 3. Load the page: HTTP fetch for the primary strategy, headless render otherwise
//! 4. Run the primary extractor and the quality gate
//! 5. On failure or rejection, run the structural fallback (skipped when forced)
//! 6. Sanitize, annotate, resolve metadata and stamp the result
//!
//! ### Degradation
//! - When headless rendering was selected (not forced) and fails, or rendering is
//!   disabled, the request is retried once through the primary strategy.
//! - Every failure after that is reported as a single `EXTRACTION_FAILED` error
//!   listing each attempted method.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use quire_core::{
    AppConfig, Error, ExtractionCandidate, ExtractionMethod, NormalizedArticle, RenderBackend, SourceDocument, Strategy,
};
use url::Url;

use crate::annotate::StructureAnnotator;
use crate::extract::{ExtractConfig, Extractor, LectitoExtractor, StructuralFallback, extract_title};
use crate::fetch::{DocumentSource, FetchClient, FetchConfig, parse_article_url};
use crate::metadata::MetadataExtractor;
use crate::render::{CommandRenderer, RenderRequest, Renderer};
use crate::sanitize::{SanitizeProfile, Sanitizer};
use crate::strategy::StrategySelector;

/// Title used when neither the extractor nor the title chain finds one.
pub const UNTITLED: &str = "Untitled Article";

/// The slice of [`AppConfig`] the orchestrator consults per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub quality_gate_min_chars: usize,
    pub render_enabled: bool,
    pub render_timeout: Duration,
    pub render_max_bytes: usize,
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            quality_gate_min_chars: config.quality_gate_min_chars,
            render_enabled: config.render_enabled,
            render_timeout: config.render_timeout(),
            render_max_bytes: config.render_max_bytes,
        }
    }
}

/// Orchestrates strategy selection, extraction, fallback and assembly.
pub struct ArticlePipeline {
    source: Arc<dyn DocumentSource>,
    renderer: Option<Arc<dyn Renderer>>,
    primary: Arc<dyn Extractor>,
    fallback: Arc<dyn Extractor>,
    selector: StrategySelector,
    settings: PipelineSettings,
    sanitizer: Sanitizer,
    annotator: StructureAnnotator,
    metadata: MetadataExtractor,
}

impl ArticlePipeline {
    /// Assemble a pipeline from explicit collaborators.
    ///
    /// The renderer is ignored when `config.render_enabled` is false.
    pub fn new(
        source: Arc<dyn DocumentSource>, renderer: Option<Arc<dyn Renderer>>, primary: Arc<dyn Extractor>,
        fallback: Arc<dyn Extractor>, config: &AppConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            source,
            renderer: renderer.filter(|_| config.render_enabled),
            primary,
            fallback,
            selector: StrategySelector::from_config(config)?,
            settings: PipelineSettings::from(config),
            sanitizer: Sanitizer::new(),
            annotator: StructureAnnotator::new(),
            metadata: MetadataExtractor::from_config(config),
        })
    }

    /// Build the production pipeline: reqwest fetch, Lectito, structural fallback
    /// and the configured render backend.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let source = Arc::new(FetchClient::new(FetchConfig::from(config))?);
        let primary = Arc::new(LectitoExtractor::new(ExtractConfig::default()));
        let fallback = Arc::new(StructuralFallback::from_config(config));
        let renderer = build_renderer(config).await?;

        Self::new(source, renderer, primary, fallback, config)
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Extract the article at `url`.
    ///
    /// `forced` pins the strategy: no strategy degradation and no structural
    /// fallback, so the first failure is returned as is.
    pub async fn extract(&self, url: &str, forced: Option<Strategy>) -> Result<NormalizedArticle, Error> {
        let url = parse_article_url(url)?;
        let strategy = forced.unwrap_or_else(|| self.selector.select(&url));
        let is_forced = forced.is_some();

        tracing::info!(url = %url, ?strategy, forced = is_forced, "extracting article");

        let result = match strategy {
            Strategy::UsePrimaryExtractor => self.run_primary(&url, is_forced).await,
            Strategy::UseHeadlessRender if is_forced => self.run_headless(&url, true).await,
            Strategy::UseHeadlessRender => match self.run_headless(&url, false).await {
                Ok(article) => Ok(article),
                Err(headless_err) => self.degrade(&url, headless_err).await,
            },
        };

        match &result {
            Ok(article) => tracing::info!(
                url = %url,
                method = %article.extraction_method,
                content_length = article.content_length,
                "article extracted"
            ),
            Err(e) => tracing::warn!(url = %url, error = %e, "article extraction failed"),
        }

        result
    }

    /// Run extraction over markup the caller already has. No network I/O.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<NormalizedArticle, Error> {
        let url = parse_article_url(url)?;
        self.process_document(&SourceDocument::new(url, html), Strategy::UsePrimaryExtractor, false)
    }

    async fn run_primary(&self, url: &Url, forced: bool) -> Result<NormalizedArticle, Error> {
        let doc = self.source.load(url).await?;
        self.process_document(&doc, Strategy::UsePrimaryExtractor, forced)
    }

    async fn run_headless(&self, url: &Url, forced: bool) -> Result<NormalizedArticle, Error> {
        let doc = self.render(url).await?;
        self.process_document(&doc, Strategy::UseHeadlessRender, forced)
    }

    async fn degrade(&self, url: &Url, headless_err: Error) -> Result<NormalizedArticle, Error> {
        let mut attempted = attempted_by(&headless_err, Strategy::UseHeadlessRender);
        tracing::warn!(url = %url, error = %headless_err, "headless strategy failed, degrading to primary");

        let primary_err = match self.run_primary(url, false).await {
            Ok(article) => return Ok(article),
            Err(e) => e,
        };

        if attempted.is_empty() {
            return Err(primary_err);
        }

        attempted.extend(attempted_by(&primary_err, Strategy::UsePrimaryExtractor));
        Err(Error::ExtractionFailure { attempted, reason: format!("{}; {}", headless_err, primary_err) })
    }

    async fn render(&self, url: &Url) -> Result<SourceDocument, Error> {
        let renderer = self.renderer.as_ref().ok_or(Error::RenderDisabled)?;
        let request = RenderRequest {
            url: url.clone(),
            timeout: self.settings.render_timeout,
            max_bytes: self.settings.render_max_bytes,
        };

        let page = renderer.render(&request).await?;
        tracing::debug!(url = %url, render_time_ms = page.render_time_ms, bytes = page.html.len(), "page rendered");

        Ok(page.into_document())
    }

    /// Turn a loaded document into an article using `strategy`'s method names.
    ///
    /// Synchronous: nothing here waits on I/O.
    pub fn process_document(
        &self, doc: &SourceDocument, strategy: Strategy, forced: bool,
    ) -> Result<NormalizedArticle, Error> {
        let primary_method = strategy.primary_method();
        let fallback_method = strategy.fallback_method();

        let primary_err = match self.primary.extract(doc).and_then(|c| self.quality_gate(c)) {
            Ok(candidate) => return self.assemble(doc, candidate, primary_method),
            Err(e) => e,
        };

        if forced {
            return Err(match primary_err {
                Error::ExtractFailed(reason) => Error::ExtractionFailure { attempted: vec![primary_method], reason },
                other => other,
            });
        }

        tracing::debug!(url = %doc.url, error = %primary_err, "primary candidate unusable, trying structural fallback");

        match self.fallback.extract(doc) {
            Ok(candidate) => self.assemble(doc, candidate, fallback_method),
            Err(fallback_err) => Err(Error::ExtractionFailure {
                attempted: vec![primary_method, fallback_method],
                reason: format!("{}; {}", primary_err, fallback_err),
            }),
        }
    }

    /// Accept candidates at least `quality_gate_min_chars` bytes long.
    pub fn quality_gate(&self, candidate: ExtractionCandidate) -> Result<ExtractionCandidate, Error> {
        let threshold = self.settings.quality_gate_min_chars;
        if candidate.length < threshold {
            return Err(Error::QualityGateRejected { length: candidate.length, threshold });
        }
        Ok(candidate)
    }

    fn assemble(
        &self, doc: &SourceDocument, candidate: ExtractionCandidate, method: ExtractionMethod,
    ) -> Result<NormalizedArticle, Error> {
        let profile = if method.is_fallback() { SanitizeProfile::Strict } else { SanitizeProfile::Standard };
        let sanitized = self.sanitizer.sanitize(&candidate.content_html, profile)?;
        let annotated = self.annotator.annotate(&sanitized, Some(&doc.url));
        let metadata = self.metadata.extract(&candidate, &doc.html, &annotated.html);

        let title = candidate
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| extract_title(&doc.html))
            .unwrap_or_else(|| UNTITLED.to_string());

        Ok(NormalizedArticle {
            title,
            content_length: annotated.html.len(),
            content: annotated.html,
            author: metadata.author,
            publish_date: metadata.publish_date,
            excerpt: metadata.excerpt,
            url: doc.url.to_string(),
            extracted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            extraction_method: method,
            toc_structure: annotated.toc,
            images: annotated.images,
        })
    }
}

/// Methods a failed strategy attempt consumed. A disabled renderer consumed none.
fn attempted_by(err: &Error, strategy: Strategy) -> Vec<ExtractionMethod> {
    match err {
        Error::ExtractionFailure { attempted, .. } => attempted.clone(),
        Error::RenderDisabled => Vec::new(),
        _ => vec![strategy.primary_method()],
    }
}

async fn build_renderer(config: &AppConfig) -> Result<Option<Arc<dyn Renderer>>, Error> {
    if !config.render_enabled {
        return Ok(None);
    }

    let renderer: Arc<dyn Renderer> = match config.render_backend {
        RenderBackend::Command => Arc::new(CommandRenderer::from_config(config)),
        #[cfg(feature = "render")]
        RenderBackend::Chromium => Arc::new(crate::render::HeadlessRenderer::launch().await?),
        #[cfg(not(feature = "render"))]
        RenderBackend::Chromium => {
            return Err(Error::Config("the chromium render backend requires the `render` feature".into()));
        }
    };

    tracing::debug!(backend = ?config.render_backend, "render backend ready");
    Ok(Some(renderer))
}
