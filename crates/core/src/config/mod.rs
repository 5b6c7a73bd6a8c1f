//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (QUIRE_*)
//! 2. TOML config file (if QUIRE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which headless rendering implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// External program writing the rendered page to stdout.
    #[default]
    Command,
    /// In-process Chrome DevTools session (requires the `render` feature).
    Chromium,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (QUIRE_*)
/// 2. TOML config file (if QUIRE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether headless rendering is available to the strategy selector.
    #[serde(default = "default_true")]
    pub render_enabled: bool,

    #[serde(default)]
    pub render_backend: RenderBackend,

    /// Program run by the command backend.
    #[serde(default = "default_render_command")]
    pub render_command: String,

    /// Arguments for `render_command`; `{url}` is replaced with the page URL.
    #[serde(default = "default_render_args")]
    pub render_args: Vec<String>,

    /// Render time budget in milliseconds.
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Maximum rendered output in bytes.
    #[serde(default = "default_render_max_bytes")]
    pub render_max_bytes: usize,

    /// Primary candidates shorter than this (bytes of content markup) are rejected.
    #[serde(default = "default_quality_gate_min_chars")]
    pub quality_gate_min_chars: usize,

    /// A fallback selector match must have more inner markup than this.
    #[serde(default = "default_fallback_selector_min_chars")]
    pub fallback_selector_min_chars: usize,

    /// The noise-stripped body must be longer than this to be used.
    #[serde(default = "default_fallback_body_min_chars")]
    pub fallback_body_min_chars: usize,

    /// Excerpt length in characters before the ellipsis.
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,

    /// URL regexes that route to headless rendering.
    #[serde(default = "default_headless_domain_patterns")]
    pub headless_domain_patterns: Vec<String>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; quire/0.1)".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_true() -> bool {
    true
}

fn default_render_command() -> String {
    "single-file".into()
}

fn default_render_args() -> Vec<String> {
    [
        "{url}",
        "--dump-content",
        "--browser-headless=true",
        "--block-scripts=true",
        "--block-videos=true",
        "--block-audios=true",
        "--compress-content=false",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_render_timeout_ms() -> u64 {
    60_000
}

fn default_render_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_quality_gate_min_chars() -> usize {
    50_000
}

fn default_fallback_selector_min_chars() -> usize {
    500
}

fn default_fallback_body_min_chars() -> usize {
    1_000
}

fn default_excerpt_max_chars() -> usize {
    200
}

fn default_headless_domain_patterns() -> Vec<String> {
    [
        r"github\.io",
        r"medium\.com",
        r"substack\.com",
        r"dev\.to",
        r"hashnode\.com",
        r"blog\.google",
        r"developers\.google\.com",
        r"stackoverflow\.com",
        r"reddit\.com",
        r"wikipedia\.org",
        r"news\.ycombinator\.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            render_enabled: true,
            render_backend: RenderBackend::default(),
            render_command: default_render_command(),
            render_args: default_render_args(),
            render_timeout_ms: default_render_timeout_ms(),
            render_max_bytes: default_render_max_bytes(),
            quality_gate_min_chars: default_quality_gate_min_chars(),
            fallback_selector_min_chars: default_fallback_selector_min_chars(),
            fallback_body_min_chars: default_fallback_body_min_chars(),
            excerpt_max_chars: default_excerpt_max_chars(),
            headless_domain_patterns: default_headless_domain_patterns(),
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Render timeout as Duration.
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `QUIRE_`
    /// 2. TOML file from `QUIRE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("QUIRE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("QUIRE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }
}
