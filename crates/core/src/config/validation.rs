//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use regex::Regex;
use thiserror::Error;

use crate::config::AppConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err.to_string())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `render_timeout_ms` is less than 1s or exceeds 10 minutes
    /// - `render_max_bytes` is 0 or exceeds 100MB
    /// - `user_agent` is empty, or `render_command` is empty while rendering is enabled
    /// - any size threshold is 0
    /// - a headless domain pattern is not a valid regex
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.render_timeout_ms < 1_000 || self.render_timeout_ms > 600_000 {
            return Err(invalid("render_timeout_ms", "must be between 1000ms and 600000ms"));
        }
        if self.render_max_bytes == 0 || self.render_max_bytes > 100 * 1024 * 1024 {
            return Err(invalid("render_max_bytes", "must be between 1 byte and 100MB"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.render_enabled && self.render_command.trim().is_empty() {
            return Err(invalid("render_command", "must not be empty when rendering is enabled"));
        }

        for (field, value) in [
            ("quality_gate_min_chars", self.quality_gate_min_chars),
            ("fallback_selector_min_chars", self.fallback_selector_min_chars),
            ("fallback_body_min_chars", self.fallback_body_min_chars),
            ("excerpt_max_chars", self.excerpt_max_chars),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }

        if self.fallback_body_min_chars < self.fallback_selector_min_chars {
            tracing::warn!(
                selector_min = self.fallback_selector_min_chars,
                body_min = self.fallback_body_min_chars,
                "fallback_body_min_chars is below fallback_selector_min_chars; \
                 cleaned bodies will be accepted more readily than selector matches"
            );
        }

        for pattern in &self.headless_domain_patterns {
            Regex::new(pattern).map_err(|e| invalid("headless_domain_patterns", format!("{pattern}: {e}")))?;
        }

        Ok(())
    }
}
