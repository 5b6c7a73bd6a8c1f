//! Unified error types for quire.
//!
//! Every variant renders with a stable upper-case code prefix so callers
//! (and the MCP server) can classify failures without string matching on
//! free-form messages.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::article::ExtractionMethod;

/// Unified error types for the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed request input (e.g., empty or non-parseable URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Headless rendering exceeded its time budget.
    #[error("RENDER_TIMEOUT: render exceeded {0}ms")]
    RenderingTimeout(u64),

    /// Headless rendering produced more output than allowed.
    #[error("RENDER_BUFFER_EXCEEDED: output exceeded {0} bytes")]
    RenderingBufferExceeded(usize),

    /// Headless rendering process failed for any other reason.
    #[error("RENDER_FAILED: {0}")]
    RenderingProcess(String),

    /// Headless rendering was requested but no renderer is configured.
    #[error("RENDER_DISABLED")]
    RenderDisabled,

    /// A single extractor produced no usable candidate.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// No usable candidate after every attempted method.
    #[error("EXTRACTION_FAILED: {reason} (attempted: {})", join_methods(.attempted))]
    ExtractionFailure { attempted: Vec<ExtractionMethod>, reason: String },

    /// Candidate produced but shorter than the quality gate.
    #[error("QUALITY_GATE_REJECTED: candidate length {length} below minimum {threshold}")]
    QualityGateRejected { length: usize, threshold: usize },

    /// Structural cascade found nothing, not even a non-empty body.
    #[error("FALLBACK_EXHAUSTED: {0}")]
    FallbackExhausted(String),

    /// Markup could not be turned into a sanitized fragment.
    #[error("SANITIZATION_FAILED: {0}")]
    SanitizationFailed(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Configuration could not be turned into a working pipeline.
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

fn join_methods(methods: &[ExtractionMethod]) -> String {
    methods
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Methods this error reports as attempted, if it is an extraction failure.
    pub fn attempted_methods(&self) -> &[ExtractionMethod] {
        match self {
            Error::ExtractionFailure { attempted, .. } => attempted,
            _ => &[],
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::ExtractFailed(_) | Error::ExtractionFailure { .. } => -32000,
            Error::QualityGateRejected { .. } => -32001,
            Error::FallbackExhausted(_) => -32002,
            Error::SanitizationFailed(_) => -32003,
            Error::FetchTimeout(_) => -32006,
            Error::FetchTooLarge(_) => -32007,
            Error::HttpError(_) => -32008,
            Error::RenderDisabled => -32011,
            Error::RenderingProcess(_) => -32012,
            Error::RenderingTimeout(_) => -32013,
            Error::RenderingBufferExceeded(_) => -32014,
            Error::Config(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("not a url".to_string());
        assert!(err.to_string().starts_with("INVALID_INPUT"));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_extraction_failure_names_methods() {
        let err = Error::ExtractionFailure {
            attempted: vec![ExtractionMethod::Primary, ExtractionMethod::FallbackStructural],
            reason: "no content".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("primary, fallback-structural"));
        assert!(msg.contains("no content"));
        assert_eq!(err.attempted_methods().len(), 2);
    }

    #[test]
    fn test_attempted_methods_empty_for_other_errors() {
        assert!(Error::RenderDisabled.attempted_methods().is_empty());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::RenderingTimeout(60_000);
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32013);
        assert!(mcp_err.message.contains("60000ms"));
    }

    #[test]
    fn test_quality_gate_to_mcp_error() {
        let err = Error::QualityGateRejected { length: 200, threshold: 50_000 };
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }
}
