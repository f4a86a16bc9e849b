//! Render error types

use thiserror::Error;

/// Errors raised by rendering capabilities.
///
/// These never abort a stream: the pipeline logs them and falls back to
/// escaped text, or skips the affected chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Markdown renderer is not available")]
    MarkdownUnavailable,

    #[error("Markdown rendering failed: {message}")]
    Markdown { message: String },

    #[error("Sanitizer failed: {message}")]
    Sanitizer { message: String },

    #[error("Chart {chart_id} could not be created: {message}")]
    Chart { chart_id: String, message: String },
}
