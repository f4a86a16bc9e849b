//! Decode error types
//!
//! Decode errors are local: they are logged and the offending line or
//! chart block is skipped. They never terminate a stream.

use thiserror::Error;

/// Errors raised while decoding stream content
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Payload after the `data: ` prefix is not valid JSON for the event shape
    #[error("Invalid event payload: {message} (line: {line})")]
    InvalidJson { line: String, message: String },

    /// A closed chart block carries JSON that does not parse
    #[error("Invalid chart specification in {chart_id}: {message}")]
    InvalidChartJson { chart_id: String, message: String },
}

impl DecodeError {
    /// Build an `InvalidJson` error, truncating long lines for logging
    pub fn invalid_json(line: &str, err: &serde_json::Error) -> Self {
        const MAX_LINE: usize = 120;
        let line = match line.char_indices().nth(MAX_LINE) {
            Some((idx, _)) => format!("{}...", &line[..idx]),
            None => line.to_string(),
        };
        DecodeError::InvalidJson {
            line,
            message: err.to_string(),
        }
    }
}
