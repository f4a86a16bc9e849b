//! Event classification
//!
//! A line is an event candidate only when it starts with [`EVENT_PREFIX`].
//! Everything else (keep-alives, comments, blank lines) is ignored.

use super::error::DecodeError;
use crate::protocol::{ProtocolEvent, StreamPayload};
use serde_json::Value;
use tracing::{debug, warn};

/// Marker that introduces an event line
pub const EVENT_PREFIX: &str = "data: ";

/// Classify a single line.
///
/// Returns `Ok(None)` for non-event lines and for payloads of an unknown
/// shape, including JSON that is not an object. `Err` means the payload is
/// not valid JSON, or a known field has the wrong type.
pub fn classify_line(line: &str) -> Result<Option<ProtocolEvent>, DecodeError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(EVENT_PREFIX) else {
        return Ok(None);
    };

    let value: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::invalid_json(line, &e))?;
    if !value.is_object() {
        return Ok(None);
    }
    let payload: StreamPayload =
        serde_json::from_value(value).map_err(|e| DecodeError::invalid_json(line, &e))?;

    if let Some(thought) = payload.thought {
        return Ok(Some(ProtocolEvent::ThoughtStep {
            tool: thought.tool,
            input: thought.input,
        }));
    }

    Ok(payload.text.map(|text| ProtocolEvent::TextDelta { text }))
}

/// Counters kept by an [`EventClassifier`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierStats {
    pub events: usize,
    pub ignored: usize,
    pub malformed: usize,
}

/// Stateful wrapper around [`classify_line`] that logs and counts drops
#[derive(Debug, Default)]
pub struct EventClassifier {
    stats: ClassifierStats,
}

impl EventClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a line; malformed payloads are logged and dropped
    pub fn classify(&mut self, line: &str) -> Option<ProtocolEvent> {
        match classify_line(line) {
            Ok(Some(event)) => {
                self.stats.events += 1;
                Some(event)
            }
            Ok(None) => {
                if !line.trim().is_empty() {
                    debug!("Ignoring non-event line: {:?}", line);
                }
                self.stats.ignored += 1;
                None
            }
            Err(e) => {
                warn!("Dropping stream line: {}", e);
                self.stats.malformed += 1;
                None
            }
        }
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }
}
