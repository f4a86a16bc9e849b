//! Transcript accumulation for a single turn
//!
//! Text deltas are appended exactly once, in arrival order. Thought steps
//! are stored in arrival order and presented newest-first as a view.

use crate::protocol::{ProtocolEvent, ThoughtStep};
use chrono::Utc;

/// Append-only state of one turn's answer and tool log
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    text: String,
    steps: Vec<ThoughtStep>,
    deltas: usize,
}

/// State of the transcript after applying an event
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSnapshot {
    /// The full answer text to date
    pub text: String,

    /// Number of thought steps recorded so far
    pub step_count: usize,

    /// Whether the applied event was a text delta
    pub text_changed: bool,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the resulting snapshot
    pub fn apply(&mut self, event: ProtocolEvent) -> TranscriptSnapshot {
        match event {
            ProtocolEvent::TextDelta { text } => {
                self.text.push_str(&text);
                self.deltas += 1;
                self.snapshot(true)
            }
            ProtocolEvent::ThoughtStep { tool, input } => {
                self.steps.push(ThoughtStep {
                    seq: self.steps.len(),
                    tool,
                    input,
                    received_at: Utc::now(),
                });
                self.snapshot(false)
            }
        }
    }

    fn snapshot(&self, text_changed: bool) -> TranscriptSnapshot {
        TranscriptSnapshot {
            text: self.text.clone(),
            step_count: self.steps.len(),
            text_changed,
        }
    }

    /// Full answer text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Steps in arrival order
    pub fn steps(&self) -> &[ThoughtStep] {
        &self.steps
    }

    /// Steps most recent first
    pub fn steps_newest_first(&self) -> impl Iterator<Item = &ThoughtStep> {
        self.steps.iter().rev()
    }

    /// Number of text deltas applied
    pub fn delta_count(&self) -> usize {
        self.deltas
    }
}
