//! A single request/response turn
//!
//! The turn owns every piece of decode state: framer carry, accumulated
//! text, step log, chart registry and live chart widgets. Once it reaches
//! `Completed` or `Failed` it ignores further input.

use super::sink::RenderSink;
use crate::chart::{ChartExtractor, ChartRegistry};
use crate::protocol::ThoughtStep;
use crate::render::RenderPipeline;
use crate::stream::{ChunkFramer, ClassifierStats, EventClassifier};
use crate::transcript::{TranscriptAccumulator, TranscriptSnapshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
    Streaming,
    Completed,
    Failed,
}

impl TurnState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnState::Completed | TurnState::Failed)
    }
}

pub struct Turn {
    id: u64,
    request_id: Uuid,
    message: String,
    state: TurnState,

    framer: ChunkFramer,
    classifier: EventClassifier,
    transcript: TranscriptAccumulator,
    extractor: ChartExtractor,
    charts: ChartRegistry,
    pipeline: RenderPipeline,

    markup: String,
    error: Option<String>,
    bytes_received: usize,
}

impl std::fmt::Debug for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Turn")
            .field("id", &self.id)
            .field("request_id", &self.request_id)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("bytes_received", &self.bytes_received)
            .finish_non_exhaustive()
    }
}

impl Turn {
    /// Create an idle turn for `message`, rendering through `pipeline`
    pub fn new(id: u64, message: impl Into<String>, pipeline: RenderPipeline) -> Self {
        Self {
            id,
            request_id: Uuid::new_v4(),
            message: message.into(),
            state: TurnState::Idle,
            framer: ChunkFramer::new(),
            classifier: EventClassifier::new(),
            transcript: TranscriptAccumulator::new(),
            extractor: ChartExtractor::with_prefix(format!("turn{}-chart", id)),
            charts: ChartRegistry::new(),
            pipeline,
            markup: String::new(),
            error: None,
            bytes_received: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Accumulated answer text, before chart substitution
    pub fn text(&self) -> &str {
        self.transcript.text()
    }

    /// Thought steps in arrival order
    pub fn steps(&self) -> &[ThoughtStep] {
        self.transcript.steps()
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    /// Last markup handed to the sink
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Failure reason for a `Failed` turn
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn bytes_received(&self) -> usize {
        self.bytes_received
    }

    pub fn classifier_stats(&self) -> ClassifierStats {
        self.classifier.stats()
    }

    pub fn live_chart_count(&self) -> usize {
        self.pipeline.live_chart_count()
    }

    pub(crate) fn mark_sending(&mut self) {
        if self.state == TurnState::Idle {
            debug!(turn = self.id, request_id = %self.request_id, "Turn sending");
            self.state = TurnState::Sending;
        }
    }

    /// Run one chunk through framing, classification, accumulation,
    /// extraction and rendering
    pub fn process_chunk(&mut self, chunk: &[u8], sink: &mut dyn RenderSink) {
        if self.state.is_terminal() {
            warn!(turn = self.id, "Ignoring {} bytes for a finished turn", chunk.len());
            return;
        }
        if self.state != TurnState::Streaming {
            debug!(turn = self.id, request_id = %self.request_id, "Turn streaming");
            self.state = TurnState::Streaming;
        }

        self.bytes_received += chunk.len();
        let lines = self.framer.feed(chunk);
        self.process_lines(lines, sink);
    }

    /// End of stream: flush the carry and mark the turn completed
    pub fn complete(&mut self, sink: &mut dyn RenderSink) {
        if self.state.is_terminal() {
            return;
        }
        self.flush(sink);
        self.state = TurnState::Completed;
        sink.agent_finished();
        info!(
            turn = self.id,
            request_id = %self.request_id,
            bytes = self.bytes_received,
            steps = self.transcript.steps().len(),
            charts = self.charts.len(),
            "Turn completed"
        );
    }

    /// Abort: flush what was received, then show `user_message` in the sink.
    ///
    /// Output rendered so far is kept.
    pub fn fail(&mut self, reason: &str, user_message: &str, sink: &mut dyn RenderSink) {
        if self.state.is_terminal() {
            return;
        }
        self.flush(sink);
        self.state = TurnState::Failed;
        self.error = Some(reason.to_string());
        sink.agent_failed(user_message);
        warn!(turn = self.id, request_id = %self.request_id, "Turn failed: {}", reason);
    }

    fn flush(&mut self, sink: &mut dyn RenderSink) {
        if let Some(line) = self.framer.flush() {
            self.process_lines(vec![line], sink);
        }
    }

    fn process_lines(&mut self, lines: Vec<String>, sink: &mut dyn RenderSink) {
        let mut text_changed = false;
        for line in lines {
            let Some(event) = self.classifier.classify(&line) else {
                continue;
            };
            let TranscriptSnapshot { text_changed: changed, .. } = self.transcript.apply(event);
            if changed {
                text_changed = true;
            } else {
                let steps: Vec<ThoughtStep> = self.transcript.steps_newest_first().cloned().collect();
                sink.thought_steps(&steps);
            }
        }

        if text_changed {
            self.render(sink);
        }
    }

    fn render(&mut self, sink: &mut dyn RenderSink) {
        if !self.pipeline.charts_enabled() {
            self.markup = self.pipeline.render(self.transcript.text());
            sink.agent_markup(&self.markup);
            return;
        }

        let extraction = self.extractor.extract(self.transcript.text(), &self.charts);
        self.charts.record(&extraction);

        self.markup = self.pipeline.render(&extraction.text);
        sink.agent_markup(&self.markup);

        // anchors exist only once the markup has been committed
        self.pipeline.schedule_charts(extraction.new_charts);
        self.pipeline.materialize_charts(&self.markup);

        if extraction.open_block {
            debug!(turn = self.id, "Chart block still open");
        }
    }
}
