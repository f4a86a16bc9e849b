//! Two-pass chart block extraction
//!
//! The first pass collects every closed block in the current text together
//! with its ordinal and parse outcome. The second pass builds the
//! substituted string once. Since answer text only grows, the ordinal of a
//! closed block never changes, so `<prefix>-<ordinal>` is a stable id.

use crate::stream::DecodeError;
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Opening marker of an embedded chart block
pub const CHART_OPEN: &str = "[CHART_JSON]";

/// Closing marker of an embedded chart block
pub const CHART_CLOSE: &str = "[/CHART_JSON]";

/// CSS class of the placeholder element
pub const PLACEHOLDER_CLASS: &str = "chart-container";

/// Attribute carrying the placeholder id
pub const PLACEHOLDER_ATTR: &str = "data-chart-id";

fn chart_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\[CHART_JSON\](.*?)\[/CHART_JSON\]").expect("chart block pattern is valid")
    })
}

/// Placeholder element substituted for an extracted block
pub fn placeholder_token(id: &str) -> String {
    format!(r#"<div class="{PLACEHOLDER_CLASS}" {PLACEHOLDER_ATTR}="{id}"></div>"#)
}

/// Text substituted for an extracted block.
///
/// The blank lines keep the placeholder a standalone HTML block, so Markdown
/// directly after a chart is still parsed as Markdown.
pub fn placeholder_block(id: &str) -> String {
    format!("\n\n{}\n\n", placeholder_token(id))
}

/// An extracted chart and the id of its placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlaceholder {
    pub id: String,
    pub spec: Value,
}

/// Charts already extracted in a turn, plus blocks permanently rejected
#[derive(Debug, Default, Clone)]
pub struct ChartRegistry {
    order: Vec<String>,
    charts: HashMap<String, Value>,
    rejected: HashSet<String>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the outcome of an extraction pass
    pub fn record(&mut self, extraction: &Extraction) {
        for chart in &extraction.new_charts {
            if self.charts.insert(chart.id.clone(), chart.spec.clone()).is_none() {
                self.order.push(chart.id.clone());
            }
        }
        self.rejected.extend(extraction.rejected.iter().cloned());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn is_rejected(&self, id: &str) -> bool {
        self.rejected.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.charts.get(id)
    }

    /// Charts in extraction order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|id| self.charts.get(id).map(|spec| (id.as_str(), spec)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Text with every accepted block replaced by its placeholder
    pub text: String,

    /// Charts not present in the registry handed to the pass
    pub new_charts: Vec<ChartPlaceholder>,

    /// Ids of closed blocks rejected for the first time in this pass
    pub rejected: Vec<String>,

    /// True if an opening marker after the last closed block is still unmatched
    pub open_block: bool,
}

enum SpanOutcome {
    Known,
    New(Value),
    /// `true` the first time the block is rejected
    Rejected(bool),
}

struct Span {
    range: Range<usize>,
    id: String,
    outcome: SpanOutcome,
}

/// Chart block extractor; holds only the id prefix
#[derive(Debug, Clone)]
pub struct ChartExtractor {
    prefix: String,
}

impl Default for ChartExtractor {
    fn default() -> Self {
        Self::with_prefix("chart")
    }
}

impl ChartExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `prefix` for placeholder ids, e.g. `turn3-chart` gives `turn3-chart-0`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn placeholder_id(&self, ordinal: usize) -> String {
        format!("{}-{}", self.prefix, ordinal)
    }

    /// Extract every closed chart block from `full_text`.
    ///
    /// Blocks whose id is already in `prior` are substituted without being
    /// parsed again and are not reported as new.
    pub fn extract(&self, full_text: &str, prior: &ChartRegistry) -> Extraction {
        let spans = self.collect_spans(full_text, prior);

        let mut extraction = Extraction {
            open_block: self.has_open_block(full_text, spans.last().map(|s| s.range.end)),
            ..Default::default()
        };

        let mut text = String::with_capacity(full_text.len());
        let mut cursor = 0;
        for span in spans {
            match span.outcome {
                SpanOutcome::Rejected(fresh) => {
                    if fresh {
                        extraction.rejected.push(span.id);
                    }
                    continue;
                }
                SpanOutcome::Known => {}
                SpanOutcome::New(ref spec) => extraction.new_charts.push(ChartPlaceholder {
                    id: span.id.clone(),
                    spec: spec.clone(),
                }),
            }
            text.push_str(&full_text[cursor..span.range.start]);
            text.push_str(&placeholder_block(&span.id));
            cursor = span.range.end;
        }
        text.push_str(&full_text[cursor..]);
        extraction.text = text;
        extraction
    }

    fn collect_spans(&self, full_text: &str, prior: &ChartRegistry) -> Vec<Span> {
        chart_block_pattern()
            .captures_iter(full_text)
            .enumerate()
            .filter_map(|(ordinal, caps)| {
                let whole = caps.get(0)?;
                let payload = caps.get(1)?.as_str();
                let id = self.placeholder_id(ordinal);

                let outcome = if prior.contains(&id) {
                    SpanOutcome::Known
                } else if prior.is_rejected(&id) {
                    SpanOutcome::Rejected(false)
                } else {
                    match serde_json::from_str::<Value>(payload.trim()) {
                        Ok(spec) => {
                            debug!(chart_id = %id, "Extracted chart block");
                            SpanOutcome::New(spec)
                        }
                        Err(e) => {
                            let err = DecodeError::InvalidChartJson {
                                chart_id: id.clone(),
                                message: e.to_string(),
                            };
                            warn!("Leaving chart block as text: {}", err);
                            SpanOutcome::Rejected(true)
                        }
                    }
                };

                Some(Span {
                    range: whole.range(),
                    id,
                    outcome,
                })
            })
            .collect()
    }

    fn has_open_block(&self, full_text: &str, last_closed_end: Option<usize>) -> bool {
        let tail = &full_text[last_closed_end.unwrap_or(0)..];
        tail.contains(CHART_OPEN)
    }
}
