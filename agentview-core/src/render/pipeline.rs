//! Render pipeline: placeholder-substituted text to sanitized markup

use super::{
    escape_html, AllowList, AmmoniaSanitizer, ChartFactory, ChartWidget, CommonMarkRenderer,
    HtmlSanitizer, MarkdownRenderer, RenderError,
};
use crate::chart::{ChartPlaceholder, PLACEHOLDER_ATTR};
use crate::config::RenderConfig;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Converts answer text to markup and keeps one chart widget per placeholder
pub struct RenderPipeline {
    markdown: Option<Arc<dyn MarkdownRenderer>>,
    sanitizer: Option<Arc<dyn HtmlSanitizer>>,
    chart_factory: Option<Arc<dyn ChartFactory>>,
    allow_list: AllowList,

    /// When false, chart blocks are left in the text and rendered literally
    charts: bool,

    /// Charts waiting for their anchor to appear in committed markup
    pending: Vec<ChartPlaceholder>,
    live: HashMap<String, Box<dyn ChartWidget>>,
    failed: HashSet<String>,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPipeline {
    /// Pipeline with CommonMark and ammonia, without a chart factory
    pub fn new() -> Self {
        Self::plain_text()
            .with_markdown(Arc::new(CommonMarkRenderer::new()))
            .with_sanitizer(Arc::new(AmmoniaSanitizer::new()))
    }

    /// Pipeline with no capabilities; everything renders as escaped text
    pub fn plain_text() -> Self {
        Self {
            markdown: None,
            sanitizer: None,
            chart_factory: None,
            allow_list: AllowList::chart_placeholders(),
            charts: true,
            pending: Vec::new(),
            live: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Build a pipeline with the default capabilities enabled in `config`
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut pipeline = Self::plain_text();
        if config.markdown {
            pipeline = pipeline.with_markdown(Arc::new(CommonMarkRenderer::new()));
        }
        if config.sanitize {
            pipeline = pipeline.with_sanitizer(Arc::new(AmmoniaSanitizer::new()));
        }
        pipeline.with_charts(config.charts)
    }

    pub fn with_markdown(mut self, markdown: Arc<dyn MarkdownRenderer>) -> Self {
        self.markdown = Some(markdown);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn HtmlSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    pub fn with_chart_factory(mut self, factory: Arc<dyn ChartFactory>) -> Self {
        self.chart_factory = Some(factory);
        self
    }

    /// Enable or disable chart extraction for turns using this pipeline
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.charts = enabled;
        self
    }

    pub fn charts_enabled(&self) -> bool {
        self.charts
    }

    /// A copy of this pipeline's capabilities with no chart state
    pub fn fresh(&self) -> Self {
        Self {
            markdown: self.markdown.clone(),
            sanitizer: self.sanitizer.clone(),
            chart_factory: self.chart_factory.clone(),
            allow_list: self.allow_list.clone(),
            charts: self.charts,
            pending: Vec::new(),
            live: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Render the full placeholder-substituted text to sanitized markup.
    ///
    /// Markdown output is only emitted after sanitization; if either
    /// capability is missing or fails, the text is escaped instead.
    pub fn render(&self, text: &str) -> String {
        match self.render_rich(text) {
            Ok(markup) => markup,
            Err(RenderError::MarkdownUnavailable) => escape_html(text),
            Err(e) => {
                warn!("Falling back to plain text: {}", e);
                escape_html(text)
            }
        }
    }

    fn render_rich(&self, text: &str) -> Result<String, RenderError> {
        let (Some(markdown), Some(sanitizer)) = (&self.markdown, &self.sanitizer) else {
            return Err(RenderError::MarkdownUnavailable);
        };
        let html = markdown.to_html(text)?;
        sanitizer.sanitize(&html, &self.allow_list)
    }

    /// Queue newly extracted charts for materialization
    pub fn schedule_charts(&mut self, charts: Vec<ChartPlaceholder>) {
        if self.chart_factory.is_none() {
            if !charts.is_empty() {
                debug!("No chart factory, skipping {} chart(s)", charts.len());
            }
            return;
        }
        for chart in charts {
            let known = self.live.contains_key(&chart.id)
                || self.failed.contains(&chart.id)
                || self.pending.iter().any(|p| p.id == chart.id);
            if !known {
                self.pending.push(chart);
            }
        }
    }

    /// Create widgets for pending charts whose anchor is present in `markup`.
    ///
    /// Call after `markup` has been committed to the view. Returns the
    /// number of widgets created.
    pub fn materialize_charts(&mut self, markup: &str) -> usize {
        let Some(factory) = self.chart_factory.clone() else {
            return 0;
        };

        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|chart| has_anchor(markup, &chart.id));
        self.pending = waiting;

        let mut created = 0;
        for chart in ready {
            if self.live.contains_key(&chart.id) {
                continue;
            }
            let widget = factory.create(&chart.id, &chart.spec).and_then(|mut widget| {
                widget.render()?;
                Ok(widget)
            });
            match widget {
                Ok(widget) => {
                    debug!(chart_id = %chart.id, "Chart materialized");
                    self.live.insert(chart.id, widget);
                    created += 1;
                }
                Err(e) => {
                    warn!(chart_id = %chart.id, "Skipping chart: {}", e);
                    self.failed.insert(chart.id);
                }
            }
        }
        created
    }

    /// Ids of live chart widgets
    pub fn live_charts(&self) -> impl Iterator<Item = &str> {
        self.live.keys().map(String::as_str)
    }

    pub fn live_chart_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_chart_count(&self) -> usize {
        self.pending.len()
    }
}

fn has_anchor(markup: &str, id: &str) -> bool {
    markup.contains(&format!(r#"{PLACEHOLDER_ATTR}="{id}""#))
}
