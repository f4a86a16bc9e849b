//! Rendering of accumulated answer text
//!
//! Markdown conversion, sanitization and chart widgets are capabilities
//! injected into the [`RenderPipeline`]. Any of them may be absent; the
//! pipeline then degrades to escaped plain text instead of failing.

pub mod error;
pub mod markdown;
pub mod pipeline;
pub mod sanitize;

pub use error::RenderError;
pub use markdown::{escape_html, CommonMarkRenderer};
pub use pipeline::RenderPipeline;
pub use sanitize::{AllowList, AmmoniaSanitizer};

use serde_json::Value;

/// Markdown-to-HTML capability
pub trait MarkdownRenderer: Send + Sync {
    /// Convert Markdown text to HTML
    fn to_html(&self, markdown: &str) -> Result<String, RenderError>;
}

/// HTML sanitizer capability
pub trait HtmlSanitizer: Send + Sync {
    /// Clean `html`, keeping the extra elements and attributes in `allow`
    fn sanitize(&self, html: &str, allow: &AllowList) -> Result<String, RenderError>;
}

/// Constructor for live chart widgets
pub trait ChartFactory: Send + Sync {
    /// Bind a chart described by `spec` to the placeholder anchor `anchor_id`
    fn create(&self, anchor_id: &str, spec: &Value) -> Result<Box<dyn ChartWidget>, RenderError>;
}

/// A live chart bound to a placeholder anchor
pub trait ChartWidget: Send {
    /// Draw the chart
    fn render(&mut self) -> Result<(), RenderError>;
}
