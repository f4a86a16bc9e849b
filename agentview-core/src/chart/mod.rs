//! Embedded chart extraction
//!
//! Answer text may carry chart specifications wrapped in
//! `[CHART_JSON]` ... `[/CHART_JSON]`. Closed blocks with valid JSON are
//! replaced by an inert placeholder element that the render layer binds a
//! chart widget to.

pub mod extractor;

pub use extractor::{
    placeholder_block, placeholder_token, ChartExtractor, ChartPlaceholder, ChartRegistry, Extraction, CHART_CLOSE,
    CHART_OPEN, PLACEHOLDER_ATTR, PLACEHOLDER_CLASS,
};
