//! HTML sanitization using ammonia

use super::{HtmlSanitizer, RenderError};
use crate::chart::{PLACEHOLDER_ATTR, PLACEHOLDER_CLASS};

/// Elements and attributes allowed on top of the sanitizer's default policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    pub tags: Vec<String>,
    /// `(tag, attribute)` pairs
    pub attributes: Vec<(String, String)>,
    /// `(tag, class)` pairs
    pub classes: Vec<(String, String)>,
}

impl AllowList {
    /// Allow-list for chart placeholder anchors
    pub fn chart_placeholders() -> Self {
        Self {
            tags: vec!["div".to_string()],
            attributes: vec![("div".to_string(), PLACEHOLDER_ATTR.to_string())],
            classes: vec![("div".to_string(), PLACEHOLDER_CLASS.to_string())],
        }
    }
}

/// Sanitizer backed by ammonia's default safe policy
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str, allow: &AllowList) -> Result<String, RenderError> {
        let mut builder = ammonia::Builder::default();
        builder.add_tags(allow.tags.iter().map(String::as_str));
        for (tag, attribute) in &allow.attributes {
            builder.add_tag_attributes(tag.as_str(), std::iter::once(attribute.as_str()));
        }
        for (tag, class) in &allow.classes {
            builder.add_allowed_classes(tag.as_str(), std::iter::once(class.as_str()));
        }
        Ok(builder.clean(html).to_string())
    }
}
