//! Protocol module for the agent chat wire format
//!
//! This module defines the outbound request body and the inbound event
//! payloads carried on `data: ` lines of the response stream. These
//! structures are designed to be:
//! - Forward-compatible (unknown fields are ignored)
//! - Lossless for tool inputs (strings and structured values both survive)
//! - Independent of any transport or rendering concern

pub mod types;

pub use types::{ChatRequest, ProtocolEvent, StreamPayload, ThoughtPayload, ThoughtStep, ToolInput};
