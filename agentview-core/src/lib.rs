//! Agentview Core Library
//!
//! Streaming response decoder for conversational agent backends. Raw body
//! chunks are framed into lines, classified into text deltas and thought
//! steps, accumulated per turn, scanned for embedded chart blocks and
//! rendered to sanitized markup.
//!
//! ```text
//! bytes -> ChunkFramer -> EventClassifier -> TranscriptAccumulator
//!       -> ChartExtractor -> RenderPipeline -> RenderSink
//! ```

pub mod chart;
pub mod config;
pub mod http;
pub mod protocol;
pub mod render;
pub mod session;
pub mod stream;
pub mod transcript;

pub use chart::{ChartExtractor, ChartPlaceholder, ChartRegistry, Extraction};
pub use config::{ClientConfig, ConfigError};
pub use http::{HttpTransport, Transport, TransportError};
pub use protocol::{ChatRequest, ProtocolEvent, ThoughtStep, ToolInput};
pub use render::{RenderError, RenderPipeline};
pub use session::{ChatSession, ChatView, RenderSink, SessionError, Turn, TurnState};
pub use stream::{ChunkFramer, DecodeError, EventClassifier};
pub use transcript::{TranscriptAccumulator, TranscriptSnapshot};

/// Returns the version of the Agentview Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
