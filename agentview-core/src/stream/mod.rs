//! Stream decoding: bytes to lines, lines to protocol events
//!
//! The two stages are kept separate so that framing can be tested against
//! arbitrary chunk boundaries independently of the event grammar.

pub mod classifier;
pub mod error;
pub mod framer;

pub use classifier::{classify_line, ClassifierStats, EventClassifier, EVENT_PREFIX};
pub use error::DecodeError;
pub use framer::ChunkFramer;
