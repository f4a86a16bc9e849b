//! HTTP transport for the agent chat endpoint
//!
//! This module implements the transport layer, handling:
//! - One POST per turn with a JSON body
//! - Exposing the response body as a stream of byte chunks
//! - Error mapping for non-success responses
//! - Request ID generation and correlation

pub mod client;
pub mod error;

pub use client::HttpTransport;
pub use error::{map_http_error, TransportError};

use crate::protocol::ChatRequest;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use uuid::Uuid;

/// Response body as an ordered stream of byte chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Options for a single request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Unique request ID for correlation
    pub request_id: Uuid,

    /// Overall timeout for this request, if any
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// Create options with a freshly generated request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A transport able to open a streaming chat response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response body once the status is known
    /// to be successful
    async fn open_stream(
        &self,
        request: &ChatRequest,
        options: &RequestOptions,
    ) -> Result<ByteStream, TransportError>;
}
