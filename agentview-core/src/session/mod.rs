//! Session controller
//!
//! A [`ChatSession`] runs turns one at a time against an injected
//! [`Transport`] and reports to an injected [`RenderSink`]. Each chunk is
//! fully processed before the next one is awaited; awaiting the transport
//! is the only suspension point.

mod error;
mod sink;
mod turn;

pub use error::SessionError;
pub use sink::{ChatView, RenderSink, Role, ViewMessage};
pub use turn::{Turn, TurnState};

use crate::config::{ClientConfig, IdentityConfig, DEFAULT_ERROR_MESSAGE};
use crate::http::{RequestOptions, Transport};
use crate::protocol::ChatRequest;
use crate::render::RenderPipeline;
use futures::StreamExt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Drives turns against a transport and a render sink
pub struct ChatSession<T: Transport, S: RenderSink> {
    transport: T,
    sink: S,
    pipeline: RenderPipeline,
    identity: Option<IdentityConfig>,
    error_message: String,
    request_timeout: Option<Duration>,
    turns: Vec<Turn>,
}

impl<T: Transport, S: RenderSink> ChatSession<T, S> {
    /// Session with the default render pipeline and no identity fields
    pub fn new(transport: T, sink: S) -> Self {
        Self {
            transport,
            sink,
            pipeline: RenderPipeline::new(),
            identity: None,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            request_timeout: None,
            turns: Vec::new(),
        }
    }

    /// Session configured from a [`ClientConfig`]
    pub fn from_config(config: &ClientConfig, transport: T, sink: S) -> Self {
        Self {
            pipeline: RenderPipeline::from_config(&config.render),
            identity: Some(config.identity.clone()),
            error_message: config.error_message.clone(),
            request_timeout: config.endpoint.request_timeout_secs.map(Duration::from_secs),
            ..Self::new(transport, sink)
        }
    }

    /// Replace the render pipeline used for new turns
    pub fn with_pipeline(mut self, pipeline: RenderPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Finished turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Send `message` and stream the reply to completion
    pub async fn send(&mut self, message: &str) -> Result<&Turn, SessionError> {
        self.send_with_cancel(message, CancellationToken::new()).await
    }

    /// Send `message`; cancelling `cancel` aborts the stream and fails the turn
    pub async fn send_with_cancel(
        &mut self,
        message: &str,
        cancel: CancellationToken,
    ) -> Result<&Turn, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let id = self.turns.len() as u64 + 1;
        let mut turn = Turn::new(id, message, self.pipeline.fresh());

        self.sink.user_message(message);
        self.sink.agent_started();
        turn.mark_sending();

        let mut request = ChatRequest::new(message);
        if let Some(identity) = &self.identity {
            request = request.with_identity(&identity.user_id, &identity.session_id);
        }
        let mut options = RequestOptions {
            request_id: turn.request_id(),
            ..RequestOptions::default()
        };
        if let Some(timeout) = self.request_timeout {
            options = options.with_timeout(timeout);
        }

        info!(turn = id, request_id = %options.request_id, "Starting turn");
        let outcome = stream_turn(
            &self.transport,
            &mut self.sink,
            &mut turn,
            &request,
            &options,
            &cancel,
        )
        .await;

        match &outcome {
            Ok(()) => turn.complete(&mut self.sink),
            Err(e) => turn.fail(&e.to_string(), &self.error_message, &mut self.sink),
        }
        self.turns.push(turn);

        let turn = &self.turns[self.turns.len() - 1];
        outcome.map(|()| turn)
    }
}

async fn stream_turn<T: Transport, S: RenderSink>(
    transport: &T,
    sink: &mut S,
    turn: &mut Turn,
    request: &ChatRequest,
    options: &RequestOptions,
    cancel: &CancellationToken,
) -> Result<(), SessionError> {
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SessionError::Cancelled),
        opened = transport.open_stream(request, options) => opened?,
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SessionError::Cancelled),
            next = stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => turn.process_chunk(&chunk, sink),
            Some(Err(e)) => return Err(e.into()),
            None => return Ok(()),
        }
    }
}
