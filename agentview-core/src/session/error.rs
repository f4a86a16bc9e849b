//! Session error types

use crate::http::TransportError;
use thiserror::Error;

/// Errors returned from a turn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Nothing to send; no turn was started
    #[error("Message is empty")]
    EmptyMessage,

    /// The request or the response stream failed; the turn is `Failed`
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The turn was aborted by the caller; the turn is `Failed`
    #[error("Turn was cancelled")]
    Cancelled,
}
