//! Common error types for session operations

use std::time::Duration;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Transport-agnostic session error
///
/// Every `open` and `send` resolves with exactly one of these or a
/// success value; errors are never raised outside the operation's own
/// result path.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Channel failed to connect, bind or resolve; the session is
    /// unusable and must be recreated
    #[error("open failed: {0}")]
    OpenFailed(#[source] std::io::Error),

    /// The write or transmit call itself failed (not a timeout)
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The reply wait failed for a reason other than timeout or an
    /// orderly close
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// No reply observed within the configured window
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The remote side ended the stream
    #[error("connection closed by remote")]
    ConnectionClosed,

    /// A send was attempted while another is still in flight
    #[error("send already in progress")]
    SendInProgress,

    /// Send attempted before a successful open
    #[error("session is not open")]
    NotOpen,

    /// Open attempted on a session that is already opening or open
    #[error("session already open")]
    AlreadyOpen,

    /// Operation attempted after close
    #[error("session closed")]
    SessionClosed,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Datagram payload exceeds the transport limit
    #[error("message too large: {size} bytes (max: {max_size})")]
    MessageTooLarge { size: usize, max_size: usize },
}

impl SessionError {
    /// Check whether the error is a timeout (retry policy, if any, is the
    /// caller's responsibility)
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }
}
