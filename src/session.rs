// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified transport session
//!
//! [`TransportSession`] owns one channel to a fixed device endpoint and
//! enforces the session contract: sequential sends, one reply unit or a
//! timeout per send, deterministic teardown.

use parking_lot::Mutex;
use tokio::time;
use tracing::debug;

use crate::common::{SessionConfig, SessionError, SessionResult, TransportKind};
use crate::tcp::TcpChannel;
use crate::traits::Channel;
use crate::udp::UdpChannel;

/// Session lifecycle states
///
/// `Sending` doubles as the pending-reply flag: at most one send is in
/// flight per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Created,
    Opening,
    Open,
    Sending,
    Closed,
}

/// A session over one stream or datagram channel to a fixed remote endpoint
///
/// Sends are strictly sequential: each send fully resolves (reply, error or
/// timeout) before the next one is accepted. The first inbound reply unit
/// after a send is assumed to be that send's reply; there is no
/// payload-level correlation.
///
/// All operations take `&self`, so a session can be shared behind an `Arc`;
/// the single-in-flight-send invariant is enforced at runtime with
/// [`SessionError::SendInProgress`] rather than assumed.
pub struct TransportSession {
    config: SessionConfig,
    state: Mutex<SessionState>,
    channel: tokio::sync::Mutex<Option<Box<dyn Channel>>>,
}

impl std::fmt::Debug for TransportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportSession")
            .field("config", &self.config)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

/// Returns the session to `Open` when a send resolves, unless the session
/// was closed while the send was in flight.
struct PendingSend<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for PendingSend<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if *state == SessionState::Sending {
            *state = SessionState::Open;
        }
    }
}

impl TransportSession {
    /// Create a session from a validated configuration
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: Mutex::new(SessionState::Created),
            channel: tokio::sync::Mutex::new(None),
        })
    }

    /// Create with defaults for everything but the device address
    pub fn with_address(address: impl Into<String>) -> SessionResult<Self> {
        Self::new(SessionConfig::new(address))
    }

    /// Establish the channel
    ///
    /// Stream sessions connect to the device within the configured timeout;
    /// datagram sessions bind the local endpoint. A failed open leaves the
    /// session closed; it must be reconstructed to retry.
    pub async fn open(&self) -> SessionResult<()> {
        {
            let mut state = self.state.lock();
            match *state {
                SessionState::Created => *state = SessionState::Opening,
                SessionState::Closed => return Err(SessionError::SessionClosed),
                _ => return Err(SessionError::AlreadyOpen),
            }
        }

        // The only place the transport kind is inspected
        let opened: SessionResult<Box<dyn Channel>> = match self.config.transport {
            TransportKind::Stream => TcpChannel::open(&self.config)
                .await
                .map(|c| Box::new(c) as Box<dyn Channel>),
            TransportKind::Datagram => UdpChannel::open(&self.config)
                .await
                .map(|c| Box::new(c) as Box<dyn Channel>),
        };

        let channel = match opened {
            Ok(channel) => channel,
            Err(e) => {
                *self.state.lock() = SessionState::Closed;
                return Err(e);
            }
        };

        *self.channel.lock().await = Some(channel);

        let raced_by_close = {
            let mut state = self.state.lock();
            if *state == SessionState::Opening {
                *state = SessionState::Open;
                false
            } else {
                true
            }
        };

        if raced_by_close {
            // close() won the race; release the fresh channel ourselves
            if let Some(mut channel) = self.channel.lock().await.take() {
                channel.close().await;
            }
            return Err(SessionError::SessionClosed);
        }

        Ok(())
    }

    /// Transmit `payload` and wait for the next reply unit or the timeout
    ///
    /// Exactly one of reply, transport error or [`SessionError::Timeout`]
    /// is reported per call. The reply wait and the timer cancel each
    /// other: whichever resolves first drops the loser, so a timed-out
    /// wait can never fire against a later send.
    pub async fn send(&self, payload: &[u8]) -> SessionResult<Vec<u8>> {
        {
            let mut state = self.state.lock();
            match *state {
                SessionState::Open => *state = SessionState::Sending,
                SessionState::Sending => return Err(SessionError::SendInProgress),
                SessionState::Created | SessionState::Opening => {
                    return Err(SessionError::NotOpen)
                }
                SessionState::Closed => return Err(SessionError::SessionClosed),
            }
        }
        let _pending = PendingSend { state: &self.state };

        let mut guard = self.channel.lock().await;
        let channel = guard.as_mut().ok_or(SessionError::SessionClosed)?;

        channel.transmit(payload).await?;

        match time::timeout(self.config.timeout, channel.await_reply()).await {
            Ok(reply) => reply,
            Err(_) => Err(SessionError::Timeout(self.config.timeout)),
        }
    }

    /// Release the channel
    ///
    /// Safe to call more than once; teardown errors are logged and
    /// swallowed. An in-flight send resolves on its own terms first, but
    /// no new operation is accepted once close is called.
    pub async fn close(&self) {
        {
            let mut state = self.state.lock();
            if *state == SessionState::Closed {
                return;
            }
            *state = SessionState::Closed;
        }

        if let Some(mut channel) = self.channel.lock().await.take() {
            channel.close().await;
            debug!("🦀 [SESSION] {} channel released", channel.channel_type());
        }
    }

    /// True while the session accepts operations
    pub fn is_open(&self) -> bool {
        matches!(
            *self.state.lock(),
            SessionState::Open | SessionState::Sending
        )
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Short label of the selected transport
    pub fn transport_type(&self) -> &'static str {
        self.config.transport.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_validates_config() {
        let err = TransportSession::with_address("").unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
    }

    #[test]
    fn test_transport_labels() {
        let session = TransportSession::with_address("127.0.0.1").unwrap();
        assert_eq!(session.transport_type(), "tcp-stream");
        assert_eq!(session.config().port, 4370);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_send_before_open_is_rejected() {
        let session = TransportSession::with_address("127.0.0.1").unwrap();
        let err = session.send(b"ping").await.unwrap_err();
        assert!(matches!(err, SessionError::NotOpen));
    }

    #[tokio::test]
    async fn test_operations_after_close_are_rejected() {
        let session = TransportSession::with_address("127.0.0.1").unwrap();

        session.close().await;
        session.close().await; // idempotent

        assert!(matches!(
            session.open().await.unwrap_err(),
            SessionError::SessionClosed
        ));
        assert!(matches!(
            session.send(b"ping").await.unwrap_err(),
            SessionError::SessionClosed
        ));
        assert!(!session.is_open());
    }
}
