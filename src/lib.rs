//! # terminal-transports
//!
//! Unified transport session layer for networked terminal devices (door
//! controllers, attendance and biometric terminals) that answer on a fixed
//! endpoint over either TCP or UDP.
//!
//! One [`TransportSession`] owns one channel to one device and gives both
//! transports the same contract:
//!
//! - **open** — connect the stream or bind the datagram endpoint, bounded
//!   by the configured timeout
//! - **send** — transmit a buffer, then wait for exactly one reply unit or
//!   the timeout, whichever comes first
//! - **close** — idempotent, best-effort release of the channel
//!
//! Sends are strictly sequential: a send must fully resolve (reply, error
//! or timeout) before the next one is accepted, and a concurrent send is
//! rejected with [`SessionError::SendInProgress`] rather than interleaved.
//!
//! ## Example: probe a device over TCP
//!
//! ```no_run
//! use std::time::Duration;
//! use terminal_transports::{SessionConfig, TransportSession};
//!
//! # async fn run() -> Result<(), terminal_transports::SessionError> {
//! let config = SessionConfig::new("192.168.1.203")
//!     .with_timeout(Duration::from_secs(1));
//!
//! let session = TransportSession::new(config)?;
//! session.open().await?;
//!
//! let reply = session.send(&[0x50, 0x50, 0x82, 0x7d]).await?;
//! println!("device answered with {} bytes", reply.len());
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: the same device over UDP
//!
//! ```no_run
//! use terminal_transports::{SessionConfig, TransportKind, TransportSession};
//!
//! # async fn run() -> Result<(), terminal_transports::SessionError> {
//! let config = SessionConfig::new("192.168.1.203")
//!     .with_transport(TransportKind::Datagram);
//!
//! let session = TransportSession::new(config)?;
//! session.open().await?;
//! let reply = session.send(b"ping").await?;
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reply correlation
//!
//! The reply unit is the *next* inbound byte chunk (stream) or datagram
//! (datagram) after a send. The protocols these devices speak carry no
//! request identifiers at this layer, so the session makes no attempt to
//! correlate a reply payload to a specific send - a late reply to a timed
//! out send will answer the following send instead. Callers that need
//! stronger guarantees must frame their payloads at the protocol layer
//! above.
//!
//! ## Architecture
//!
//! The crate is organized into layers:
//!
//! 1. **Common**: shared types (errors, configuration)
//! 2. **Traits**: the transport-agnostic [`Channel`] capability
//! 3. **Implementations**: protocol-specific channels (TCP, UDP)
//!
//! The channel implementation is selected once when the session opens and
//! never inspected again.

pub mod common;
pub mod session;
pub mod tcp;
pub mod traits;
pub mod udp;

// Re-export commonly used types
pub use common::{
    SessionConfig, SessionError, SessionResult, TransportKind, DEFAULT_PORT, DEFAULT_TIMEOUT,
};
pub use session::TransportSession;
pub use traits::Channel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::common::*;
    pub use crate::session::TransportSession;
    pub use crate::tcp::TcpChannel;
    pub use crate::traits::Channel;
    pub use crate::udp::UdpChannel;
}
