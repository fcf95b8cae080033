//! Session configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::error::{SessionError, SessionResult};

/// Default device port; most networked terminals listen here
pub const DEFAULT_PORT: u16 = 4370;

/// Default window for connection establishment and each reply wait
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Transport selected at construction, immutable thereafter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Reliable, ordered, connection-oriented byte channel (TCP)
    #[default]
    Stream,
    /// Connectionless, unreliable message channel (UDP)
    Datagram,
}

impl TransportKind {
    /// Short label used in logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stream => "tcp-stream",
            Self::Datagram => "udp-datagram",
        }
    }
}

/// Configuration for a [`TransportSession`](crate::session::TransportSession)
///
/// The remote endpoint is fixed for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Device address (hostname or IP)
    pub address: String,

    /// Device port; datagram sessions also bind the local endpoint to it
    pub port: u16,

    /// Applied to connection establishment (stream mode) and to each
    /// send's reply wait
    pub timeout: Duration,

    /// Stream or datagram channel
    pub transport: TransportKind,
}

impl SessionConfig {
    /// Create a config for `address` with default port, timeout and transport
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            transport: TransportKind::Stream,
        }
    }

    /// Set the device port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the timeout window
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the transport kind
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Validate configuration
    ///
    /// A zero timeout is rejected: every open and send must resolve within
    /// a bounded window.
    pub fn validate(&self) -> SessionResult<()> {
        if self.address.is_empty() {
            return Err(SessionError::InvalidConfig(
                "address cannot be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(SessionError::InvalidConfig(
                "port cannot be 0".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(SessionError::InvalidConfig(
                "timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("192.168.1.203");
        assert_eq!(config.address, "192.168.1.203");
        assert_eq!(config.port, 4370);
        assert_eq!(config.timeout, Duration::from_millis(3000));
        assert_eq!(config.transport, TransportKind::Stream);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = SessionConfig::new("10.0.0.5")
            .with_port(4371)
            .with_timeout(Duration::from_secs(1))
            .with_transport(TransportKind::Datagram);

        assert_eq!(config.port, 4371);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.transport, TransportKind::Datagram);
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            SessionConfig::new("").validate(),
            Err(SessionError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::new("10.0.0.5").with_port(0).validate(),
            Err(SessionError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::new("10.0.0.5")
                .with_timeout(Duration::ZERO)
                .validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }
}
