// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! UDP datagram channel
//!
//! Connectionless transport for devices that speak a datagram protocol.
//! The local endpoint binds to the same port the device listens on; each
//! inbound datagram is a complete reply unit.

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

use crate::common::{SessionConfig, SessionError, SessionResult};
use crate::traits::Channel;

/// Maximum UDP payload size (65535 minus IP and UDP headers)
pub const MAX_DATAGRAM: usize = 65_507;

/// UDP implementation of [`Channel`]
#[derive(Debug)]
pub struct UdpChannel {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpChannel {
    /// Bind the local endpoint and resolve the device address
    ///
    /// The device address is resolved once here and pinned for the
    /// channel's lifetime.
    pub async fn open(config: &SessionConfig) -> SessionResult<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", config.port))
            .await
            .map_err(SessionError::OpenFailed)?;

        let remote = lookup_host((config.address.as_str(), config.port))
            .await
            .map_err(SessionError::OpenFailed)?
            .next()
            .ok_or_else(|| {
                SessionError::OpenFailed(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no address found for {}", config.address),
                ))
            })?;

        info!(
            "🦀 [UDP-SESSION] Bound to 0.0.0.0:{} (device: {})",
            config.port, remote
        );

        Ok(Self { socket, remote })
    }
}

#[async_trait]
impl Channel for UdpChannel {
    async fn transmit(&mut self, payload: &[u8]) -> SessionResult<()> {
        if payload.len() > MAX_DATAGRAM {
            return Err(SessionError::MessageTooLarge {
                size: payload.len(),
                max_size: MAX_DATAGRAM,
            });
        }

        self.socket
            .send_to(payload, self.remote)
            .await
            .map_err(SessionError::SendFailed)?;

        Ok(())
    }

    async fn await_reply(&mut self) -> SessionResult<Vec<u8>> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        let (n, src) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(SessionError::ReceiveFailed)?;

        debug!("🦀 [UDP-SESSION] {} byte datagram from {}", n, src);

        buf.truncate(n);
        Ok(buf)
    }

    async fn close(&mut self) {
        // Nothing to flush; the socket is released on drop
        debug!("🦀 [UDP-SESSION] Socket released");
    }

    fn channel_type(&self) -> &'static str {
        "udp-datagram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TransportKind;

    fn datagram_config(port: u16) -> SessionConfig {
        SessionConfig::new("127.0.0.1")
            .with_port(port)
            .with_transport(TransportKind::Datagram)
    }

    #[tokio::test]
    async fn test_bind_conflict_maps_to_open_failed() {
        let held = UdpSocket::bind("0.0.0.0:0").await.unwrap();
        let port = held.local_addr().unwrap().port();

        let err = UdpChannel::open(&datagram_config(port)).await.unwrap_err();
        assert!(matches!(err, SessionError::OpenFailed(_)));
    }

    #[tokio::test]
    async fn test_oversized_datagram_rejected_before_io() {
        let probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let mut channel = UdpChannel::open(&datagram_config(port)).await.unwrap();

        let payload = vec![0u8; MAX_DATAGRAM + 1];
        let err = channel.transmit(&payload).await.unwrap_err();
        assert!(matches!(err, SessionError::MessageTooLarge { .. }));
    }
}
