// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! TCP stream channel
//!
//! Connection-oriented transport for devices that speak a stream protocol.
//! Inbound data arrives as unframed byte chunks; the next chunk after a
//! send is treated as that send's reply.

use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info};

use crate::common::{SessionConfig, SessionError, SessionResult};
use crate::traits::Channel;

/// Read buffer size for a single reply chunk
const READ_CHUNK: usize = 4096;

/// TCP implementation of [`Channel`]
#[derive(Debug)]
pub struct TcpChannel {
    stream: TcpStream,
}

impl TcpChannel {
    /// Connect to the configured endpoint
    ///
    /// The configured timeout bounds connection establishment: an elapsed
    /// window surfaces as [`SessionError::Timeout`], any other connect
    /// failure as [`SessionError::OpenFailed`]. Either way the half-open
    /// socket is released before returning.
    pub async fn open(config: &SessionConfig) -> SessionResult<Self> {
        let connect = TcpStream::connect((config.address.as_str(), config.port));

        let stream = match time::timeout(config.timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(SessionError::OpenFailed(e)),
            Err(_) => return Err(SessionError::Timeout(config.timeout)),
        };

        info!(
            "🦀 [TCP-SESSION] Connected to {}:{}",
            config.address, config.port
        );

        Ok(Self { stream })
    }
}

#[async_trait]
impl Channel for TcpChannel {
    async fn transmit(&mut self, payload: &[u8]) -> SessionResult<()> {
        self.stream
            .write_all(payload)
            .await
            .map_err(SessionError::SendFailed)?;

        self.stream
            .flush()
            .await
            .map_err(SessionError::SendFailed)?;

        Ok(())
    }

    async fn await_reply(&mut self) -> SessionResult<Vec<u8>> {
        let mut buf = vec![0u8; READ_CHUNK];

        let n = self.stream.read(&mut buf).await.map_err(|e| match e.kind() {
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                SessionError::ConnectionClosed
            }
            _ => SessionError::ReceiveFailed(e),
        })?;

        if n == 0 {
            return Err(SessionError::ConnectionClosed);
        }

        buf.truncate(n);
        Ok(buf)
    }

    async fn close(&mut self) {
        // Flush-then-FIN, not an abort
        if let Err(e) = self.stream.shutdown().await {
            debug!("🦀 [TCP-SESSION] Shutdown error ignored: {}", e);
        }
    }

    fn channel_type(&self) -> &'static str {
        "tcp-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_refused_connect_maps_to_open_failed() {
        // Grab a port the OS considers free, then connect to it unbound
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = SessionConfig::new("127.0.0.1").with_port(port);
        let err = TcpChannel::open(&config).await.unwrap_err();
        assert!(matches!(err, SessionError::OpenFailed(_)));
    }

    #[tokio::test]
    async fn test_reply_chunk_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let n = peer.read(&mut buf).await.unwrap();
            peer.write_all(&buf[..n]).await.unwrap();
        });

        let config = SessionConfig::new("127.0.0.1").with_port(port);
        let mut channel = TcpChannel::open(&config).await.unwrap();

        channel.transmit(b"probe").await.unwrap();
        let reply = channel.await_reply().await.unwrap();
        assert_eq!(reply, b"probe");

        channel.close().await;
    }
}
