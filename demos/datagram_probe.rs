//! Example: Datagram probe
//!
//! Opens a UDP session to a terminal device, sends a probe payload and
//! prints the reply as hex. The local endpoint binds the device port, so
//! run it on a host where 4370/udp is free.
//!
//! ```
//! cargo run --example datagram_probe -- 192.168.1.203
//! ```

use std::time::Duration;

use terminal_transports::{SessionConfig, SessionError, TransportKind, TransportSession};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.1.203".to_string());

    println!("🦀 Probing {}:4370 over UDP", address);

    let config = SessionConfig::new(address)
        .with_transport(TransportKind::Datagram)
        .with_timeout(Duration::from_secs(1));
    let session = TransportSession::new(config)?;
    session.open().await?;

    let probe = [0x50u8, 0x50, 0x82, 0x7d, 0x13, 0x00, 0x00, 0x00];
    println!("📤 Sending {} bytes", probe.len());

    match session.send(&probe).await {
        Ok(reply) => {
            let hex: Vec<String> = reply.iter().map(|b| format!("{:02x}", b)).collect();
            println!("📨 Received {} bytes: {}", reply.len(), hex.join(" "));
        }
        Err(SessionError::Timeout(window)) => {
            println!("⏰ No reply within {:?}", window);
        }
        Err(e) => return Err(e.into()),
    }

    session.close().await;
    println!("✅ Session closed");

    Ok(())
}
