// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Channel trait definition
//!
//! One capability contract implemented by every transport channel. The
//! session selects an implementation when it opens and never inspects the
//! transport kind again afterwards.

use async_trait::async_trait;

use crate::common::SessionResult;

/// A channel to a fixed remote endpoint
///
/// Implementations own the underlying socket exclusively. A reply unit is
/// the next inbound byte chunk (stream channels) or the next inbound
/// datagram (datagram channels); there is no payload-level correlation
/// between a send and the reply unit that answers it.
#[async_trait]
pub trait Channel: Send {
    /// Transmit a payload to the remote endpoint
    async fn transmit(&mut self, payload: &[u8]) -> SessionResult<()>;

    /// Wait for the next inbound reply unit
    ///
    /// Cancel-safe: dropping the returned future deregisters the wait
    /// without consuming any inbound data.
    async fn await_reply(&mut self) -> SessionResult<Vec<u8>>;

    /// Release the channel; best-effort, errors are logged and swallowed
    async fn close(&mut self);

    /// Short label for logs and diagnostics
    fn channel_type(&self) -> &'static str;
}
