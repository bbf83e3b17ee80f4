//! The radio device link.
//!
//! `MeshSender` owns its TCP connection to the radio device and reconnects
//! internally when the link breaks. The device protocol past this boundary is
//! opaque; frames are newline-delimited `SENDTEXT <channel> <text>` lines. A
//! chunk in flight when the link breaks is dropped, not retried.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, net::TcpStream, sync::Mutex, time::sleep};

use crate::transport::traits::TextSender;

/// Delay between consecutive chunks, respecting the mesh rate limit.
const INTER_CHUNK_DELAY: Duration = Duration::from_secs(1);

/// Errors on the radio device link.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An I/O error on the device TCP connection.
    #[error("radio link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A sender that owns a reconnectable TCP connection to the radio device.
pub struct MeshSender {
    address: String,
    conn: Mutex<Option<TcpStream>>,
    inter_chunk_delay: Duration,
}

impl MeshSender {
    /// Creates a sender for the device link at `address`.
    ///
    /// No connection is made until the first send.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            conn: Mutex::new(None),
            inter_chunk_delay: INTER_CHUNK_DELAY,
        }
    }

    /// Creates a sender with a custom inter-chunk delay, for tests.
    #[cfg(test)]
    pub fn with_delay(address: impl Into<String>, inter_chunk_delay: Duration) -> Self {
        Self { address: address.into(), conn: Mutex::new(None), inter_chunk_delay }
    }

    /// Writes one frame, establishing the connection first if needed.
    async fn write_frame(
        &self,
        conn: &mut Option<TcpStream>,
        frame: &[u8],
    ) -> Result<(), TransportError> {
        if conn.is_none() {
            tracing::debug!(address = %self.address, "Connecting to radio device link.");
            *conn = Some(TcpStream::connect(&self.address).await?);
        }
        // Checked above, but avoid holding an invalid state on a racing error.
        if let Some(stream) = conn.as_mut() {
            stream.write_all(frame).await?;
            stream.flush().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TextSender for MeshSender {
    async fn send(&self, chunks: &[String], channel: u32) {
        // One lock for the whole batch keeps chunks of a message in order
        // even if two sends race.
        let mut conn = self.conn.lock().await;

        for chunk in chunks {
            tracing::info!(channel, %chunk, "Sending to mesh.");
            let frame = format!("SENDTEXT {} {}\n", channel, chunk);

            if let Err(e) = self.write_frame(&mut conn, frame.as_bytes()).await {
                // Drop the stale connection; the next chunk reconnects. The
                // failed chunk is lost, not retried.
                tracing::warn!(error = %e, "Mesh send failed, dropping connection.");
                *conn = None;
            }

            sleep(self.inter_chunk_delay).await;
        }
    }
}
