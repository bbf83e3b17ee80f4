//! The send boundary the scheduling core talks to.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Delivers pre-chunked text over the mesh link.
///
/// Sends are fire-and-forget from the caller's perspective: implementations
/// log and absorb their own failures, and no acknowledgment or backpressure
/// signal is returned.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextSender: Send + Sync {
    /// Sends `chunks` strictly in order on the given mesh channel.
    async fn send(&self, chunks: &[String], channel: u32);
}
