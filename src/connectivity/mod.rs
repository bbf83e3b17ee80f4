//! Host reachability probe.
//!
//! Distinguishes "the host is offline" from a provider-specific fetch error:
//! the scheduler skips an entire cycle when the probe fails, instead of
//! spamming fetch and send failures.

use std::time::Duration;

use tokio::{net::TcpStream, time::timeout};

/// Returns whether a TCP connection to `address` succeeds within `limit`.
pub async fn probe(address: &str, limit: Duration) -> bool {
    matches!(timeout(limit, TcpStream::connect(address)).await, Ok(Ok(_)))
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn probe_succeeds_against_a_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        assert!(probe(&address, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn probe_fails_against_a_refused_port() {
        assert!(!probe("127.0.0.1:1", Duration::from_secs(1)).await);
    }
}
