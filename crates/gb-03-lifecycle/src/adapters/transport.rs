//! In-memory transport over tokio channels.
//!
//! Used by tests and the loopback demonstration flow. Makes the same
//! promises a real substrate does - none: no ordering, no exactly-once,
//! no latency bound.

use async_trait::async_trait;
use tokio::sync::mpsc;

use shared_types::{EnvelopeTransport, TransportError};

/// Maximum frames buffered per direction before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_000;

/// One endpoint of an in-memory byte channel.
pub struct InMemoryTransport {
    tx: mpsc::Sender<Vec<u8>>,
    rx: mpsc::Receiver<Vec<u8>>,
}

impl InMemoryTransport {
    /// Cross-wired endpoint pair: what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        Self::pair_with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Endpoint pair with an explicit buffer capacity.
    pub fn pair_with_capacity(capacity: usize) -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::channel(capacity);
        let (b_tx, b_rx) = mpsc::channel(capacity);
        (Self { tx: a_tx, rx: b_rx }, Self { tx: b_tx, rx: a_rx })
    }

    /// Endpoint that receives its own sends.
    pub fn loopback() -> Self {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { tx, rx }
    }
}

#[async_trait]
impl EnvelopeTransport for InMemoryTransport {
    async fn send(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.tx
            .send(bytes)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        self.rx.recv().await.ok_or(TransportError::ChannelClosed)
    }
}
