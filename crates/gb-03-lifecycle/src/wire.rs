//! Wire form of envelopes: bincode over the typed data model.
//!
//! Decoding is the boundary where an unknown protocol-class tag can
//! appear; it surfaces as a decode failure here and as a generic
//! unreadable signal to the peer.

use shared_types::Envelope;

/// Serializes an envelope for transmission.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(envelope)
}

/// Deserializes received bytes into an envelope.
pub fn decode(bytes: &[u8]) -> Result<Envelope, bincode::Error> {
    bincode::deserialize(bytes)
}
