//! # Capability Traits
//!
//! External collaborators the envelope subsystem consumes but never
//! implements: the cipher provider, the transport substrate, the time
//! source, and the (optionally hardware-backed) memory wiper.
//!
//! Every provider error is non-retryable and must be surfaced to the
//! caller unchanged.

use async_trait::async_trait;

use crate::errors::{CipherError, TransportError};
use crate::protocol::TimestampMs;
use crate::security::KeyRef;

/// Pluggable cryptographic capability.
///
/// Key material lives entirely behind this interface; the envelope
/// subsystem only ever holds [`KeyRef`] pointers.
pub trait CipherProvider: Send + Sync {
    /// Encrypts plaintext under the referenced key.
    fn encrypt(&self, plaintext: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError>;

    /// Decrypts ciphertext under the referenced key.
    ///
    /// # Errors
    /// - [`CipherError::AuthenticationFailed`] on AEAD tag mismatch
    /// - [`CipherError::MalformedInput`] on structurally invalid input
    fn decrypt(&self, ciphertext: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError>;

    /// Signs data under the referenced key.
    fn sign(&self, data: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError>;

    /// Verifies a signature under the referenced key.
    fn verify(&self, data: &[u8], signature: &[u8], key: &KeyRef) -> Result<(), CipherError>;
}

/// Byte-oriented transport capability.
///
/// No ordering, exactly-once, or latency assumptions: the envelope
/// subsystem re-validates (including expiry) on every receipt, so
/// duplicate and out-of-order delivery are harmless.
#[async_trait]
pub trait EnvelopeTransport: Send {
    /// Sends one serialized envelope.
    async fn send(&self, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// Receives one serialized envelope, blocking until available.
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now_ms(&self) -> TimestampMs;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> TimestampMs {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as TimestampMs
    }
}

/// Hardware-backed memory wiping capability.
///
/// The platform wiper may simply be absent; implementations report
/// [`CipherError::HardwareUnavailable`] rather than pretending to
/// succeed, and callers fall back to software zeroization.
pub trait MemoryWiper: Send + Sync {
    /// Overwrites the buffer using the platform's secure wipe.
    fn wipe(&self, buf: &mut [u8]) -> Result<(), CipherError>;
}

/// The no-hardware default: always reports unavailability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHardwareWiper;

impl MemoryWiper for NoHardwareWiper {
    fn wipe(&self, _buf: &mut [u8]) -> Result<(), CipherError> {
        Err(CipherError::HardwareUnavailable)
    }
}
