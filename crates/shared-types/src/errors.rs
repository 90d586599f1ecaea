//! # Error Taxonomy
//!
//! Errors shared across the envelope subsystems.
//!
//! Construction/validation errors are always locally recoverable (the
//! envelope is simply never registered). Security errors are terminal
//! for the instance: the lifecycle manager force-vanishes it and never
//! retries with weaker parameters. Transport errors pass through
//! unchanged; this subsystem performs no retries.

use thiserror::Error;

use crate::materialization::LifecycleState;
use crate::security::AlgorithmKind;

/// Validation failures, in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A structural section (header/payload/security) is absent or
    /// internally inconsistent.
    #[error("Envelope structure invalid: {0}")]
    MissingSection(&'static str),

    /// The protocol-class tag is outside the closed enumeration.
    #[error("Unknown protocol class tag: {0}")]
    UnknownProtocolClass(String),

    /// Header discriminator and payload discriminator disagree.
    #[error("Class mismatch: header {header}, payload {payload}")]
    ClassMismatch { header: String, payload: String },

    /// Serialized envelope exceeds the class size ceiling.
    #[error("Payload too large: {size} bytes exceeds class maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },

    /// Header TTL exceeds the class ceiling.
    #[error("TTL {ttl_ms}ms exceeds class maximum {max_ttl_ms}ms")]
    TtlExceedsPolicy { ttl_ms: u64, max_ttl_ms: u64 },

    /// A field the class requires is absent from the payload.
    #[error("Missing required payload field: {0}")]
    MissingRequiredField(String),

    /// Declared tier below the class minimum.
    #[error("Insufficient security tier: declared {declared}, class requires {required}")]
    InsufficientSecurityTier { declared: String, required: String },
}

/// Security failures. Non-recoverable for the envelope instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SecurityError {
    /// An algorithm identifier is outside the closed allow-list.
    #[error("Unsupported {kind} algorithm: {value}")]
    UnsupportedAlgorithm { kind: AlgorithmKind, value: String },

    /// MAC/signature verification failed.
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Lifecycle failures. Recoverable; the caller may rebuild.
///
/// An instance id that is absent from the live table reports
/// `ProtocolNotReady` with the VANISHED state: from the caller's side
/// a vanished instance and a never-registered one are indistinguishable
/// by design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// The instance is not in MATERIALIZED state.
    #[error("Protocol not ready: instance is {state}")]
    ProtocolNotReady { state: LifecycleState },
}

/// Cipher-provider failures. Surfaced unchanged, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CipherError {
    /// Encryption failed inside the provider.
    #[error("Encryption failed: {0}")]
    EncryptFailed(String),

    /// Ciphertext failed AEAD authentication.
    #[error("Decryption failed: authentication failed")]
    AuthenticationFailed,

    /// Ciphertext was structurally invalid.
    #[error("Decryption failed: malformed input")]
    MalformedInput,

    /// The key pointer does not resolve.
    #[error("Unknown key reference: {0}")]
    UnknownKey(String),

    /// Signature verification failed.
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Hardware-backed operation requested but no hardware is present.
    #[error("Secure hardware unavailable")]
    HardwareUnavailable,
}

/// Transport failures. Propagated unchanged to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The channel to the peer is gone.
    #[error("Transport channel closed")]
    ChannelClosed,

    /// Underlying I/O failure.
    #[error("Transport I/O error: {0}")]
    Io(String),
}
