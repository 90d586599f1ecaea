//! # Shared Types
//!
//! Domain entities shared across the GhostBridge envelope subsystems.
//! This is the single source of truth for the envelope data model, the
//! closed protocol-class policy table, the error taxonomy, and the
//! capability traits the core consumes.
//!
//! ## Contents
//!
//! | Module | Holds |
//! |--------|-------|
//! | `protocol` | `ProtocolClass`, `SecurityTier`, the fixed policy table |
//! | `envelope` | `Envelope`, `EnvelopeHeader`, `EnvelopePayload`, ids |
//! | `security` | `SecurityContext`, `KeyRef`, algorithm identifiers |
//! | `materialization` | `MaterializationRecord`, lifecycle states, history |
//! | `errors` | Validation / security / lifecycle / cipher / transport errors |
//! | `capabilities` | `CipherProvider`, `EnvelopeTransport`, `TimeSource`, `MemoryWiper` |
//!
//! ## Ownership rules
//!
//! - `MaterializationRecord`s are owned exclusively by the lifecycle
//!   manager; other components receive only the opaque `InstanceId`.
//! - `KeyRef`s are pointers; key bytes never leave the cipher provider.
//! - After `Envelope::purge()`, payload and key pointers are
//!   unrecoverable; only header metadata survives into history.

pub mod capabilities;
pub mod envelope;
pub mod errors;
pub mod materialization;
pub mod protocol;
pub mod security;

pub use capabilities::{
    CipherProvider, EnvelopeTransport, MemoryWiper, NoHardwareWiper, SystemTimeSource, TimeSource,
};
pub use envelope::{
    Destination, Envelope, EnvelopeFlags, EnvelopeHeader, EnvelopeId, EnvelopePayload, PayloadBody,
    PeerId, Priority,
};
pub use errors::{CipherError, LifecycleError, SecurityError, TransportError, ValidationError};
pub use materialization::{
    HistoryRecord, InstanceId, LifecycleState, MaterializationRecord, VanishMethod, VanishReason,
};
pub use protocol::{
    fields, ClassPolicy, ProtocolClass, ResourceConstraints, SecurityTier, TimestampMs,
};
pub use security::{algorithms, AlgorithmKind, AuthMaterial, KeyRef, SecurityContext};
