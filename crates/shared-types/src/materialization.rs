//! # Materialization Records
//!
//! Runtime lifecycle bookkeeping for one envelope instance. Records are
//! owned exclusively by the lifecycle manager; every other component
//! holds only the opaque [`InstanceId`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::envelope::EnvelopeId;
use crate::protocol::{ProtocolClass, ResourceConstraints, TimestampMs};

/// Opaque handle to a live envelope instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generates a fresh instance id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Lifecycle state of one instance.
///
/// ```text
/// [MATERIALIZING] ──materialize──→ [MATERIALIZED] ──vanish──→ [VANISHED]
/// ```
///
/// MATERIALIZING is transient: it exists only while runtime resources
/// are being constructed and is never observable through the live
/// table. VANISHED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Runtime resources under construction.
    Materializing,
    /// Usable for send/receive.
    Materialized,
    /// Payload and key pointers purged. Terminal.
    Vanished,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Materializing => write!(f, "MATERIALIZING"),
            Self::Materialized => write!(f, "MATERIALIZED"),
            Self::Vanished => write!(f, "VANISHED"),
        }
    }
}

/// How an instance's payload is destroyed at vanish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VanishMethod {
    /// Multi-pass pattern overwrite before release.
    #[default]
    SecureWipe,
    /// Single zeroize pass.
    Drop,
}

impl std::fmt::Display for VanishMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecureWipe => write!(f, "secure-wipe"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Why an instance vanished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VanishReason {
    /// TTL elapsed; removed by the periodic sweep.
    Expired,
    /// Auto-vanish-on-read fired after the first payload read.
    Read,
    /// Caller-requested burn.
    Explicit,
    /// Validation or security failure on a received envelope.
    SecurityFailure,
    /// Process shutdown.
    Shutdown,
}

impl std::fmt::Display for VanishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::Read => write!(f, "read"),
            Self::Explicit => write!(f, "explicit"),
            Self::SecurityFailure => write!(f, "security-failure"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Runtime lifecycle record for one instance.
///
/// Owned exclusively by the lifecycle manager. Never persisted: a
/// process restart starts with zero materialized instances.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializationRecord {
    /// Opaque instance handle.
    pub instance_id: InstanceId,
    /// The envelope this record tracks.
    pub envelope_id: EnvelopeId,
    /// Current lifecycle state.
    pub state: LifecycleState,
    /// When the instance became materialized (ms since epoch).
    pub materialized_at_ms: TimestampMs,
    /// Absolute deadline after which the sweep vanishes the instance.
    pub vanish_deadline_ms: TimestampMs,
    /// Destruction method applied at vanish time.
    pub vanish_method: VanishMethod,
    /// Resource ceilings drawn from the class policy.
    pub constraints: ResourceConstraints,
}

/// Sanitized audit entry for a vanished instance.
///
/// Contains header metadata and the vanish reason only - no payload
/// bytes, no key pointers. Safe to persist across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Envelope id.
    pub envelope_id: EnvelopeId,
    /// Protocol class.
    pub class: ProtocolClass,
    /// Creation timestamp from the header.
    pub created_at_ms: TimestampMs,
    /// When the vanish executed.
    pub vanished_at_ms: TimestampMs,
    /// Destruction method used.
    pub method: VanishMethod,
    /// Why the instance vanished.
    pub reason: VanishReason,
}
