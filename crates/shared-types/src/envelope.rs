//! # Envelope Data Model
//!
//! The transmissible unit: header, protocol-class-tagged payload, and
//! security context. Envelopes are fully independent instances - there
//! is no pooling, and nothing here touches shared state.
//!
//! ## Invariants
//!
//! - `header.expires_at_ms == header.created_at_ms + header.ttl_ms`,
//!   established at construction and re-checked by the validator.
//! - `header.hop_count <= header.max_hops` at all times; `record_hop`
//!   is the only mutation path.
//! - `purge()` zeroizes payload field values and clears key pointers;
//!   after it runs, only header metadata survives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::protocol::{ProtocolClass, TimestampMs};
use crate::security::SecurityContext;

/// Globally unique envelope identifier.
///
/// Format: `{created_at_ms:013x}-{uuid_simple}`. The time prefix keeps
/// ids roughly ordered; the random suffix makes collisions negligible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvelopeId(String);

impl EnvelopeId {
    /// Generates a fresh id with the given creation timestamp.
    pub fn generate(created_at_ms: TimestampMs) -> Self {
        Self(format!("{:013x}-{}", created_at_ms, Uuid::new_v4().simple()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// Creates a peer id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery target: a single peer or the broadcast sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// A specific peer.
    Peer(PeerId),
    /// Every reachable peer.
    Broadcast,
}

impl Destination {
    /// Returns true for the broadcast sentinel.
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Broadcast)
    }
}

/// Delivery priority tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Background traffic.
    Low,
    /// Ordinary messages.
    #[default]
    Normal,
    /// Time-sensitive messages.
    High,
    /// Preempts everything else.
    Critical,
}

/// Behavioral flags carried by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvelopeFlags {
    /// Receiver must acknowledge delivery.
    pub requires_ack: bool,
    /// Envelope is addressed to the broadcast sentinel.
    pub is_broadcast: bool,
    /// Key material must provide perfect forward secrecy.
    pub requires_pfs: bool,
    /// First successful payload read triggers an immediate vanish.
    pub auto_vanish_on_read: bool,
}

/// Identifying metadata for one envelope instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    /// Unique envelope id.
    pub id: EnvelopeId,
    /// Protocol class discriminator.
    pub class: ProtocolClass,
    /// Originating peer.
    pub source: PeerId,
    /// Delivery target.
    pub destination: Destination,
    /// Creation timestamp (ms since epoch).
    pub created_at_ms: TimestampMs,
    /// Time to live in milliseconds.
    pub ttl_ms: u64,
    /// Absolute expiry: always `created_at_ms + ttl_ms`.
    pub expires_at_ms: TimestampMs,
    /// Hops traversed so far.
    pub hop_count: u32,
    /// Hard bound on hops.
    pub max_hops: u32,
    /// Ordered relay path, empty until routed.
    pub route: Vec<PeerId>,
    /// Delivery priority.
    pub priority: Priority,
    /// Behavioral flags.
    pub flags: EnvelopeFlags,
}

impl EnvelopeHeader {
    /// Default hop bound applied when the caller supplies none.
    pub const DEFAULT_MAX_HOPS: u32 = 8;

    /// Creates a header with a fresh id and a consistent expiry.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        class: ProtocolClass,
        source: PeerId,
        destination: Destination,
        created_at_ms: TimestampMs,
        ttl_ms: u64,
        max_hops: u32,
        priority: Priority,
        flags: EnvelopeFlags,
    ) -> Self {
        let is_broadcast = destination.is_broadcast();
        Self {
            id: EnvelopeId::generate(created_at_ms),
            class,
            source,
            destination,
            created_at_ms,
            ttl_ms,
            expires_at_ms: created_at_ms + ttl_ms,
            hop_count: 0,
            max_hops,
            route: Vec::new(),
            priority,
            flags: EnvelopeFlags {
                is_broadcast,
                ..flags
            },
        }
    }

    /// Appends a hop to the route.
    ///
    /// # Errors
    /// Returns the hop bound when it is already reached.
    pub fn record_hop(&mut self, peer: PeerId) -> Result<(), u32> {
        if self.hop_count >= self.max_hops {
            return Err(self.max_hops);
        }
        self.hop_count += 1;
        self.route.push(peer);
        Ok(())
    }

    /// Returns true once the TTL has elapsed.
    pub fn is_expired(&self, now_ms: TimestampMs) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Named payload fields under one protocol-class discriminator.
///
/// Field values are opaque bytes (typically ciphertext); the per-class
/// required-field sets are enforced by the validator, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayloadBody {
    fields: BTreeMap<String, Vec<u8>>,
}

impl PayloadBody {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Vec<u8>) {
        self.fields.insert(name.into(), value);
    }

    /// Returns a field's bytes, if present.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Mutable access to every field value, for wipe strategies.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Vec<u8>> {
        self.fields.values_mut()
    }

    /// Zeroizes every field value, then drops all fields.
    pub fn purge(&mut self) {
        for value in self.fields.values_mut() {
            value.zeroize();
        }
        self.fields.clear();
    }
}

/// Protocol-class-tagged payload union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvelopePayload {
    /// WHISPER payload.
    Whisper(PayloadBody),
    /// BRIDGE payload.
    Bridge(PayloadBody),
    /// MESH payload.
    Mesh(PayloadBody),
    /// TUNNEL payload.
    Tunnel(PayloadBody),
}

impl EnvelopePayload {
    /// Wraps a body under the given class discriminator.
    pub fn wrap(class: ProtocolClass, body: PayloadBody) -> Self {
        match class {
            ProtocolClass::Whisper => Self::Whisper(body),
            ProtocolClass::Bridge => Self::Bridge(body),
            ProtocolClass::Mesh => Self::Mesh(body),
            ProtocolClass::Tunnel => Self::Tunnel(body),
        }
    }

    /// The class this payload is tagged with.
    pub fn class(&self) -> ProtocolClass {
        match self {
            Self::Whisper(_) => ProtocolClass::Whisper,
            Self::Bridge(_) => ProtocolClass::Bridge,
            Self::Mesh(_) => ProtocolClass::Mesh,
            Self::Tunnel(_) => ProtocolClass::Tunnel,
        }
    }

    /// Borrows the inner body.
    pub fn body(&self) -> &PayloadBody {
        match self {
            Self::Whisper(b) | Self::Bridge(b) | Self::Mesh(b) | Self::Tunnel(b) => b,
        }
    }

    /// Mutably borrows the inner body.
    pub fn body_mut(&mut self) -> &mut PayloadBody {
        match self {
            Self::Whisper(b) | Self::Bridge(b) | Self::Mesh(b) | Self::Tunnel(b) => b,
        }
    }

    /// Zeroizes and drops all payload fields.
    pub fn purge(&mut self) {
        self.body_mut().purge();
    }
}

/// The unit that is actually transmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Identifying metadata.
    pub header: EnvelopeHeader,
    /// Protocol-class-tagged payload.
    pub payload: EnvelopePayload,
    /// Declared cryptographic context.
    pub security: SecurityContext,
}

impl Envelope {
    /// Purges payload fields and security key material.
    ///
    /// After this call the envelope carries only header metadata; the
    /// payload and key pointers are unrecoverable.
    pub fn purge(&mut self) {
        self.payload.purge();
        self.security.purge();
    }
}
