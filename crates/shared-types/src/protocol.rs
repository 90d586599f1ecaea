//! # Protocol Classes and Security Tiers
//!
//! The closed enumeration of envelope categories and the fixed policy
//! table attached to each. These values are wire-compatible constants:
//! changing any of them breaks interoperability with deployed peers.

use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since UNIX epoch.
pub type TimestampMs = u64;

/// Ordered classification of the minimum acceptable cryptographic
/// strength for a protocol class.
///
/// Ordering is significant: `Vulnerable < Resistant < Safe`. A declared
/// tier below the class minimum fails validation; it is never silently
/// downgraded or upgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecurityTier {
    /// Known-weak parameters. Accepted only where a class explicitly
    /// allows it (no shipped class does).
    Vulnerable,
    /// Resistant to passive adversaries.
    Resistant,
    /// Full strength: authenticated encryption plus signature coverage.
    Safe,
}

impl std::fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vulnerable => write!(f, "VULNERABLE"),
            Self::Resistant => write!(f, "RESISTANT"),
            Self::Safe => write!(f, "SAFE"),
        }
    }
}

/// The closed set of envelope categories.
///
/// Each class carries a fixed size/TTL/security-tier policy, looked up
/// through [`ProtocolClass::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolClass {
    /// Smallest, shortest-lived class for direct one-shot messages.
    Whisper,
    /// Point-to-point conversational messages.
    Bridge,
    /// Multi-hop relayed messages carrying routing hints.
    Mesh,
    /// Long-lived streaming segments.
    Tunnel,
}

impl ProtocolClass {
    /// All classes, in policy-table order.
    pub const ALL: [ProtocolClass; 4] = [
        ProtocolClass::Whisper,
        ProtocolClass::Bridge,
        ProtocolClass::Mesh,
        ProtocolClass::Tunnel,
    ];

    /// Returns the immutable policy for this class.
    #[must_use]
    pub const fn policy(&self) -> &'static ClassPolicy {
        match self {
            Self::Whisper => &WHISPER_POLICY,
            Self::Bridge => &BRIDGE_POLICY,
            Self::Mesh => &MESH_POLICY,
            Self::Tunnel => &TUNNEL_POLICY,
        }
    }
}

impl std::fmt::Display for ProtocolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whisper => write!(f, "WHISPER"),
            Self::Bridge => write!(f, "BRIDGE"),
            Self::Mesh => write!(f, "MESH"),
            Self::Tunnel => write!(f, "TUNNEL"),
        }
    }
}

/// Payload field names, namespaced to avoid stringly-typed call sites.
pub mod fields {
    /// The encrypted message body. Required by every class.
    pub const BODY: &str = "body";
    /// Logical channel name. Required by BRIDGE.
    pub const CHANNEL: &str = "channel";
    /// Preferred relay path hint. Required by MESH.
    pub const ROUTE_HINT: &str = "route_hint";
    /// Stream segment identifier. Required by TUNNEL.
    pub const STREAM_ID: &str = "stream_id";
}

/// Per-instance resource ceilings, drawn from the class policy at
/// materialization time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceConstraints {
    /// Maximum tolerated delivery latency.
    pub max_latency_ms: u64,
    /// Maximum sustained bandwidth while materialized.
    pub max_bandwidth_bps: u64,
    /// Maximum resident memory for payload plus bookkeeping.
    pub max_memory_bytes: u64,
    /// Maximum CPU share in `[0, 1]`.
    pub max_cpu_share: f64,
}

/// Immutable policy for one protocol class.
#[derive(Debug, Clone, Copy)]
pub struct ClassPolicy {
    /// Maximum serialized envelope size in bytes.
    pub max_payload_bytes: usize,
    /// Hard ceiling on the header TTL.
    pub max_ttl_ms: u64,
    /// TTL applied when the caller supplies none.
    pub default_ttl_ms: u64,
    /// Minimum acceptable declared security tier.
    pub min_tier: SecurityTier,
    /// Payload fields that must be present after unwrapping.
    pub required_fields: &'static [&'static str],
    /// Runtime resource ceilings for materialized instances.
    pub constraints: ResourceConstraints,
}

const WHISPER_POLICY: ClassPolicy = ClassPolicy {
    max_payload_bytes: 1_024,
    max_ttl_ms: 30_000,
    default_ttl_ms: 30_000,
    min_tier: SecurityTier::Resistant,
    required_fields: &[fields::BODY],
    constraints: ResourceConstraints {
        max_latency_ms: 500,
        max_bandwidth_bps: 64_000,
        max_memory_bytes: 65_536,
        max_cpu_share: 0.10,
    },
};

const BRIDGE_POLICY: ClassPolicy = ClassPolicy {
    max_payload_bytes: 8_192,
    max_ttl_ms: 300_000,
    default_ttl_ms: 300_000,
    min_tier: SecurityTier::Safe,
    required_fields: &[fields::BODY, fields::CHANNEL],
    constraints: ResourceConstraints {
        max_latency_ms: 2_000,
        max_bandwidth_bps: 256_000,
        max_memory_bytes: 262_144,
        max_cpu_share: 0.25,
    },
};

const MESH_POLICY: ClassPolicy = ClassPolicy {
    max_payload_bytes: 16_384,
    max_ttl_ms: 600_000,
    default_ttl_ms: 600_000,
    min_tier: SecurityTier::Safe,
    required_fields: &[fields::BODY, fields::ROUTE_HINT],
    constraints: ResourceConstraints {
        max_latency_ms: 5_000,
        max_bandwidth_bps: 512_000,
        max_memory_bytes: 524_288,
        max_cpu_share: 0.35,
    },
};

const TUNNEL_POLICY: ClassPolicy = ClassPolicy {
    max_payload_bytes: 32_768,
    max_ttl_ms: 1_800_000,
    default_ttl_ms: 1_800_000,
    min_tier: SecurityTier::Safe,
    required_fields: &[fields::BODY, fields::STREAM_ID],
    constraints: ResourceConstraints {
        max_latency_ms: 10_000,
        max_bandwidth_bps: 1_048_576,
        max_memory_bytes: 1_048_576,
        max_cpu_share: 0.50,
    },
};
