//! # Security Context
//!
//! The declared cryptographic algorithm set and key-material pointers
//! for one envelope. Key bytes never appear here - only opaque
//! [`KeyRef`] identifiers resolved by the cipher provider.
//!
//! The declared tier must satisfy the protocol class's minimum tier;
//! the validator enforces it and the negotiator checks the algorithm
//! identifiers against its closed allow-lists. Neither ever downgrades
//! a declaration.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::envelope::PeerId;
use crate::protocol::{SecurityTier, TimestampMs};

/// Well-known algorithm identifiers.
///
/// Identifiers are lowercase strings on the wire; these constants keep
/// call sites and allow-lists in agreement.
pub mod algorithms {
    /// X25519 Diffie-Hellman key exchange.
    pub const X25519: &str = "x25519";
    /// NIST P-256 ECDH key exchange.
    pub const P256_ECDH: &str = "p256-ecdh";
    /// Ed25519 signatures.
    pub const ED25519: &str = "ed25519";
    /// ECDSA over P-256.
    pub const ECDSA_P256: &str = "ecdsa-p256";
    /// XChaCha20-Poly1305 AEAD.
    pub const XCHACHA20_POLY1305: &str = "xchacha20-poly1305";
    /// AES-256-GCM AEAD.
    pub const AES_256_GCM: &str = "aes-256-gcm";
    /// SHA-256 hashing.
    pub const SHA256: &str = "sha-256";
    /// HMAC-SHA256 message authentication.
    pub const HMAC_SHA256: &str = "hmac-sha256";
}

/// The kind of algorithm slot an identifier fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Key-exchange slot.
    KeyExchange,
    /// Signature slot.
    Signature,
    /// Symmetric-cipher slot.
    SymmetricCipher,
    /// Hash slot.
    Hash,
    /// MAC slot.
    Mac,
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyExchange => write!(f, "key-exchange"),
            Self::Signature => write!(f, "signature"),
            Self::SymmetricCipher => write!(f, "symmetric-cipher"),
            Self::Hash => write!(f, "hash"),
            Self::Mac => write!(f, "mac"),
        }
    }
}

/// Opaque pointer to key material held by the cipher provider.
///
/// Only the provider can resolve a `KeyRef` to bytes. Dropping every
/// `KeyRef` (via [`SecurityContext::purge`]) makes the material
/// unreachable from this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRef(String);

impl KeyRef {
    /// Wraps a provider-issued key identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authentication material attached by the sender.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthMaterial {
    /// MAC or signature bytes over the serialized header + payload.
    #[serde_as(as = "Bytes")]
    pub mac: [u8; 64],
    /// Peer that produced the MAC.
    pub signer: PeerId,
    /// When the MAC was produced (ms since epoch).
    pub signed_at_ms: TimestampMs,
}

/// Declared cryptographic context for one envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityContext {
    /// Key-exchange algorithm identifier.
    pub key_exchange: String,
    /// Signature algorithm identifier.
    pub signature: String,
    /// Symmetric-cipher algorithm identifier.
    pub cipher: String,
    /// Hash algorithm identifier.
    pub hash: String,
    /// MAC algorithm identifier.
    pub mac: String,
    /// Opaque key-material pointers. Never raw bytes.
    pub key_refs: Vec<KeyRef>,
    /// Sender authentication material, if attached.
    pub auth: Option<AuthMaterial>,
    /// Declared security tier.
    pub tier: SecurityTier,
}

impl SecurityContext {
    /// Creates a context at the given tier with the default supported
    /// algorithm set.
    pub fn for_tier(tier: SecurityTier) -> Self {
        Self {
            key_exchange: algorithms::X25519.to_string(),
            signature: algorithms::ED25519.to_string(),
            cipher: algorithms::XCHACHA20_POLY1305.to_string(),
            hash: algorithms::SHA256.to_string(),
            mac: algorithms::HMAC_SHA256.to_string(),
            key_refs: Vec::new(),
            auth: None,
            tier,
        }
    }

    /// Attaches a key pointer.
    pub fn with_key_ref(mut self, key_ref: KeyRef) -> Self {
        self.key_refs.push(key_ref);
        self
    }

    /// Drops all key pointers and authentication material.
    ///
    /// The declared algorithm identifiers and tier are retained - they
    /// are metadata, not secrets.
    pub fn purge(&mut self) {
        self.key_refs.clear();
        self.auth = None;
    }
}
