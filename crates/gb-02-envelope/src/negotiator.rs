//! # Security Context Negotiator
//!
//! Verifies that an envelope's declared algorithm set is a supported
//! combination before the envelope is allowed to materialize. Mandatory
//! on every receive path, before the payload is unwrapped, and composed
//! after (independently of) the validator's tier check.
//!
//! The allow-lists are closed. An identifier outside them is a
//! non-recoverable security failure for that envelope instance - never
//! a downgrade, never a retry.

use shared_types::{algorithms, AlgorithmKind, SecurityContext, SecurityError};

/// Supported key-exchange algorithms.
const ALLOWED_KEY_EXCHANGE: &[&str] = &[algorithms::X25519, algorithms::P256_ECDH];

/// Supported signature algorithms.
const ALLOWED_SIGNATURE: &[&str] = &[algorithms::ED25519, algorithms::ECDSA_P256];

/// Supported symmetric ciphers.
const ALLOWED_CIPHER: &[&str] = &[algorithms::XCHACHA20_POLY1305, algorithms::AES_256_GCM];

/// Verifier over the closed algorithm allow-lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityContextNegotiator;

impl SecurityContextNegotiator {
    /// Creates a negotiator.
    pub fn new() -> Self {
        Self
    }

    /// Verifies every declared algorithm identifier.
    ///
    /// # Errors
    /// `UnsupportedAlgorithm` naming the first slot whose identifier is
    /// outside its allow-list.
    pub fn verify(&self, context: &SecurityContext) -> Result<(), SecurityError> {
        Self::check(
            AlgorithmKind::KeyExchange,
            &context.key_exchange,
            ALLOWED_KEY_EXCHANGE,
        )?;
        Self::check(AlgorithmKind::Signature, &context.signature, ALLOWED_SIGNATURE)?;
        Self::check(
            AlgorithmKind::SymmetricCipher,
            &context.cipher,
            ALLOWED_CIPHER,
        )?;
        Ok(())
    }

    fn check(
        kind: AlgorithmKind,
        value: &str,
        allowed: &'static [&'static str],
    ) -> Result<(), SecurityError> {
        if allowed.contains(&value) {
            Ok(())
        } else {
            Err(SecurityError::UnsupportedAlgorithm {
                kind,
                value: value.to_string(),
            })
        }
    }
}
