//! # Shared Crypto - Software Cipher Provider
//!
//! Pure-software implementation of the `CipherProvider` capability:
//! an alias-addressed zeroizing keyring, XChaCha20-Poly1305 AEAD,
//! Ed25519 signatures, and HMAC-SHA256 helpers for envelope
//! authentication material.
//!
//! ## Security Properties
//!
//! - **Key opacity**: callers hold `KeyRef` aliases only; key bytes
//!   never cross this crate's boundary.
//! - **Zeroization**: deleting an alias (or dropping the keyring)
//!   zeroizes the underlying secret bytes.
//! - **Non-retryable failures**: every error is surfaced unchanged;
//!   nothing here downgrades or retries with weaker parameters.
//!
//! Hardware-backed providers (keystore, HSM) implement the same
//! capability elsewhere; this crate is the fallback used when secure
//! hardware is absent.

pub mod keyring;
pub mod mac;
pub mod provider;

pub use keyring::{Keyring, SecretKey};
pub use mac::{compute_mac, verify_mac};
pub use provider::SoftwareCipherProvider;
