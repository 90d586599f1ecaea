//! # In-Memory Keyring
//!
//! Key material addressed by opaque [`KeyRef`] aliases, the way a
//! platform keystore addresses keys: callers generate, use, and delete
//! keys by alias and never see the bytes. Secret bytes are zeroized on
//! drop and on explicit deletion.

use std::collections::HashMap;

use ed25519_dalek::SigningKey;
use parking_lot::RwLock;
use rand::RngCore;
use shared_types::{CipherError, KeyRef};
use zeroize::Zeroize;

/// Secret key (256-bit) for symmetric encryption.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

enum KeyEntry {
    Symmetric(SecretKey),
    Signing(Box<SigningKey>),
}

/// Alias-addressed key store.
///
/// Thread-safe; all methods take `&self`. Deleting an alias (or
/// dropping the keyring) zeroizes the underlying bytes, so dropping
/// every [`KeyRef`] pointing at an alias makes its material
/// unreachable.
#[derive(Default)]
pub struct Keyring {
    entries: RwLock<HashMap<String, KeyEntry>>,
}

impl Keyring {
    /// Creates an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a symmetric key under a fresh alias.
    pub fn generate_symmetric(&self, alias: impl Into<String>) -> KeyRef {
        let alias = alias.into();
        self.entries
            .write()
            .insert(alias.clone(), KeyEntry::Symmetric(SecretKey::generate()));
        KeyRef::new(alias)
    }

    /// Generates an Ed25519 signing key under a fresh alias.
    pub fn generate_signing(&self, alias: impl Into<String>) -> KeyRef {
        let alias = alias.into();
        let key = SigningKey::generate(&mut rand::rngs::OsRng);
        self.entries
            .write()
            .insert(alias.clone(), KeyEntry::Signing(Box::new(key)));
        KeyRef::new(alias)
    }

    /// Deletes a key, zeroizing its bytes.
    ///
    /// Deleting an unknown alias is a no-op: the guarantee is absence,
    /// not prior presence.
    pub fn delete(&self, key: &KeyRef) {
        self.entries.write().remove(key.as_str());
    }

    /// Lists all live aliases.
    pub fn list(&self) -> Vec<KeyRef> {
        self.entries.read().keys().cloned().map(KeyRef::new).collect()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when no keys are held.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Runs `f` with the symmetric key behind `key`.
    pub(crate) fn with_symmetric<T>(
        &self,
        key: &KeyRef,
        f: impl FnOnce(&SecretKey) -> T,
    ) -> Result<T, CipherError> {
        match self.entries.read().get(key.as_str()) {
            Some(KeyEntry::Symmetric(secret)) => Ok(f(secret)),
            _ => Err(CipherError::UnknownKey(key.as_str().to_string())),
        }
    }

    /// Runs `f` with the signing key behind `key`.
    pub(crate) fn with_signing<T>(
        &self,
        key: &KeyRef,
        f: impl FnOnce(&SigningKey) -> T,
    ) -> Result<T, CipherError> {
        match self.entries.read().get(key.as_str()) {
            Some(KeyEntry::Signing(signing)) => Ok(f(signing)),
            _ => Err(CipherError::UnknownKey(key.as_str().to_string())),
        }
    }
}
