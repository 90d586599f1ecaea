//! # Software Cipher Provider
//!
//! Implements the [`CipherProvider`] capability in pure software:
//! XChaCha20-Poly1305 for AEAD, Ed25519 for signatures. Used when no
//! hardware-backed provider is present.
//!
//! ## Wire Format
//!
//! `encrypt` prepends the 24-byte XChaCha20 nonce to the ciphertext;
//! `decrypt` splits it back off. Anything shorter than a nonce is
//! malformed input, not an authentication failure.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use ed25519_dalek::{Signature, Signer, Verifier};
use rand::RngCore;
use shared_types::{CipherError, CipherProvider, KeyRef};

use crate::keyring::Keyring;

/// XChaCha20 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Ed25519 signature length in bytes.
const SIGNATURE_LEN: usize = 64;

/// Software implementation of the cipher-provider capability.
///
/// Owns a [`Keyring`]; all key material stays inside it.
pub struct SoftwareCipherProvider {
    keyring: Keyring,
}

impl SoftwareCipherProvider {
    /// Creates a provider with an empty keyring.
    pub fn new() -> Self {
        Self {
            keyring: Keyring::new(),
        }
    }

    /// Access to the underlying keyring for key management.
    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }
}

impl Default for SoftwareCipherProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherProvider for SoftwareCipherProvider {
    fn encrypt(&self, plaintext: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError> {
        self.keyring.with_symmetric(key, |secret| {
            let cipher = XChaCha20Poly1305::new(secret.as_bytes().into());
            let mut nonce = [0u8; NONCE_LEN];
            rand::thread_rng().fill_bytes(&mut nonce);

            let ciphertext = cipher
                .encrypt(XNonce::from_slice(&nonce), plaintext)
                .map_err(|e| CipherError::EncryptFailed(e.to_string()))?;

            let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
            out.extend_from_slice(&nonce);
            out.extend_from_slice(&ciphertext);
            Ok(out)
        })?
    }

    fn decrypt(&self, ciphertext: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(CipherError::MalformedInput);
        }
        let (nonce, body) = ciphertext.split_at(NONCE_LEN);

        self.keyring.with_symmetric(key, |secret| {
            let cipher = XChaCha20Poly1305::new(secret.as_bytes().into());
            cipher
                .decrypt(XNonce::from_slice(nonce), body)
                .map_err(|_| CipherError::AuthenticationFailed)
        })?
    }

    fn sign(&self, data: &[u8], key: &KeyRef) -> Result<Vec<u8>, CipherError> {
        self.keyring
            .with_signing(key, |signing| signing.sign(data).to_bytes().to_vec())
    }

    fn verify(&self, data: &[u8], signature: &[u8], key: &KeyRef) -> Result<(), CipherError> {
        let bytes: [u8; SIGNATURE_LEN] = signature
            .try_into()
            .map_err(|_| CipherError::MalformedInput)?;
        let signature = Signature::from_bytes(&bytes);

        self.keyring.with_signing(key, |signing| {
            signing
                .verifying_key()
                .verify(data, &signature)
                .map_err(|_| CipherError::SignatureInvalid)
        })?
    }
}
