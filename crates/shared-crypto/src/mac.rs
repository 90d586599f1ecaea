//! HMAC-SHA256 helpers for envelope authentication material.
//!
//! The auth field on a security context is a fixed 64-byte slot; the
//! 32-byte HMAC occupies the first half, the remainder is zero.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 tag padded into the 64-byte auth slot.
pub fn compute_mac(message: &[u8], shared_secret: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha256::new_from_slice(shared_secret)
        .expect("HMAC accepts keys of any length");
    mac.update(message);
    let tag = mac.finalize().into_bytes();

    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&tag);
    out
}

/// Verifies a 64-byte auth slot produced by [`compute_mac`].
///
/// Constant-time over the tag bytes.
pub fn verify_mac(message: &[u8], auth: &[u8; 64], shared_secret: &[u8]) -> bool {
    let mut mac = match HmacSha256::new_from_slice(shared_secret) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(&auth[..32]).is_ok()
}
