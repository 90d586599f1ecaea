//! # Vanish Strategies
//!
//! Destruction of an envelope's payload and key pointers. Vanish is a
//! logical guarantee of inaccessibility: a strategy failure is logged
//! and the instance is removed from the live table regardless. Physical
//! wipe guarantees belong to the hardware memory-wiping collaborator,
//! which may simply be absent.

use shared_types::{CipherError, Envelope, MemoryWiper, VanishMethod};
use tracing::debug;

/// Overwrite patterns applied by the secure wipe, in order. The final
/// zeroize pass comes from `Envelope::purge`.
const WIPE_PATTERNS: [u8; 4] = [0x00, 0xFF, 0x55, 0xAA];

/// One way of destroying an envelope's sensitive material.
pub trait VanishStrategy: Send + Sync {
    /// Strategy name for logs and history.
    fn name(&self) -> &'static str;

    /// Destroys the envelope's payload and key pointers in place.
    ///
    /// # Errors
    /// A failed hardware wipe. The caller still removes the instance:
    /// the software fallback inside `execute` plus the final purge keep
    /// the logical guarantee intact.
    fn execute(&self, envelope: &mut Envelope) -> Result<(), CipherError>;
}

/// Single zeroize pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropStrategy;

impl VanishStrategy for DropStrategy {
    fn name(&self) -> &'static str {
        "drop"
    }

    fn execute(&self, envelope: &mut Envelope) -> Result<(), CipherError> {
        envelope.purge();
        Ok(())
    }
}

/// Multi-pass pattern overwrite before release.
///
/// Tries the hardware wiper first when one is configured; a
/// `HardwareUnavailable` report falls back to the software pattern
/// passes. Either way the payload ends purged.
pub struct SecureWipeStrategy {
    wiper: Option<Box<dyn MemoryWiper>>,
}

impl SecureWipeStrategy {
    /// Software-only secure wipe.
    pub fn new() -> Self {
        Self { wiper: None }
    }

    /// Secure wipe preferring the given hardware wiper.
    pub fn with_wiper(wiper: Box<dyn MemoryWiper>) -> Self {
        Self { wiper: Some(wiper) }
    }

    fn software_passes(envelope: &mut Envelope) {
        for pattern in WIPE_PATTERNS {
            for value in envelope.payload.body_mut().values_mut() {
                value.fill(pattern);
            }
        }
    }
}

impl Default for SecureWipeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl VanishStrategy for SecureWipeStrategy {
    fn name(&self) -> &'static str {
        "secure-wipe"
    }

    fn execute(&self, envelope: &mut Envelope) -> Result<(), CipherError> {
        let mut hardware_result = Ok(());

        if let Some(wiper) = &self.wiper {
            for value in envelope.payload.body_mut().values_mut() {
                if let Err(e) = wiper.wipe(value) {
                    hardware_result = Err(e);
                    break;
                }
            }
        }

        if hardware_result.is_err() {
            debug!("hardware wiper unavailable, using software passes");
        }
        Self::software_passes(envelope);
        envelope.purge();

        hardware_result
    }
}

/// Resolves the strategy for a vanish method tag.
pub fn strategy_for(method: VanishMethod) -> Box<dyn VanishStrategy> {
    match method {
        VanishMethod::SecureWipe => Box::new(SecureWipeStrategy::new()),
        VanishMethod::Drop => Box::new(DropStrategy),
    }
}
