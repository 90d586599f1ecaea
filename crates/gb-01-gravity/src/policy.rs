//! # Gravity Policy
//!
//! Maps energy to the effective multiplier `G_eff ∈ (0, 1]` and derives
//! TTL and sync-interval scaling from it. Despite the name this is a
//! plain bounded control function: exponential decay with a hard floor,
//! monotonically decreasing in energy, continuous, and never exactly
//! zero.

use serde::{Deserialize, Serialize};

use crate::cache::GravityCache;
use crate::energy::{compute_energy, EnergySignals};

/// Tunable constants for the gravity control function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityConfig {
    /// Energy at which gravity decays to `1/e`.
    pub e_reference: f64,
    /// Hard lower bound on gravity; avoids division by zero downstream.
    pub gravity_floor: f64,
    /// Below this gravity the system is considered saturated and every
    /// new envelope gets the minimum TTL.
    pub quantum_threshold: f64,
    /// Minimum adjusted TTL regardless of gravity.
    pub min_ttl_ms: u64,
    /// Minimum sync interval regardless of gravity.
    pub min_sync_ms: u64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            e_reference: 10.0,
            gravity_floor: 1e-6,
            quantum_threshold: 1e-4,
            min_ttl_ms: 100,
            min_sync_ms: 250,
        }
    }
}

/// Energy-to-gravity policy with a bounded memoization cache.
///
/// Evaluation is pure; the cache only avoids recomputing `exp` under
/// load and is cleared every scheduling tick via [`GravityPolicy::tick`].
#[derive(Debug)]
pub struct GravityPolicy {
    config: GravityConfig,
    cache: GravityCache,
}

impl GravityPolicy {
    /// Creates a policy with the given configuration.
    pub fn new(config: GravityConfig) -> Self {
        Self {
            config,
            cache: GravityCache::new(),
        }
    }

    /// Creates a policy with default constants.
    pub fn with_defaults() -> Self {
        Self::new(GravityConfig::default())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    /// Computes `G_eff = exp(-energy / e_reference)`, clamped into
    /// `[gravity_floor, 1.0]`.
    ///
    /// Monotonically decreasing in energy. Negative or non-finite
    /// energies are treated as zero (full gravity).
    pub fn effective_gravity(&self, energy: f64) -> f64 {
        let energy = if energy.is_finite() { energy.max(0.0) } else { 0.0 };

        let bucket = self.quantize(energy);
        if let Some(cached) = self.cache.get(bucket) {
            return cached;
        }

        let gravity = (-energy / self.config.e_reference)
            .exp()
            .clamp(self.config.gravity_floor, 1.0);
        self.cache.insert(bucket, gravity);
        gravity
    }

    /// Convenience: energy model then gravity in one call.
    pub fn gravity_for(&self, signals: &EnergySignals) -> f64 {
        self.effective_gravity(compute_energy(signals))
    }

    /// TTL scales linearly with gravity.
    pub fn ttl_scaling(&self, g_eff: f64) -> f64 {
        g_eff
    }

    /// True once gravity has collapsed below the saturation threshold.
    pub fn is_quantum_mode(&self, g_eff: f64) -> bool {
        g_eff < self.config.quantum_threshold
    }

    /// Scales a base TTL by gravity, never dropping below `min_ttl_ms`.
    pub fn adjusted_ttl(&self, base_ttl_ms: u64, g_eff: f64, min_ttl_ms: u64) -> u64 {
        let floor = min_ttl_ms.max(1);
        let scaled = (base_ttl_ms as f64 * self.ttl_scaling(g_eff)).round() as u64;
        scaled.max(floor)
    }

    /// Derives the sync interval: `round(base_ms / max(g_eff, floor))`,
    /// never dropping below `min_sync_ms`.
    pub fn sync_interval(&self, base_ms: u64, g_eff: f64) -> u64 {
        let divisor = g_eff.max(self.config.gravity_floor);
        let scaled = (base_ms as f64 / divisor).round() as u64;
        scaled.max(self.config.min_sync_ms)
    }

    /// Scheduling tick: drops all memoized buckets so cached gravity
    /// never outlives one tick.
    pub fn tick(&self) {
        self.cache.clear();
    }

    /// Number of memoized buckets (test hook).
    pub fn cached_buckets(&self) -> usize {
        self.cache.len()
    }

    fn quantize(&self, energy: f64) -> u64 {
        let width = self.config.e_reference / 64.0;
        (energy / width).floor() as u64
    }
}

impl Default for GravityPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}
