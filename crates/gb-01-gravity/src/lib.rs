//! # Gravity Subsystem
//!
//! Converts load and threat signals into the effective multiplier
//! `G_eff ∈ (0, 1]` that drives envelope TTL scaling and sync-interval
//! scaling.
//!
//! ## Pipeline
//!
//! ```text
//! EnergySignals ──compute_energy──→ energy ──effective_gravity──→ G_eff
//!                                                  │
//!                         ┌────────────────────────┼──────────────────┐
//!                         ↓                        ↓                  ↓
//!                  adjusted_ttl             sync_interval      is_quantum_mode
//! ```
//!
//! ## Guarantees
//!
//! - `effective_gravity` is monotonically decreasing, continuous, and
//!   clamped into `[gravity_floor, 1.0]` - never exactly zero.
//! - `adjusted_ttl` and `sync_interval` respect configurable absolute
//!   floors; no zero or negative duration can escape this crate.
//! - Evaluation is pure and thread-safe; the memoization cache is
//!   bounded and cleared every scheduling tick.

pub mod cache;
pub mod energy;
pub mod policy;

pub use cache::{GravityCache, DEFAULT_CACHE_CAPACITY};
pub use energy::{compute_energy, EnergySignals};
pub use policy::{GravityConfig, GravityPolicy};
