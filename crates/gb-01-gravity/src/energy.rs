//! # Energy Model
//!
//! Converts raw system signals into a bounded non-negative scalar.
//! Pure and side-effect free: callers supply fresh signals, and any
//! caching belongs to the gravity policy, not here.

/// Raw system signals sampled by external collectors.
///
/// Ratio fields are documented as `[0, 1]`; out-of-range values are
/// clamped during computation, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergySignals {
    /// Observed message throughput.
    pub packets_per_second: f64,
    /// CPU load ratio in `[0, 1]`.
    pub cpu_load: f64,
    /// Battery drain ratio in `[0, 1]`.
    pub battery_drain: f64,
    /// Active-threat score in `[0, 1]`, as produced by packet
    /// inspection upstream.
    pub threat_score: f64,
    /// Concurrently open connections.
    pub active_connections: u32,
    /// Memory pressure ratio in `[0, 1]`.
    pub memory_pressure: f64,
}

impl EnergySignals {
    /// A fully idle system: zero energy, maximum gravity.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Throughput weight; packets/s are normalized by [`THROUGHPUT_SCALE`].
const W_THROUGHPUT: f64 = 0.30;
/// CPU load weight.
const W_CPU: f64 = 0.20;
/// Battery drain weight.
const W_BATTERY: f64 = 0.10;
/// Threat-score weight. Threat dominates the ratio inputs: a hostile
/// network shortens envelope lifetimes faster than raw load does.
const W_THREAT: f64 = 0.25;
/// Connection-count weight; counts are normalized by [`CONNECTION_SCALE`].
const W_CONNECTIONS: f64 = 0.05;
/// Memory pressure weight.
const W_MEMORY: f64 = 0.10;

/// Packets/s corresponding to one unit of throughput contribution.
const THROUGHPUT_SCALE: f64 = 1_000.0;
/// Connections corresponding to one unit of connection contribution.
const CONNECTION_SCALE: f64 = 100.0;

/// Computes the energy scalar for one signal sample.
///
/// Non-negative weighted sum. The throughput and connection terms are
/// unbounded above, so energy itself is unbounded; gravity's
/// exponential decay absorbs that.
#[must_use]
pub fn compute_energy(signals: &EnergySignals) -> f64 {
    let ratio = |v: f64| {
        if v.is_finite() {
            v.clamp(0.0, 1.0)
        } else {
            0.0
        }
    };
    let unbounded = |v: f64| {
        if v.is_finite() {
            v.max(0.0)
        } else {
            0.0
        }
    };

    W_THROUGHPUT * unbounded(signals.packets_per_second) / THROUGHPUT_SCALE
        + W_CPU * ratio(signals.cpu_load)
        + W_BATTERY * ratio(signals.battery_drain)
        + W_THREAT * ratio(signals.threat_score)
        + W_CONNECTIONS * f64::from(signals.active_connections) / CONNECTION_SCALE
        + W_MEMORY * ratio(signals.memory_pressure)
}
