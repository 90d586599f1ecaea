//! # Envelope Factory
//!
//! Builds complete, unvalidated envelopes. The caller passes the result
//! through the validator before transmission and registers it with the
//! lifecycle manager; construction itself never mutates shared state.
//!
//! TTL derivation: `base_ttl` comes from the options or the class
//! default, then scales by the effective gravity for the supplied
//! signal snapshot, floored at `options.min_ttl_ms`.

use std::sync::Arc;

use gb_01_gravity::{EnergySignals, GravityPolicy};
use shared_types::{
    fields, Destination, Envelope, EnvelopeFlags, EnvelopeHeader, EnvelopePayload, PayloadBody,
    PeerId, Priority, ProtocolClass, SecurityContext, SecurityTier, TimeSource,
};
use tracing::debug;

/// Caller-tunable construction options.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// TTL override; the class default applies when `None`.
    pub ttl_ms: Option<u64>,
    /// Absolute TTL floor applied after gravity scaling.
    pub min_ttl_ms: u64,
    /// Tier override. Raised to the class minimum when below it;
    /// construction never declares less than the class demands.
    pub tier: Option<SecurityTier>,
    /// Delivery priority.
    pub priority: Priority,
    /// Hop bound.
    pub max_hops: u32,
    /// Behavioral flags.
    pub flags: EnvelopeFlags,
    /// Additional payload fields beyond the body.
    pub extra_fields: Vec<(String, Vec<u8>)>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ttl_ms: None,
            min_ttl_ms: 100,
            tier: None,
            priority: Priority::Normal,
            max_hops: EnvelopeHeader::DEFAULT_MAX_HOPS,
            flags: EnvelopeFlags::default(),
            extra_fields: Vec::new(),
        }
    }
}

/// Stateless envelope builder.
///
/// Holds the gravity policy and a time source; both are shared,
/// read-only collaborators.
pub struct EnvelopeFactory {
    gravity: Arc<GravityPolicy>,
    time: Arc<dyn TimeSource>,
}

impl EnvelopeFactory {
    /// Creates a factory over the given policy and time source.
    pub fn new(gravity: Arc<GravityPolicy>, time: Arc<dyn TimeSource>) -> Self {
        Self { gravity, time }
    }

    /// Builds one envelope.
    ///
    /// The result is unvalidated; callers pass it through the validator
    /// before transmission.
    pub fn build(
        &self,
        class: ProtocolClass,
        source: PeerId,
        destination: Destination,
        body_bytes: Vec<u8>,
        signals: &EnergySignals,
        options: BuildOptions,
    ) -> Envelope {
        let now = self.time.now_ms();
        let policy = class.policy();

        let base_ttl = options.ttl_ms.unwrap_or(policy.default_ttl_ms);
        let g_eff = self.gravity.gravity_for(signals);
        let ttl_ms = self
            .gravity
            .adjusted_ttl(base_ttl, g_eff, options.min_ttl_ms);

        debug!(
            class = %class,
            g_eff,
            base_ttl_ms = base_ttl,
            ttl_ms,
            quantum = self.gravity.is_quantum_mode(g_eff),
            "building envelope"
        );

        let tier = match options.tier {
            Some(declared) if declared > policy.min_tier => declared,
            _ => policy.min_tier,
        };

        let mut body = PayloadBody::new();
        body.set(fields::BODY, body_bytes);
        for (name, value) in options.extra_fields {
            body.set(name, value);
        }

        Envelope {
            header: EnvelopeHeader::new(
                class,
                source,
                destination,
                now,
                ttl_ms,
                options.max_hops,
                options.priority,
                options.flags,
            ),
            payload: EnvelopePayload::wrap(class, body),
            security: SecurityContext::for_tier(tier),
        }
    }
}
