//! # Lifecycle Service
//!
//! Owns the live-instance registry behind a mutex and drives the
//! materialize → vanish state machine. This is the only component that
//! mutates the live table; everything else holds opaque instance ids.
//!
//! ## Concurrency
//!
//! - `materialize`, `vanish`, and `sweep` serialize on the registry
//!   mutex; `take()` under the lock guarantees exactly one vanish
//!   strategy execution per instance no matter how many callers race.
//! - `send`/`receive` are the only await points. The lock is never held
//!   across them: envelope bytes are snapshotted under the lock, then
//!   the transport call runs lock-free.
//! - Cancelling an in-flight send is harmless: registration is atomic
//!   and send mutates nothing, so no instance can be observed in
//!   MATERIALIZING.
//!
//! ## Receive discipline
//!
//! Every receipt is re-validated from scratch (validator, negotiator,
//! expiry) - duplicates and out-of-order deliveries are harmless, and
//! a failure yields only a generic unreadable signal while the precise
//! cause goes to the debug log.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use gb_02_envelope::{EnvelopeValidator, SecurityContextNegotiator};
use shared_types::{
    Envelope, EnvelopeTransport, HistoryRecord, InstanceId, LifecycleError, LifecycleState,
    MaterializationRecord, PayloadBody, SecurityError, TimeSource, VanishMethod, VanishReason,
};

use crate::adapters::history::{HistoryStore, NullHistoryStore};
use crate::domain::{strategy_for, LiveInstance, LiveRegistry};
use crate::errors::{ReceiveError, SendError};
use crate::wire;

/// Tunables for the lifecycle service.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// Period of the expiry sweep.
    pub sweep_interval_ms: u64,
    /// Bound on retained history records.
    pub history_capacity: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 1_000,
            history_capacity: crate::domain::DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// The materialize/vanish state machine over the owned registry.
pub struct LifecycleService {
    registry: Mutex<LiveRegistry>,
    time: std::sync::Arc<dyn TimeSource>,
    validator: EnvelopeValidator,
    negotiator: SecurityContextNegotiator,
    history_store: Box<dyn HistoryStore>,
    config: LifecycleConfig,
}

impl LifecycleService {
    /// Creates a service with no history persistence.
    pub fn new(time: std::sync::Arc<dyn TimeSource>, config: LifecycleConfig) -> Self {
        Self::with_history_store(time, config, Box::new(NullHistoryStore))
    }

    /// Creates a service persisting sanitized history to `store`.
    ///
    /// Only history is loaded back on startup: live instances are never
    /// persisted, so a restart always begins with zero materialized
    /// instances.
    pub fn with_history_store(
        time: std::sync::Arc<dyn TimeSource>,
        config: LifecycleConfig,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        let mut registry = LiveRegistry::with_history_capacity(config.history_capacity);
        match store.load() {
            Ok(records) => registry.seed_history(records),
            Err(e) => warn!(error = %e, "could not load persisted vanish history"),
        }

        Self {
            registry: Mutex::new(registry),
            time,
            validator: EnvelopeValidator::new(),
            negotiator: SecurityContextNegotiator::new(),
            history_store: store,
            config,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Materializes an envelope, making it usable for send/receive.
    ///
    /// All-or-nothing: the record passes through MATERIALIZING only
    /// locally, and on any failure nothing is registered. The declared
    /// algorithm set is verified here - an envelope with an unsupported
    /// set is never allowed to materialize, and its payload is purged
    /// on the spot.
    ///
    /// Duplicate delivery of an already-live envelope id resolves to
    /// the existing instance.
    pub fn materialize(&self, mut envelope: Envelope) -> Result<InstanceId, SecurityError> {
        if let Err(e) = self.negotiator.verify(&envelope.security) {
            debug!(envelope = %envelope.header.id, error = %e, "refusing to materialize");
            envelope.purge();
            return Err(e);
        }

        let now = self.time.now_ms();
        let record = MaterializationRecord {
            instance_id: InstanceId::generate(),
            envelope_id: envelope.header.id.clone(),
            state: LifecycleState::Materializing,
            materialized_at_ms: now,
            vanish_deadline_ms: envelope.header.expires_at_ms,
            vanish_method: VanishMethod::SecureWipe,
            constraints: envelope.header.class.policy().constraints,
        };

        let mut instance = LiveInstance { record, envelope };
        instance.record.state = LifecycleState::Materialized;

        let id = self.registry.lock().insert(instance);
        debug!(instance = %id, "materialized");
        Ok(id)
    }

    /// Vanishes an instance. Idempotent: a second call (or a call on an
    /// id that never existed) is a no-op, not an error.
    ///
    /// Exactly one vanish strategy execution occurs per instance:
    /// removal under the lock decides the winner, then the strategy
    /// runs outside the lock.
    pub fn vanish(&self, id: InstanceId, reason: VanishReason) {
        let taken = self.registry.lock().take(id);
        let Some(mut instance) = taken else {
            debug!(instance = %id, "vanish on absent instance is a no-op");
            return;
        };

        let strategy = strategy_for(instance.record.vanish_method);
        if let Err(e) = strategy.execute(&mut instance.envelope) {
            warn!(instance = %id, error = %e, "vanish strategy failed, instance removed anyway");
        }
        // Logical guarantee regardless of what the strategy did.
        instance.envelope.purge();
        instance.record.state = LifecycleState::Vanished;

        let record = HistoryRecord {
            envelope_id: instance.record.envelope_id.clone(),
            class: instance.envelope.header.class,
            created_at_ms: instance.envelope.header.created_at_ms,
            vanished_at_ms: self.time.now_ms(),
            method: instance.record.vanish_method,
            reason,
        };
        if let Err(e) = self.history_store.append(&record) {
            warn!(error = %e, "could not persist vanish history record");
        }
        self.registry.lock().push_history(record);

        info!(instance = %id, reason = %reason, "vanished");
    }

    /// Vanishes every instance whose deadline has passed. Returns the
    /// number vanished. This is the only fully automatic transition.
    pub fn sweep(&self) -> usize {
        let now = self.time.now_ms();
        let expired = self.registry.lock().expired_ids(now);
        let count = expired.len();
        for id in expired {
            self.vanish(id, VanishReason::Expired);
        }
        count
    }

    /// Serializes and transmits a materialized instance.
    ///
    /// The envelope is re-validated before any byte leaves: there is no
    /// trust-on-send shortcut. A validation or security failure here
    /// force-vanishes the instance.
    pub async fn send(
        &self,
        id: InstanceId,
        transport: &dyn EnvelopeTransport,
    ) -> Result<(), SendError> {
        let bytes = {
            let registry = self.registry.lock();
            let Some(instance) = registry.get(id) else {
                return Err(SendError::NotReady(LifecycleError::ProtocolNotReady {
                    state: LifecycleState::Vanished,
                }));
            };

            let revalidation = self
                .validator
                .validate(&instance.envelope)
                .map_err(|e| e.to_string())
                .and_then(|()| {
                    self.negotiator
                        .verify(&instance.envelope.security)
                        .map_err(|e| e.to_string())
                });
            if let Err(cause) = revalidation {
                drop(registry);
                debug!(instance = %id, %cause, "send-side revalidation failed");
                self.vanish(id, VanishReason::SecurityFailure);
                return Err(SendError::NotReady(LifecycleError::ProtocolNotReady {
                    state: LifecycleState::Vanished,
                }));
            }

            wire::encode(&instance.envelope).map_err(|e| {
                SendError::Transport(shared_types::TransportError::Io(e.to_string()))
            })?
        };

        transport.send(bytes).await?;
        Ok(())
    }

    /// Receives one envelope from the transport and admits it.
    pub async fn receive(
        &self,
        transport: &mut dyn EnvelopeTransport,
    ) -> Result<InstanceId, ReceiveError> {
        let bytes = transport.recv().await?;
        self.admit(&bytes)
    }

    /// Runs the full admission pipeline on received bytes: decode,
    /// validate, negotiate, expiry - then materialize.
    ///
    /// Any failure is reported only as [`ReceiveError::Unreadable`];
    /// if the bytes name an envelope that is already live, that
    /// instance is force-vanished.
    pub fn admit(&self, bytes: &[u8]) -> Result<InstanceId, ReceiveError> {
        let envelope = match wire::decode(bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "received undecodable envelope");
                return Err(ReceiveError::Unreadable);
            }
        };

        let now = self.time.now_ms();
        let failure = if envelope.header.is_expired(now) {
            Some("expired".to_string())
        } else if let Err(e) = self.validator.validate(&envelope) {
            Some(e.to_string())
        } else if let Err(e) = self.negotiator.verify(&envelope.security) {
            Some(e.to_string())
        } else {
            None
        };

        if let Some(cause) = failure {
            debug!(envelope = %envelope.header.id, %cause, "rejecting received envelope");
            let live = self.registry.lock().find_by_envelope(&envelope.header.id);
            if let Some(existing) = live {
                self.vanish(existing, VanishReason::SecurityFailure);
            }
            return Err(ReceiveError::Unreadable);
        }

        self.materialize(envelope)
            .map_err(|_| ReceiveError::Unreadable)
    }

    /// Grants closure-scoped, read-only access to an instance's payload.
    ///
    /// No payload reference escapes the call. When the envelope carries
    /// the auto-vanish-on-read flag, the instance vanishes as soon as
    /// the closure returns.
    pub fn with_payload<T>(
        &self,
        id: InstanceId,
        f: impl FnOnce(&PayloadBody) -> T,
    ) -> Result<T, LifecycleError> {
        let (result, auto_vanish) = {
            let registry = self.registry.lock();
            let Some(instance) = registry.get(id) else {
                return Err(LifecycleError::ProtocolNotReady {
                    state: LifecycleState::Vanished,
                });
            };
            (
                f(instance.envelope.payload.body()),
                instance.envelope.header.flags.auto_vanish_on_read,
            )
        };

        if auto_vanish {
            self.vanish(id, VanishReason::Read);
        }
        Ok(result)
    }

    /// Lifecycle state of an instance id. Absent ids read as VANISHED.
    pub fn state_of(&self, id: InstanceId) -> LifecycleState {
        self.registry.lock().state_of(id)
    }

    /// Number of live instances.
    pub fn live_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Snapshot of the sanitized vanish history, oldest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.registry.lock().history()
    }

    /// Vanishes every live instance (shutdown path).
    pub fn vanish_all(&self) -> usize {
        let ids = self.registry.lock().live_ids();
        let count = ids.len();
        for id in ids {
            self.vanish(id, VanishReason::Shutdown);
        }
        count
    }
}
