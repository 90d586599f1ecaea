//! Inbound (driving) port for the lifecycle subsystem.
//!
//! The synchronous lifecycle operations behind one trait, so callers
//! and tests can depend on the seam instead of the concrete service.
//! Send/receive stay on the concrete service: they are the only async
//! operations and are tied to the transport capability.

use shared_types::{
    Envelope, HistoryRecord, InstanceId, LifecycleState, SecurityError, VanishReason,
};

use crate::service::LifecycleService;

/// Primary API for lifecycle consumers.
pub trait LifecycleApi: Send + Sync {
    /// Registers an envelope as MATERIALIZED.
    fn materialize(&self, envelope: Envelope) -> Result<InstanceId, SecurityError>;

    /// Idempotently vanishes an instance.
    fn vanish(&self, id: InstanceId, reason: VanishReason);

    /// State of an instance id; absent ids read as VANISHED.
    fn state_of(&self, id: InstanceId) -> LifecycleState;

    /// Number of live instances.
    fn live_count(&self) -> usize;

    /// Vanishes all expired instances, returning how many.
    fn sweep(&self) -> usize;

    /// Snapshot of the sanitized vanish history.
    fn history(&self) -> Vec<HistoryRecord>;
}

impl LifecycleApi for crate::service::LifecycleService {
    fn materialize(&self, envelope: Envelope) -> Result<InstanceId, SecurityError> {
        LifecycleService::materialize(self, envelope)
    }

    fn vanish(&self, id: InstanceId, reason: VanishReason) {
        LifecycleService::vanish(self, id, reason)
    }

    fn state_of(&self, id: InstanceId) -> LifecycleState {
        LifecycleService::state_of(self, id)
    }

    fn live_count(&self) -> usize {
        LifecycleService::live_count(self)
    }

    fn sweep(&self) -> usize {
        LifecycleService::sweep(self)
    }

    fn history(&self) -> Vec<HistoryRecord> {
        LifecycleService::history(self)
    }
}
