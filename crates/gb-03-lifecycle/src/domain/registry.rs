//! # Live-Instance Registry
//!
//! The single owned table of materialized envelope instances plus the
//! bounded, sanitized vanish history. Pure data structure: all locking
//! lives in the service layer, which is the only component allowed to
//! mutate this table.
//!
//! ## Invariants
//!
//! - One live instance per envelope id: a duplicate delivery resolves
//!   to the existing instance instead of materializing twice.
//! - `take()` is the only removal path, so whoever holds the taken
//!   instance is the sole executor of its vanish strategy.
//! - History never holds payload bytes or key pointers, and is bounded
//!   to the configured capacity (oldest entries dropped first).

use std::collections::{HashMap, VecDeque};

use shared_types::{
    Envelope, EnvelopeId, HistoryRecord, InstanceId, LifecycleState, MaterializationRecord,
    TimestampMs,
};

/// Default bound on retained history records.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// One materialized instance: record plus the owned envelope.
#[derive(Debug)]
pub struct LiveInstance {
    /// Lifecycle bookkeeping.
    pub record: MaterializationRecord,
    /// The envelope itself, exclusively owned here until vanish.
    pub envelope: Envelope,
}

/// Owned table of live instances and bounded vanish history.
#[derive(Debug)]
pub struct LiveRegistry {
    live: HashMap<InstanceId, LiveInstance>,
    by_envelope: HashMap<EnvelopeId, InstanceId>,
    history: VecDeque<HistoryRecord>,
    history_capacity: usize,
}

impl LiveRegistry {
    /// Creates an empty registry with the default history bound.
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates an empty registry with the given history bound.
    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            live: HashMap::new(),
            by_envelope: HashMap::new(),
            history: VecDeque::new(),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true when nothing is materialized.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Inserts a materialized instance.
    ///
    /// If the envelope id is already live (duplicate delivery), the
    /// existing instance id is returned and the duplicate is purged
    /// and discarded.
    pub fn insert(&mut self, mut instance: LiveInstance) -> InstanceId {
        let envelope_id = instance.envelope.header.id.clone();
        if let Some(existing) = self.by_envelope.get(&envelope_id) {
            instance.envelope.purge();
            return *existing;
        }
        let id = instance.record.instance_id;
        self.by_envelope.insert(envelope_id, id);
        self.live.insert(id, instance);
        id
    }

    /// Looks up a live instance.
    pub fn get(&self, id: InstanceId) -> Option<&LiveInstance> {
        self.live.get(&id)
    }

    /// Current lifecycle state of an instance id.
    ///
    /// Live instances are MATERIALIZED; anything absent reads as
    /// VANISHED - callers cannot distinguish a vanished instance from
    /// one that never existed.
    pub fn state_of(&self, id: InstanceId) -> LifecycleState {
        match self.live.get(&id) {
            Some(instance) => instance.record.state,
            None => LifecycleState::Vanished,
        }
    }

    /// Resolves the live instance for an envelope id, if any.
    pub fn find_by_envelope(&self, envelope_id: &EnvelopeId) -> Option<InstanceId> {
        self.by_envelope.get(envelope_id).copied()
    }

    /// Removes and returns an instance.
    ///
    /// Exactly-once semantics: concurrent callers racing on the same id
    /// observe at most one `Some`.
    pub fn take(&mut self, id: InstanceId) -> Option<LiveInstance> {
        let instance = self.live.remove(&id)?;
        self.by_envelope.remove(&instance.envelope.header.id);
        Some(instance)
    }

    /// Instance ids whose vanish deadline has passed.
    pub fn expired_ids(&self, now_ms: TimestampMs) -> Vec<InstanceId> {
        self.live
            .values()
            .filter(|instance| now_ms >= instance.record.vanish_deadline_ms)
            .map(|instance| instance.record.instance_id)
            .collect()
    }

    /// All live instance ids.
    pub fn live_ids(&self) -> Vec<InstanceId> {
        self.live.keys().copied().collect()
    }

    /// Appends a sanitized history record, dropping the oldest entry
    /// when at capacity.
    pub fn push_history(&mut self, record: HistoryRecord) {
        if self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    /// Snapshot of the retained history, oldest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.iter().cloned().collect()
    }

    /// Seeds history from a persisted snapshot (restart path). Only the
    /// newest `history_capacity` entries are kept.
    pub fn seed_history(&mut self, records: Vec<HistoryRecord>) {
        for record in records {
            self.push_history(record);
        }
    }
}

impl Default for LiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{
        Destination, EnvelopeFlags, EnvelopeHeader, EnvelopePayload, PayloadBody, PeerId, Priority,
        ProtocolClass, SecurityContext, SecurityTier, VanishMethod, VanishReason,
    };

    fn instance(ttl_ms: u64) -> LiveInstance {
        let header = EnvelopeHeader::new(
            ProtocolClass::Whisper,
            PeerId::new("src"),
            Destination::Peer(PeerId::new("dst")),
            1_000,
            ttl_ms,
            EnvelopeHeader::DEFAULT_MAX_HOPS,
            Priority::Normal,
            EnvelopeFlags::default(),
        );
        let expires = header.expires_at_ms;
        LiveInstance {
            record: MaterializationRecord {
                instance_id: InstanceId::generate(),
                envelope_id: header.id.clone(),
                state: LifecycleState::Materialized,
                materialized_at_ms: 1_000,
                vanish_deadline_ms: expires,
                vanish_method: VanishMethod::SecureWipe,
                constraints: ProtocolClass::Whisper.policy().constraints,
            },
            envelope: Envelope {
                header,
                payload: EnvelopePayload::wrap(ProtocolClass::Whisper, PayloadBody::new()),
                security: SecurityContext::for_tier(SecurityTier::Resistant),
            },
        }
    }

    fn history_record(n: u64) -> HistoryRecord {
        HistoryRecord {
            envelope_id: EnvelopeId::generate(n),
            class: ProtocolClass::Whisper,
            created_at_ms: n,
            vanished_at_ms: n + 1,
            method: VanishMethod::Drop,
            reason: VanishReason::Expired,
        }
    }

    #[test]
    fn test_insert_take_roundtrip() {
        let mut registry = LiveRegistry::new();
        let inst = instance(30_000);
        let id = inst.record.instance_id;

        assert_eq!(registry.insert(inst), id);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.state_of(id), LifecycleState::Materialized);

        assert!(registry.take(id).is_some());
        assert!(registry.take(id).is_none(), "second take must observe absence");
        assert_eq!(registry.state_of(id), LifecycleState::Vanished);
    }

    #[test]
    fn test_duplicate_envelope_resolves_to_existing_instance() {
        let mut registry = LiveRegistry::new();
        let first = instance(30_000);
        let first_id = first.record.instance_id;

        let mut duplicate = instance(30_000);
        duplicate.envelope.header.id = first.envelope.header.id.clone();
        duplicate.record.envelope_id = first.envelope.header.id.clone();

        registry.insert(first);
        assert_eq!(registry.insert(duplicate), first_id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_expired_ids_respect_deadline() {
        let mut registry = LiveRegistry::new();
        let short = instance(50);
        let long = instance(60_000);
        let short_id = short.record.instance_id;

        registry.insert(short);
        registry.insert(long);

        assert!(registry.expired_ids(1_000).is_empty());
        assert_eq!(registry.expired_ids(1_050), vec![short_id]);
        assert_eq!(registry.expired_ids(100_000).len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut registry = LiveRegistry::with_history_capacity(3);
        for n in 0..10 {
            registry.push_history(history_record(n));
        }

        let history = registry.history();
        assert_eq!(history.len(), 3);
        // Oldest dropped first.
        assert_eq!(history[0].created_at_ms, 7);
        assert_eq!(history[2].created_at_ms, 9);
    }

    #[test]
    fn test_take_unindexes_envelope_id() {
        let mut registry = LiveRegistry::new();
        let inst = instance(30_000);
        let id = inst.record.instance_id;
        let envelope_id = inst.envelope.header.id.clone();

        registry.insert(inst);
        assert_eq!(registry.find_by_envelope(&envelope_id), Some(id));

        registry.take(id);
        assert_eq!(registry.find_by_envelope(&envelope_id), None);
    }
}
