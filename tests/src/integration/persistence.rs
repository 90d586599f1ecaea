//! Restart semantics: the sanitized vanish history may persist, live
//! instances must not.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gb_01_gravity::EnergySignals;
    use gb_02_envelope::BuildOptions;
    use gb_03_lifecycle::{JsonFileHistoryStore, LifecycleConfig, LifecycleService};
    use shared_types::{
        Destination, PeerId, ProtocolClass, SystemTimeSource, VanishReason,
    };

    use crate::integration::TestNode;

    #[test]
    fn test_history_survives_restart_but_live_instances_do_not() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("vanish-history.json");
        let time = Arc::new(SystemTimeSource);

        // First process lifetime: one vanished envelope, one still live.
        {
            let node = TestNode::new();
            let service = LifecycleService::with_history_store(
                time.clone(),
                LifecycleConfig::default(),
                Box::new(JsonFileHistoryStore::new(&history_path, 100)),
            );

            let build = |body: &[u8]| {
                node.factory.build(
                    ProtocolClass::Whisper,
                    PeerId::new("src"),
                    Destination::Peer(PeerId::new("dst")),
                    body.to_vec(),
                    &EnergySignals::idle(),
                    BuildOptions::default(),
                )
            };

            let burned = service.materialize(build(b"burned")).unwrap();
            service.materialize(build(b"still live")).unwrap();
            service.vanish(burned, VanishReason::Explicit);

            assert_eq!(service.live_count(), 1);
            assert_eq!(service.history().len(), 1);
        }

        // Second process lifetime over the same history file.
        let restarted = LifecycleService::with_history_store(
            time,
            LifecycleConfig::default(),
            Box::new(JsonFileHistoryStore::new(&history_path, 100)),
        );

        // Auto-vanish-on-restart: zero materialized instances.
        assert_eq!(restarted.live_count(), 0);

        // The sanitized history came back.
        let history = restarted.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, VanishReason::Explicit);
        assert_eq!(history[0].class, ProtocolClass::Whisper);
    }

    #[test]
    fn test_persisted_history_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("vanish-history.json");

        {
            let node = TestNode::new();
            let service = LifecycleService::with_history_store(
                Arc::new(SystemTimeSource),
                LifecycleConfig::default(),
                Box::new(JsonFileHistoryStore::new(&history_path, 100)),
            );
            let envelope = node.factory.build(
                ProtocolClass::Whisper,
                PeerId::new("src"),
                Destination::Peer(PeerId::new("dst")),
                b"super secret payload bytes".to_vec(),
                &EnergySignals::idle(),
                BuildOptions::default(),
            );
            let id = service.materialize(envelope).unwrap();
            service.vanish(id, VanishReason::Explicit);
        }

        let raw = std::fs::read_to_string(&history_path).unwrap();
        assert!(!raw.contains("super secret"));
        assert!(!raw.contains("key_refs"));
    }
}
