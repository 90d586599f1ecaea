//! Gravity-driven TTL scenarios across the factory and validator.

#[cfg(test)]
mod tests {
    use gb_01_gravity::{compute_energy, EnergySignals};
    use gb_02_envelope::{BuildOptions, EnvelopeValidator};
    use shared_types::{fields, Destination, PeerId, ProtocolClass};

    use crate::integration::TestNode;

    /// Signals hostile enough to collapse gravity below the quantum
    /// threshold (energy far beyond the decay reference).
    fn saturated_signals() -> EnergySignals {
        EnergySignals {
            packets_per_second: 1_000_000.0,
            cpu_load: 1.0,
            battery_drain: 1.0,
            threat_score: 1.0,
            active_connections: 500,
            memory_pressure: 1.0,
        }
    }

    #[test]
    fn test_whisper_at_zero_energy_keeps_class_default_ttl() {
        let node = TestNode::new();
        let validator = EnvelopeValidator::new();

        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("src"),
            Destination::Peer(PeerId::new("dst")),
            vec![0u8; 900],
            &EnergySignals::idle(),
            BuildOptions::default(),
        );

        // energy = 0 → G_eff ≈ 1 → TTL stays at the 30s class default.
        assert_eq!(envelope.header.ttl_ms, 30_000);
        assert_eq!(validator.validate(&envelope), Ok(()));
    }

    #[test]
    fn test_saturated_system_enters_quantum_mode_with_min_ttl() {
        let node = TestNode::new();
        let signals = saturated_signals();

        let g_eff = node.gravity.gravity_for(&signals);
        assert!(g_eff < 1e-4, "gravity {g_eff} not collapsed");
        assert!(node.gravity.is_quantum_mode(g_eff));

        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("src"),
            Destination::Peer(PeerId::new("dst")),
            vec![0u8; 900],
            &signals,
            BuildOptions::default(),
        );
        assert_eq!(envelope.header.ttl_ms, 100);
    }

    #[test]
    fn test_build_validate_round_trip_for_every_class() {
        let node = TestNode::new();
        let validator = EnvelopeValidator::new();

        for class in ProtocolClass::ALL {
            let extra_fields = match class {
                ProtocolClass::Whisper => vec![],
                ProtocolClass::Bridge => vec![(fields::CHANNEL.to_string(), b"ops".to_vec())],
                ProtocolClass::Mesh => vec![(fields::ROUTE_HINT.to_string(), b"relay".to_vec())],
                ProtocolClass::Tunnel => vec![(fields::STREAM_ID.to_string(), b"s-9".to_vec())],
            };
            let envelope = node.factory.build(
                class,
                PeerId::new("src"),
                Destination::Peer(PeerId::new("dst")),
                vec![0u8; 600],
                &EnergySignals::idle(),
                BuildOptions {
                    extra_fields,
                    ..BuildOptions::default()
                },
            );

            assert_eq!(validator.validate(&envelope), Ok(()), "{class} rejected");
            assert_eq!(envelope.header.ttl_ms, class.policy().default_ttl_ms);
        }
    }

    #[test]
    fn test_moderate_load_shortens_but_does_not_floor_ttl() {
        let node = TestNode::new();
        let signals = EnergySignals {
            cpu_load: 0.8,
            threat_score: 0.6,
            memory_pressure: 0.5,
            ..EnergySignals::idle()
        };

        let energy = compute_energy(&signals);
        assert!(energy > 0.0 && energy < 1.0);

        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("src"),
            Destination::Peer(PeerId::new("dst")),
            b"load test".to_vec(),
            &signals,
            BuildOptions::default(),
        );

        assert!(envelope.header.ttl_ms < 30_000);
        assert!(envelope.header.ttl_ms > 100);
    }

    #[test]
    fn test_sync_interval_inverse_to_ttl_scaling() {
        let node = TestNode::new();

        let calm = node.gravity.effective_gravity(0.0);
        let loaded = node.gravity.effective_gravity(20.0);

        // TTL shrinks with gravity; the sync interval stretches.
        assert!(
            node.gravity.adjusted_ttl(30_000, loaded, 100)
                < node.gravity.adjusted_ttl(30_000, calm, 100)
        );
        assert!(
            node.gravity.sync_interval(1_000, loaded) > node.gravity.sync_interval(1_000, calm)
        );
    }
}
