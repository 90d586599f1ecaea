//! End-to-end envelope pipeline:
//!
//! ```text
//! [Factory] ──build──→ [Validator] ──→ [Lifecycle.materialize]
//!                                             │ send
//!                                             ▼
//!                                     (transport bytes)
//!                                             │ receive
//!                                             ▼
//!              [Validator + Negotiator + expiry re-check] ──→ read ──→ vanish
//! ```
//!
//! Covers the happy path, hostile receive paths (tamper, downgrade,
//! expiry), duplicate delivery, and the sweep-driven TTL timeout.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gb_01_gravity::EnergySignals;
    use gb_02_envelope::{BuildOptions, EnvelopeValidator};
    use gb_03_lifecycle::{spawn_sweeper, wire, InMemoryTransport, ReceiveError};
    use shared_types::{
        fields, Destination, Envelope, EnvelopeFlags, LifecycleError, LifecycleState, PeerId,
        ProtocolClass, SecurityTier, VanishReason,
    };

    use crate::integration::TestNode;

    fn bridge_envelope(node: &TestNode, body: &[u8]) -> Envelope {
        node.factory.build(
            ProtocolClass::Bridge,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            body.to_vec(),
            &EnergySignals::idle(),
            BuildOptions {
                extra_fields: vec![(fields::CHANNEL.to_string(), b"ops".to_vec())],
                ..BuildOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn test_full_round_trip_between_two_nodes() {
        let alice = TestNode::new();
        let bob = TestNode::new();
        let validator = EnvelopeValidator::new();

        let envelope = bridge_envelope(&alice, b"rendezvous at dawn");
        assert_eq!(validator.validate(&envelope), Ok(()));

        let sender_instance = alice.lifecycle.materialize(envelope).unwrap();

        let (alice_end, mut bob_end) = InMemoryTransport::pair();
        alice
            .lifecycle
            .send(sender_instance, &alice_end)
            .await
            .unwrap();

        let received = bob.lifecycle.receive(&mut bob_end).await.unwrap();
        assert_eq!(bob.lifecycle.state_of(received), LifecycleState::Materialized);

        let body = bob
            .lifecycle
            .with_payload(received, |payload| {
                payload.get(fields::BODY).map(|b| b.to_vec())
            })
            .unwrap();
        assert_eq!(body.as_deref(), Some(b"rendezvous at dawn".as_slice()));

        bob.lifecycle.vanish(received, VanishReason::Explicit);
        assert_eq!(bob.lifecycle.state_of(received), LifecycleState::Vanished);
        assert_eq!(
            bob.lifecycle.with_payload(received, |_| ()),
            Err(LifecycleError::ProtocolNotReady {
                state: LifecycleState::Vanished
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_delivery_resolves_to_one_instance() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        let envelope = bridge_envelope(&alice, b"payload");
        let bytes = wire::encode(&envelope).unwrap();

        let first = bob.lifecycle.admit(&bytes).unwrap();
        let second = bob.lifecycle.admit(&bytes).unwrap();

        assert_eq!(first, second);
        assert_eq!(bob.lifecycle.live_count(), 1);
    }

    #[tokio::test]
    async fn test_downgraded_tier_is_unreadable_and_never_materializes() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        let mut envelope = bridge_envelope(&alice, b"payload");
        envelope.security.tier = SecurityTier::Vulnerable;
        let bytes = wire::encode(&envelope).unwrap();

        assert_eq!(bob.lifecycle.admit(&bytes), Err(ReceiveError::Unreadable));
        assert_eq!(bob.lifecycle.live_count(), 0);
        assert!(bob.lifecycle.history().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_cipher_is_unreadable() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        let mut envelope = bridge_envelope(&alice, b"payload");
        envelope.security.cipher = "rc4".to_string();
        let bytes = wire::encode(&envelope).unwrap();

        assert_eq!(bob.lifecycle.admit(&bytes), Err(ReceiveError::Unreadable));
        assert_eq!(bob.lifecycle.live_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_payload_is_unreadable() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        // Far beyond the BRIDGE ceiling.
        let envelope = bridge_envelope(&alice, &vec![0u8; 9_000]);
        let bytes = wire::encode(&envelope).unwrap();

        assert_eq!(bob.lifecycle.admit(&bytes), Err(ReceiveError::Unreadable));
    }

    #[tokio::test]
    async fn test_expired_envelope_rejected_on_receipt() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        let envelope = alice.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            b"stale".to_vec(),
            &EnergySignals::idle(),
            BuildOptions {
                ttl_ms: Some(30),
                min_ttl_ms: 1,
                ..BuildOptions::default()
            },
        );
        let bytes = wire::encode(&envelope).unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(bob.lifecycle.admit(&bytes), Err(ReceiveError::Unreadable));
        assert_eq!(bob.lifecycle.live_count(), 0);
    }

    #[tokio::test]
    async fn test_sweep_expires_instance_and_blocks_access() {
        let node = TestNode::new();

        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("src"),
            Destination::Peer(PeerId::new("dst")),
            b"short-lived".to_vec(),
            &EnergySignals::idle(),
            BuildOptions {
                ttl_ms: Some(50),
                min_ttl_ms: 1,
                ..BuildOptions::default()
            },
        );
        let id = node.lifecycle.materialize(envelope).unwrap();
        assert_eq!(node.lifecycle.state_of(id), LifecycleState::Materialized);

        let gravity = node.gravity.clone();
        let sweeper = spawn_sweeper(
            node.lifecycle.clone(),
            Duration::from_millis(20),
            move || gravity.tick(),
        );

        // Vanished within one sweep interval after the 50ms TTL.
        tokio::time::sleep(Duration::from_millis(150)).await;
        sweeper.abort();

        assert_eq!(node.lifecycle.state_of(id), LifecycleState::Vanished);
        assert_eq!(
            node.lifecycle.with_payload(id, |_| ()),
            Err(LifecycleError::ProtocolNotReady {
                state: LifecycleState::Vanished
            })
        );
        let history = node.lifecycle.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, VanishReason::Expired);
    }

    #[tokio::test]
    async fn test_auto_vanish_on_read_burns_after_first_access() {
        let alice = TestNode::new();
        let bob = TestNode::new();

        let envelope = alice.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            b"burn after reading".to_vec(),
            &EnergySignals::idle(),
            BuildOptions {
                flags: EnvelopeFlags {
                    auto_vanish_on_read: true,
                    ..EnvelopeFlags::default()
                },
                ..BuildOptions::default()
            },
        );
        let bytes = wire::encode(&envelope).unwrap();

        let id = bob.lifecycle.admit(&bytes).unwrap();
        let len = bob
            .lifecycle
            .with_payload(id, |payload| payload.get(fields::BODY).map_or(0, |b| b.len()))
            .unwrap();
        assert_eq!(len, 18);

        // Second read: the envelope burned itself.
        assert_eq!(
            bob.lifecycle.with_payload(id, |_| ()),
            Err(LifecycleError::ProtocolNotReady {
                state: LifecycleState::Vanished
            })
        );
        assert_eq!(bob.lifecycle.history()[0].reason, VanishReason::Read);
    }

    #[tokio::test]
    async fn test_send_after_vanish_is_not_ready() {
        let node = TestNode::new();
        let envelope = bridge_envelope(&node, b"payload");
        let id = node.lifecycle.materialize(envelope).unwrap();
        node.lifecycle.vanish(id, VanishReason::Explicit);

        let (end, _other) = InMemoryTransport::pair();
        let result = node.lifecycle.send(id, &end).await;
        assert!(result.is_err());
    }
}
