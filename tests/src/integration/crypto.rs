//! Cipher-provider capability driven through the envelope pipeline:
//! payload bytes are ciphertext, key material stays behind `KeyRef`s,
//! and provider failures surface unchanged.

#[cfg(test)]
mod tests {
    use gb_01_gravity::EnergySignals;
    use gb_02_envelope::BuildOptions;
    use gb_03_lifecycle::wire;
    use shared_crypto::{compute_mac, verify_mac, SoftwareCipherProvider};
    use shared_types::{
        fields, AuthMaterial, CipherError, CipherProvider, Destination, PeerId, ProtocolClass,
        VanishReason,
    };

    use crate::integration::TestNode;

    #[test]
    fn test_encrypted_payload_round_trip_through_envelope() {
        let provider = SoftwareCipherProvider::new();
        let key = provider.keyring().generate_symmetric("session-alice-bob");
        let node = TestNode::new();

        let plaintext = b"the bridge is watched";
        let ciphertext = provider.encrypt(plaintext, &key).unwrap();

        let mut envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            ciphertext,
            &EnergySignals::idle(),
            BuildOptions::default(),
        );
        envelope.security = envelope.security.clone().with_key_ref(key.clone());

        // Over the wire and back.
        let bytes = wire::encode(&envelope).unwrap();
        let id = node.lifecycle.admit(&bytes).unwrap();

        let recovered = node
            .lifecycle
            .with_payload(id, |payload| {
                let body = payload.get(fields::BODY).unwrap();
                provider.decrypt(body, &key)
            })
            .unwrap()
            .unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_vanish_then_key_delete_leaves_nothing_recoverable() {
        let provider = SoftwareCipherProvider::new();
        let key = provider.keyring().generate_symmetric("ephemeral");
        let node = TestNode::new();

        let ciphertext = provider.encrypt(b"one-shot", &key).unwrap();
        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            ciphertext.clone(),
            &EnergySignals::idle(),
            BuildOptions::default(),
        );
        let id = node.lifecycle.materialize(envelope).unwrap();

        node.lifecycle.vanish(id, VanishReason::Explicit);
        provider.keyring().delete(&key);

        // The payload is gone from the live table and the key pointer
        // no longer resolves: the ciphertext alone is all that remains.
        assert!(node.lifecycle.with_payload(id, |_| ()).is_err());
        assert!(matches!(
            provider.decrypt(&ciphertext, &key),
            Err(CipherError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_provider_auth_failure_surfaces_unchanged() {
        let provider = SoftwareCipherProvider::new();
        let key_a = provider.keyring().generate_symmetric("a");
        let key_b = provider.keyring().generate_symmetric("b");

        let ciphertext = provider.encrypt(b"for key a only", &key_a).unwrap();
        // Wrong key: the AEAD failure is reported as-is, never retried.
        assert_eq!(
            provider.decrypt(&ciphertext, &key_b),
            Err(CipherError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_auth_material_binds_header_bytes() {
        let node = TestNode::new();
        let secret = b"pairwise-auth-secret";

        let mut envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            b"signed".to_vec(),
            &EnergySignals::idle(),
            BuildOptions::default(),
        );

        let header_bytes = serde_json::to_vec(&envelope.header).unwrap();
        envelope.security.auth = Some(AuthMaterial {
            mac: compute_mac(&header_bytes, secret),
            signer: PeerId::new("alice"),
            signed_at_ms: envelope.header.created_at_ms,
        });

        // Receiver recomputes over the same header bytes.
        let auth = envelope.security.auth.as_ref().unwrap();
        assert!(verify_mac(&header_bytes, &auth.mac, secret));

        // A forged header no longer verifies.
        let mut forged = envelope.header.clone();
        forged.ttl_ms += 1;
        let forged_bytes = serde_json::to_vec(&forged).unwrap();
        assert!(!verify_mac(&forged_bytes, &auth.mac, secret));
    }

    #[test]
    fn test_signing_key_covers_envelope_id() {
        let provider = SoftwareCipherProvider::new();
        let identity = provider.keyring().generate_signing("alice-identity");
        let node = TestNode::new();

        let envelope = node.factory.build(
            ProtocolClass::Whisper,
            PeerId::new("alice"),
            Destination::Peer(PeerId::new("bob")),
            b"attributable".to_vec(),
            &EnergySignals::idle(),
            BuildOptions::default(),
        );

        let signature = provider
            .sign(envelope.header.id.as_str().as_bytes(), &identity)
            .unwrap();
        assert!(provider
            .verify(envelope.header.id.as_str().as_bytes(), &signature, &identity)
            .is_ok());
        assert!(provider
            .verify(b"some other envelope", &signature, &identity)
            .is_err());
    }
}
