//! # GhostBridge Envelope Node Runtime
//!
//! Entry point wiring the envelope subsystems together:
//!
//! 1. Initialize logging (env-filter over the configured level)
//! 2. Load and validate configuration
//! 3. Construct gravity policy, factory, and lifecycle service
//! 4. Load persisted vanish history (live instances never persist;
//!    every start begins with zero materialized envelopes)
//! 5. Spawn the expiry sweep task (which also expires the gravity
//!    memoization cache each tick)
//! 6. Run a loopback round trip to prove the pipeline end to end
//! 7. Wait for Ctrl+C, then vanish everything and exit

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gb_01_gravity::{EnergySignals, GravityPolicy};
use gb_02_envelope::{BuildOptions, EnvelopeFactory, EnvelopeValidator};
use gb_03_lifecycle::{
    spawn_sweeper, InMemoryTransport, JsonFileHistoryStore, LifecycleConfig, LifecycleService,
    NullHistoryStore,
};
use shared_crypto::SoftwareCipherProvider;
use shared_types::{
    fields, CipherProvider, Destination, PeerId, Priority, ProtocolClass, SystemTimeSource,
};

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging before anything can fail.
    let config = RuntimeConfig::load().context("loading configuration")?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    config.validate().context("validating configuration")?;
    info!(
        sweep_interval_ms = config.sweep_interval_ms,
        history_capacity = config.history_capacity,
        "starting GhostBridge envelope runtime"
    );

    // Shared collaborators.
    let time = Arc::new(SystemTimeSource);
    let gravity = Arc::new(GravityPolicy::new(config.gravity));
    let factory = EnvelopeFactory::new(gravity.clone(), time.clone());
    let validator = EnvelopeValidator::new();

    let history_store: Box<dyn gb_03_lifecycle::HistoryStore> = match &config.history_path {
        Some(path) => Box::new(JsonFileHistoryStore::new(path, config.history_capacity)),
        None => Box::new(NullHistoryStore),
    };
    let lifecycle = Arc::new(LifecycleService::with_history_store(
        time,
        LifecycleConfig {
            sweep_interval_ms: config.sweep_interval_ms,
            history_capacity: config.history_capacity,
        },
        history_store,
    ));
    info!(
        restored_history = lifecycle.history().len(),
        live = lifecycle.live_count(),
        "lifecycle service ready"
    );

    // The sweep is the TTL timeout mechanism; the tick hook keeps the
    // gravity cache no staler than one tick.
    let sweeper = {
        let gravity = gravity.clone();
        spawn_sweeper(
            lifecycle.clone(),
            Duration::from_millis(config.sweep_interval_ms),
            move || gravity.tick(),
        )
    };

    run_loopback_demo(&factory, &validator, &lifecycle, &gravity)
        .await
        .context("loopback demonstration")?;

    info!("Runtime is up. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    sweeper.abort();
    let vanished = lifecycle.vanish_all();
    info!(vanished, "shutdown complete");
    Ok(())
}

/// Constructs, validates, transmits, receives, decrypts, and burns one
/// WHISPER envelope over the in-memory transport. The payload travels
/// as ciphertext; only the `KeyRef` rides in the security context.
async fn run_loopback_demo(
    factory: &EnvelopeFactory,
    validator: &EnvelopeValidator,
    lifecycle: &Arc<LifecycleService>,
    gravity: &Arc<GravityPolicy>,
) -> Result<()> {
    let signals = EnergySignals::idle();
    let g_eff = gravity.gravity_for(&signals);
    info!(g_eff, quantum = gravity.is_quantum_mode(g_eff), "gravity snapshot");

    let provider = SoftwareCipherProvider::new();
    let session_key = provider.keyring().generate_symmetric("loopback-session");
    let ciphertext = provider
        .encrypt(b"loopback whisper", &session_key)
        .map_err(|e| anyhow::anyhow!("payload encryption failed: {e}"))?;

    let mut envelope = factory.build(
        ProtocolClass::Whisper,
        PeerId::new("local"),
        Destination::Peer(PeerId::new("local")),
        ciphertext,
        &signals,
        BuildOptions {
            priority: Priority::High,
            ..BuildOptions::default()
        },
    );
    envelope.security = envelope.security.clone().with_key_ref(session_key.clone());
    validator
        .validate(&envelope)
        .map_err(|e| anyhow::anyhow!("constructed envelope failed validation: {e}"))?;

    let sender = lifecycle
        .materialize(envelope)
        .map_err(|e| anyhow::anyhow!("materialization refused: {e}"))?;

    let mut transport = InMemoryTransport::loopback();
    lifecycle
        .send(sender, &transport)
        .await
        .map_err(|e| anyhow::anyhow!("send failed: {e}"))?;

    let received = lifecycle
        .receive(&mut transport)
        .await
        .map_err(|e| anyhow::anyhow!("receive failed: {e}"))?;

    let plaintext = lifecycle
        .with_payload(received, |payload| {
            payload
                .get(fields::BODY)
                .map(|body| provider.decrypt(body, &session_key))
        })
        .map_err(|e| anyhow::anyhow!("payload read failed: {e}"))?
        .ok_or_else(|| anyhow::anyhow!("received envelope carried no body"))?
        .map_err(|e| anyhow::anyhow!("payload decryption failed: {e}"))?;

    lifecycle.vanish(sender, shared_types::VanishReason::Explicit);
    lifecycle.vanish(received, shared_types::VanishReason::Explicit);
    provider.keyring().delete(&session_key);

    info!(
        body_len = plaintext.len(),
        live = lifecycle.live_count(),
        history = lifecycle.history().len(),
        "loopback round trip complete"
    );
    Ok(())
}
