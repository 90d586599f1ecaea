//! Cross-subsystem integration flows.

pub mod crypto;
pub mod gravity;
pub mod persistence;
pub mod pipeline;

use std::sync::Arc;

use gb_01_gravity::GravityPolicy;
use gb_02_envelope::EnvelopeFactory;
use gb_03_lifecycle::{LifecycleConfig, LifecycleService};
use shared_types::{SystemTimeSource, TimeSource};

/// One node's worth of envelope machinery over a shared time source.
pub struct TestNode {
    /// Gravity policy shared with the factory.
    pub gravity: Arc<GravityPolicy>,
    /// Envelope builder.
    pub factory: EnvelopeFactory,
    /// Lifecycle service.
    pub lifecycle: Arc<LifecycleService>,
}

impl TestNode {
    /// Node on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_time(Arc::new(SystemTimeSource))
    }

    /// Node on an arbitrary time source.
    pub fn with_time(time: Arc<dyn TimeSource>) -> Self {
        let gravity = Arc::new(GravityPolicy::with_defaults());
        let factory = EnvelopeFactory::new(gravity.clone(), time.clone());
        let lifecycle = Arc::new(LifecycleService::new(time, LifecycleConfig::default()));
        Self {
            gravity,
            factory,
            lifecycle,
        }
    }
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}
