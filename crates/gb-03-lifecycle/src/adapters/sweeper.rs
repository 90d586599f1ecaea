//! Periodic expiry sweep task.
//!
//! The sweep is the TTL timeout mechanism: every tick it vanishes all
//! instances whose deadline has passed, then runs the caller's tick
//! hook (used to expire the gravity memoization cache).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::service::LifecycleService;

/// Spawns the sweep loop on the current tokio runtime.
///
/// Runs until aborted. `on_tick` fires after every sweep, expired
/// instances or not.
pub fn spawn_sweeper(
    service: Arc<LifecycleService>,
    interval: Duration,
    on_tick: impl Fn() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let vanished = service.sweep();
            if vanished > 0 {
                debug!(vanished, "sweep vanished expired instances");
            }
            on_tick();
        }
    })
}
