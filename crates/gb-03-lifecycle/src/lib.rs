//! # Lifecycle Subsystem
//!
//! Owns the set of materialized envelope instances and drives the
//! irreversible materialize → vanish state machine.
//!
//! ## State Machine
//!
//! ```text
//! [MATERIALIZING] ──materialize──→ [MATERIALIZED] ──vanish──→ [VANISHED]
//!       (transient, never                │
//!        observable)                     └── expiry sweep / burn /
//!                                            read / security failure
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotent vanish**: a second vanish on the same id is a no-op;
//!   exactly one vanish strategy execution occurs per instance.
//! - **Single owner**: only this subsystem mutates the live table;
//!   callers hold opaque `InstanceId`s and closure-scoped read access.
//! - **Automatic expiry**: a periodic sweep vanishes every instance
//!   whose deadline has passed - the only fully automatic transition.
//! - **Sanitized history**: the bounded vanish log carries header
//!   metadata and reasons only, and is the only state that may persist
//!   across restarts. Live instances never do.
//!
//! ## Module Structure
//!
//! ```text
//! domain/    registry (owned live table + history), vanish strategies
//! service    LifecycleService: locking, send/receive, admission
//! adapters/  in-memory transport, JSON history store, sweep task
//! ports      LifecycleApi trait for consumers
//! ```

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;
pub mod wire;

pub use adapters::{spawn_sweeper, HistoryStore, InMemoryTransport, JsonFileHistoryStore, NullHistoryStore};
pub use errors::{HistoryStoreError, ReceiveError, SendError};
pub use ports::LifecycleApi;
pub use service::{LifecycleConfig, LifecycleService};
