//! # GhostBridge Envelope Test Suite
//!
//! Unified test crate exercising the subsystems together:
//!
//! ```text
//! tests/src/integration/
//! ├── pipeline.rs    # construct → validate → materialize → transmit
//! │                  # → receive → read → vanish, plus hostile paths
//! ├── gravity.rs     # energy/gravity scenarios driving TTL outcomes
//! └── persistence.rs # history survives restart, live instances don't
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gb-tests
//! cargo test -p gb-tests integration::pipeline::
//! ```

pub mod integration;
