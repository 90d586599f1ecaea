//! # Envelope Protocol Subsystem
//!
//! Construction and admission control for ephemeral envelopes.
//!
//! ## Components
//!
//! - [`EnvelopeFactory`] - builds complete, unvalidated envelopes with
//!   gravity-scaled TTLs.
//! - [`EnvelopeValidator`] - six ordered checks against the immutable
//!   per-class policy table, identical at construction and receipt.
//! - [`SecurityContextNegotiator`] - closed algorithm allow-lists,
//!   mandatory on every receive path before payload unwrap.
//!
//! ## Flow
//!
//! ```text
//! build() ──→ validate() ──→ [lifecycle.materialize]
//!                ↑
//! receive bytes ─┴─ negotiator.verify()   (both, on every receipt)
//! ```
//!
//! Neither component touches the live-instance table: the factory and
//! validator are stateless with respect to lifecycle state.

pub mod factory;
pub mod negotiator;
pub mod validator;

pub use factory::{BuildOptions, EnvelopeFactory};
pub use negotiator::SecurityContextNegotiator;
pub use validator::EnvelopeValidator;
