//! Inner domain layer: the live-instance registry and vanish
//! strategies. No locking and no I/O - both belong to the service.

pub mod registry;
pub mod vanish;

pub use registry::{LiveInstance, LiveRegistry, DEFAULT_HISTORY_CAPACITY};
pub use vanish::{strategy_for, DropStrategy, SecureWipeStrategy, VanishStrategy};
