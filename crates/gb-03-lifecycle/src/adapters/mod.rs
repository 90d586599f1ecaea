//! Outer layer: transport endpoints, history persistence, and the
//! periodic sweep task.

pub mod history;
pub mod sweeper;
pub mod transport;

pub use history::{HistoryStore, JsonFileHistoryStore, NullHistoryStore};
pub use sweeper::spawn_sweeper;
pub use transport::{InMemoryTransport, DEFAULT_CHANNEL_CAPACITY};
