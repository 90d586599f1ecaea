//! Service-level error types for the lifecycle subsystem.
//!
//! Receive-path failures deliberately collapse to a single generic
//! variant toward the caller: a peer must never learn *why* its
//! envelope was rejected (oracle-attack avoidance). The precise cause
//! is logged at debug level only.

use shared_types::{LifecycleError, TransportError};

/// Errors surfaced by `LifecycleService::send`.
#[derive(Clone, Debug, PartialEq)]
pub enum SendError {
    /// The instance is not MATERIALIZED.
    NotReady(LifecycleError),
    /// The transport failed; propagated unchanged, never retried here.
    Transport(TransportError),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady(e) => write!(f, "{}", e),
            Self::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SendError {}

impl From<TransportError> for SendError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Errors surfaced by `LifecycleService::receive`.
#[derive(Clone, Debug, PartialEq)]
pub enum ReceiveError {
    /// The envelope could not be read. Covers every decode, validation,
    /// and security failure without distinguishing them.
    Unreadable,
    /// The transport failed before any envelope bytes arrived.
    Transport(TransportError),
}

impl std::fmt::Display for ReceiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable => write!(f, "Unreadable message"),
            Self::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReceiveError {}

impl From<TransportError> for ReceiveError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Errors from history persistence.
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryStoreError {
    /// Filesystem failure.
    Io(String),
    /// Record (de)serialization failure.
    Serialization(String),
}

impl std::fmt::Display for HistoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "History store I/O error: {}", e),
            Self::Serialization(e) => write!(f, "History store serialization error: {}", e),
        }
    }
}

impl std::error::Error for HistoryStoreError {}
