//! Error types for the session core.
//!
//! ERROR HANDLING
//! ==============
//! Only persistence and navigation can fail locally. Failures of operations
//! tracked by a loading coordinator are never wrapped here; they flow back to
//! the caller unchanged.

/// Failure reading or writing the durable profile document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("profile storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile document is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure surfaced by session-level operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("navigation to {path} failed: {reason}")]
    Navigation { path: String, reason: String },
}

/// A cancellation token fired before the tracked operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tracked operation was cancelled")]
pub struct Cancelled;
