//! Error types for the campaign ledger.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur while reading or writing a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A file or directory could not be read or written.
    #[error("ledger I/O failed at {}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A persisted file exists but cannot be trusted.
    #[error("corrupt checkpoint {}: {reason}", .path.display())]
    Corrupt {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Resume was requested but no snapshot has been written yet.
    #[error("campaign {0} has no saved state to resume from")]
    MissingSnapshot(String),

    /// The campaign id cannot be used as a directory name.
    #[error("invalid campaign id: {0:?}")]
    InvalidCampaignId(String),

    /// A record could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
