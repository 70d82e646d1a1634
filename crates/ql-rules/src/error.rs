//! Error types for the rules crate.
//!
//! Resolution itself never fails; only loading ruleset content can.

use std::path::PathBuf;

/// Errors that can occur while loading ruleset content.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The SRD file could not be read.
    #[error("failed to read SRD content at {}: {source}", .path.display())]
    SrdIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The SRD file is not valid JSON or has the wrong shape.
    #[error("invalid SRD content: {0}")]
    SrdParse(String),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
