use std::path::PathBuf;

use ql_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that stop a session before its first turn, or a setup step.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// `max_turns` was 0.
    #[error("max_turns must be at least 1")]
    ZeroTurns,

    /// The campaign has no party members.
    #[error("campaign party is empty")]
    EmptyParty,

    /// The party breaks a loader invariant.
    #[error("invalid party: {0}")]
    InvalidParty(#[from] CoreError),

    /// A party preset name was not recognized.
    #[error("unknown party preset: {0}")]
    UnknownPreset(String),

    /// A party of size 0 was requested.
    #[error("party size must be positive")]
    InvalidPartySize,

    /// A policy profile could not be parsed.
    #[error("invalid policy profile: {0}")]
    InvalidPolicy(String),

    /// Writing an export failed.
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// An export could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures reported by an external decision or narration collaborator.
///
/// These never abort a session; the assisted decorators fall back to their
/// wrapped deterministic component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    /// The collaborator is not configured (for example, a missing credential).
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The call itself failed.
    #[error("collaborator call failed: {0}")]
    Transport(String),

    /// The collaborator answered with something unusable.
    #[error("malformed collaborator reply: {0}")]
    Malformed(String),
}
