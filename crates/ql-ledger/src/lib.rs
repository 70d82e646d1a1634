//! Checkpoint ledger for Questline campaigns.
//!
//! Each campaign id gets its own directory with a manifest of recorded
//! sessions, one payload file per session, and a snapshot of the campaign
//! state after the latest session. A later invocation resumes from that
//! snapshot.

/// Error types for ledger I/O and consistency checks.
pub mod error;
/// Manifest, session records, and session payloads.
pub mod manifest;
/// The on-disk store.
pub mod store;

pub use error::{LedgerError, LedgerResult};
pub use manifest::{Manifest, SessionPayload, SessionRecord, session_id};
pub use store::Ledger;
