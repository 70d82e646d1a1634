//! Records persisted by the ledger.

use chrono::{DateTime, Utc};
use ql_core::SessionResult;
use serde::{Deserialize, Serialize};

/// Build the id of the `n`th session, e.g. `session_0001`.
pub fn session_id(n: u32) -> String {
    format!("session_{n:04}")
}

/// One entry in the manifest's session index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Stable id, `session_NNNN`.
    pub session_id: String,
    /// When the session was recorded.
    pub created_at: DateTime<Utc>,
    /// Seed the session ran with.
    pub seed: u64,
    /// Turn budget requested.
    pub turns: u32,
    /// Label of the campaign source the run used.
    pub source_profile: String,
    /// Payload path relative to the campaign directory.
    pub path: String,
}

/// The per-campaign session index.
///
/// Only ever grows: each recorded session appends one entry and bumps
/// `session_count` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Campaign this ledger belongs to.
    pub campaign_id: String,
    /// When the ledger was created.
    pub created_at: DateTime<Utc>,
    /// When the last session was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Sessions recorded so far.
    pub session_count: u32,
    /// Session index, oldest first.
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl Manifest {
    /// An empty manifest for `campaign_id`.
    pub fn new(campaign_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            created_at: now,
            updated_at: None,
            session_count: 0,
            sessions: Vec::new(),
        }
    }

    /// Id the next recorded session will get.
    pub fn next_session_id(&self) -> String {
        session_id(self.session_count + 1)
    }

    /// Check the index is gap-free and agrees with `session_count`.
    pub fn check(&self, campaign_id: &str) -> Result<(), String> {
        if self.campaign_id != campaign_id {
            return Err(format!(
                "manifest belongs to {:?}, expected {campaign_id:?}",
                self.campaign_id
            ));
        }
        if self.sessions.len() != self.session_count as usize {
            return Err(format!(
                "session_count is {} but {} sessions are indexed",
                self.session_count,
                self.sessions.len()
            ));
        }
        for (n, record) in (1..).zip(&self.sessions) {
            let expected = session_id(n);
            if record.session_id != expected {
                return Err(format!(
                    "session {n} is {:?}, expected {expected:?}",
                    record.session_id
                ));
            }
        }
        Ok(())
    }

    /// Find a session by id.
    pub fn session(&self, session_id: &str) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }
}

/// The full payload stored for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Stable id, `session_NNNN`.
    pub session_id: String,
    /// When the session was recorded.
    pub created_at: DateTime<Utc>,
    /// Seed the session ran with.
    pub seed: u64,
    /// Turn budget requested.
    pub turns: u32,
    /// Label of the campaign source the run used.
    pub source_profile: String,
    /// What the engine produced.
    pub result: SessionResult,
}
