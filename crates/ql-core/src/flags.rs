//! The finite set of cross-turn flags.
//!
//! Rulesets write flags through [`FlagUpdate`]; directors and actors read
//! them from [`CampaignFlags`]. `latest_discovery` is the main coupling
//! point: an empty or absent value means no clue has been found yet.

use serde::{Deserialize, Serialize};

/// Sentinel written by a successful investigation.
pub const CLUE_DISCOVERED: &str = "clue_discovered";

/// Flags carried on the campaign between turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFlags {
    /// Set once an investigation succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_discovery: Option<String>,
    /// Name of the last mastery property exploited successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_mastery: Option<String>,
}

impl CampaignFlags {
    /// Whether a clue has been discovered (non-empty `latest_discovery`).
    pub fn discovery_made(&self) -> bool {
        self.latest_discovery
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }

    /// Merge one update.
    pub fn apply(&mut self, update: &FlagUpdate) {
        match update {
            FlagUpdate::Discovery(value) => self.latest_discovery = Some(value.clone()),
            FlagUpdate::Mastery(value) => self.latest_mastery = Some(value.clone()),
        }
    }
}

/// A single flag write produced by an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagUpdate {
    /// Sets `latest_discovery`.
    Discovery(String),
    /// Sets `latest_mastery`.
    Mastery(String),
}
