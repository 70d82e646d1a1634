//! Per-turn and per-session records produced by the engine.

use serde::{Deserialize, Serialize};

use crate::action::{ActionIntent, ActionOutcome};
use crate::campaign::CampaignState;

/// Immutable record of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// The campaign turn number.
    pub turn_index: u32,
    /// Prompt of the scene offered this turn.
    pub scene_prompt: String,
    /// Accepted intents, in resolution order.
    pub intents: Vec<ActionIntent>,
    /// Outcomes, parallel to `intents`.
    pub outcomes: Vec<ActionOutcome>,
}

/// How a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnding {
    /// Ran the requested number of turns.
    Completed,
    /// Stopped early because every party member reached 0 hp.
    AllDefeated,
}

impl std::fmt::Display for SessionEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::AllDefeated => write!(f, "all defeated"),
        }
    }
}

/// Everything a session produced. This is the unit the ledger persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Setting of the campaign.
    pub setting_name: String,
    /// Turns executed in this session.
    pub total_turns: u32,
    /// How the session stopped.
    pub ending: SessionEnding,
    /// Snapshot of the campaign after the last turn.
    pub final_state: CampaignState,
    /// One record per executed turn.
    pub turns: Vec<TurnResult>,
}
