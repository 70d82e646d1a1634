//! The campaign aggregate the session engine mutates turn by turn.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::character::{Character, Encounter};
use crate::error::{CoreError, CoreResult};
use crate::flags::CampaignFlags;

fn default_chapter() -> String {
    "Chapter 1".to_string()
}

/// The aggregate root of a running campaign.
///
/// Exclusively owned by the session engine during a run. `turn_index` only
/// increases; `flags` and `log` are only updated or appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    /// Name of the setting.
    pub setting_name: String,
    /// Chapter label used in scene prompts.
    #[serde(default = "default_chapter")]
    pub chapter: String,
    /// Last turn executed (0 before the first turn).
    #[serde(default)]
    pub turn_index: u32,
    /// The party, in turn-resolution order.
    pub party: Vec<Character>,
    /// Encounters the director cycles through.
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    /// Cross-turn flags.
    #[serde(default)]
    pub flags: CampaignFlags,
    /// Append-only narration, one line per event.
    #[serde(default)]
    pub log: Vec<String>,
}

impl CampaignState {
    /// Start a campaign at turn 0 with no encounters, flags, or log.
    pub fn new(
        setting_name: impl Into<String>,
        chapter: impl Into<String>,
        party: Vec<Character>,
    ) -> Self {
        Self {
            setting_name: setting_name.into(),
            chapter: chapter.into(),
            turn_index: 0,
            party,
            encounters: Vec::new(),
            flags: CampaignFlags::default(),
            log: Vec::new(),
        }
    }

    /// Attach encounters.
    pub fn with_encounters(mut self, encounters: Vec<Encounter>) -> Self {
        self.encounters = encounters;
        self
    }

    /// Check the loader contract: unique names and non-negative hp.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for member in &self.party {
            if !seen.insert(member.name.as_str()) {
                return Err(CoreError::DuplicateCharacter(member.name.clone()));
            }
            if member.hp < 0 {
                return Err(CoreError::NegativeHp {
                    name: member.name.clone(),
                    hp: member.hp,
                });
            }
        }
        Ok(())
    }

    /// Look up a party member by exact name.
    pub fn member(&self, name: &str) -> Option<&Character> {
        self.party.iter().find(|c| c.name == name)
    }

    /// Look up a party member mutably by exact name.
    pub fn member_mut(&mut self, name: &str) -> CoreResult<&mut Character> {
        self.party
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownCharacter(name.to_string()))
    }

    /// Names of members that can still act, in party order.
    pub fn active_members(&self) -> Vec<String> {
        self.party
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Whether every party member is at 0 hp.
    pub fn all_defeated(&self) -> bool {
        self.party.iter().all(|c| !c.is_active())
    }

    /// The most recent `n` log lines.
    pub fn recent_log(&self, n: usize) -> &[String] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }
}
