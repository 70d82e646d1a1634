//! Action tokens and the records that flow through a turn.
//!
//! A [`Scene`] offers an ordered set of [`Action`] tokens. Each living
//! character answers with an [`ActionIntent`], which a ruleset turns into
//! an [`ActionOutcome`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::flags::FlagUpdate;

/// An action token a character may declare during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Strike at the threat in front of the party.
    Attack,
    /// Brace and hold position.
    Defend,
    /// Search the scene for clues.
    Investigate,
    /// Talk the way out.
    Negotiate,
    /// Catch a breath and recover.
    Rest,
    /// Put a piece of gear to work.
    UseEquipment,
    /// Apply a weapon mastery property.
    ExploitMastery,
}

impl Action {
    /// The vocabulary of the generic d20 ruleset, in scene order.
    pub const GENERIC: [Action; 5] = [
        Action::Attack,
        Action::Defend,
        Action::Investigate,
        Action::Negotiate,
        Action::Rest,
    ];

    /// The vocabulary of the extended ruleset, in scene order.
    pub const EXTENDED: [Action; 7] = [
        Action::Attack,
        Action::Defend,
        Action::Investigate,
        Action::Negotiate,
        Action::Rest,
        Action::UseEquipment,
        Action::ExploitMastery,
    ];

    /// The wire token for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::Investigate => "investigate",
            Self::Negotiate => "negotiate",
            Self::Rest => "rest",
            Self::UseEquipment => "use-equipment",
            Self::ExploitMastery => "exploit-mastery",
        }
    }

    /// Parse a token like `"attack"` or `"Use-Equipment"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "attack" => Some(Self::Attack),
            "defend" => Some(Self::Defend),
            "investigate" => Some(Self::Investigate),
            "negotiate" => Some(Self::Negotiate),
            "rest" => Some(Self::Rest),
            "use-equipment" => Some(Self::UseEquipment),
            "exploit-mastery" => Some(Self::ExploitMastery),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

/// The situation offered to the party for one turn.
///
/// Built fresh each turn and shared by every living character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Narration shown to the actors.
    pub prompt: String,
    /// Legal action tokens for this turn, in order.
    pub options: Vec<Action>,
}

impl Scene {
    /// Create a scene from a prompt and its legal options.
    pub fn new(prompt: impl Into<String>, options: impl Into<Vec<Action>>) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into(),
        }
    }

    /// Whether `action` is legal in this scene.
    pub fn offers(&self, action: Action) -> bool {
        self.options.contains(&action)
    }
}

/// One character's declared action for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionIntent {
    /// Who acts.
    pub actor_name: String,
    /// What they do.
    pub action: Action,
    /// Optional free-form target.
    #[serde(default)]
    pub target: Option<String>,
}

impl ActionIntent {
    /// Declare `action` for `actor_name` with no target.
    pub fn new(actor_name: impl Into<String>, action: Action) -> Self {
        Self {
            actor_name: actor_name.into(),
            action,
            target: None,
        }
    }

    /// Attach a target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// The resolved result of an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Who acted.
    pub actor_name: String,
    /// Whether the check succeeded.
    pub success: bool,
    /// Narration line appended to the campaign log.
    pub summary: String,
    /// Hit point changes keyed by character name.
    #[serde(default)]
    pub hp_delta: BTreeMap<String, i32>,
    /// Flag changes to merge into the campaign.
    #[serde(default)]
    pub flag_updates: Vec<FlagUpdate>,
}

impl ActionOutcome {
    /// Create an outcome with no hp or flag effects.
    pub fn new(actor_name: impl Into<String>, success: bool, summary: impl Into<String>) -> Self {
        Self {
            actor_name: actor_name.into(),
            success,
            summary: summary.into(),
            hp_delta: BTreeMap::new(),
            flag_updates: Vec::new(),
        }
    }

    /// Record an hp change for `name`.
    pub fn with_hp_delta(mut self, name: impl Into<String>, delta: i32) -> Self {
        self.hp_delta.insert(name.into(), delta);
        self
    }

    /// Record a flag update.
    pub fn with_flag(mut self, update: FlagUpdate) -> Self {
        self.flag_updates.push(update);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tokens_round_trip_through_parse() {
        for action in Action::EXTENDED {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
        assert_eq!(Action::parse(" Use-Equipment "), Some(Action::UseEquipment));
        assert_eq!(Action::parse("grapple"), None);
    }

    #[test]
    fn from_str_reports_unknown_token() {
        let err = "cast".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "unknown action: \"cast\"");
    }

    #[test]
    fn generic_is_prefix_of_extended() {
        assert_eq!(&Action::EXTENDED[..5], &Action::GENERIC[..]);
    }

    #[test]
    fn action_serializes_as_kebab_token() {
        let json = serde_json::to_string(&Action::ExploitMastery).unwrap();
        assert_eq!(json, "\"exploit-mastery\"");
        let back: Action = serde_json::from_str("\"use-equipment\"").unwrap();
        assert_eq!(back, Action::UseEquipment);
    }

    #[test]
    fn scene_offers() {
        let scene = Scene::new("A bridge", Action::GENERIC);
        assert!(scene.offers(Action::Rest));
        assert!(!scene.offers(Action::UseEquipment));
    }

    #[test]
    fn outcome_builder() {
        let outcome = ActionOutcome::new("Kael", true, "Kael uncovers a clue")
            .with_hp_delta("Kael", 0)
            .with_flag(FlagUpdate::Discovery("clue_discovered".into()));
        assert_eq!(outcome.hp_delta.get("Kael"), Some(&0));
        assert_eq!(outcome.flag_updates.len(), 1);
    }
}
