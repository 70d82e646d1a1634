//! Policy profiles: the configuration behind [`PolicyActor`](super::PolicyActor).
//!
//! A profile is parsed once at startup and handed to the actor by value.
//! JSON shape:
//!
//! ```json
//! {
//!   "campaign": { "preferred_actions": ["investigate"], "avoid_actions": [], "director_guidance": "..." },
//!   "default": { "caution": 0.5, "priorities": { "attack": 0.3 }, "tie_breaker": ["attack", "defend"] },
//!   "characters": { "Kael": { "aggression": 0.9, "priorities": { "exploit-mastery": 0.8 } } }
//! }
//! ```

use std::collections::BTreeMap;

use ql_core::{Action, Character};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Value used for any numeric policy field that is not configured.
pub const DEFAULT_WEIGHT: f64 = 0.5;

/// Campaign-wide nudges shared by every character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignPolicy {
    /// Tokens that get a flat bonus when offered.
    pub preferred_actions: Vec<String>,
    /// Tokens that get a flat penalty when offered.
    pub avoid_actions: Vec<String>,
    /// Tone cue for the director.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_guidance: Option<String>,
    /// Tone cue for an assisted actor's collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_guidance: Option<String>,
}

/// Per-character (or default) scoring weights. Every field is optional so
/// overrides can be partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorPolicy {
    /// Weight of the low-hp retreat bonus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caution: Option<f64>,
    /// Weight of combat class bonuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggression: Option<f64>,
    /// Weight of clue-seeking bonuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration: Option<f64>,
    /// Flat per-token bonuses. Unknown tokens are ignored.
    pub priorities: BTreeMap<String, f64>,
    /// Ordered tie-break preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<Vec<String>>,
}

impl ActorPolicy {
    /// Layer `overrides` on top of `self`.
    ///
    /// `priorities` merges key by key; every other field is replaced when
    /// the override sets it.
    pub fn merged_with(&self, overrides: &ActorPolicy) -> ActorPolicy {
        let mut priorities = self.priorities.clone();
        priorities.extend(overrides.priorities.iter().map(|(k, v)| (k.clone(), *v)));
        ActorPolicy {
            caution: overrides.caution.or(self.caution),
            aggression: overrides.aggression.or(self.aggression),
            exploration: overrides.exploration.or(self.exploration),
            priorities,
            tie_breaker: overrides
                .tie_breaker
                .clone()
                .or_else(|| self.tie_breaker.clone()),
        }
    }

    /// Fill in defaults and parse tokens.
    pub fn resolve(&self) -> ResolvedPolicy {
        ResolvedPolicy {
            caution: self.caution.unwrap_or(DEFAULT_WEIGHT),
            aggression: self.aggression.unwrap_or(DEFAULT_WEIGHT),
            exploration: self.exploration.unwrap_or(DEFAULT_WEIGHT),
            priorities: self
                .priorities
                .iter()
                .filter_map(|(token, weight)| Action::parse(token).map(|a| (a, *weight)))
                .collect(),
            tie_breaker: self
                .tie_breaker
                .iter()
                .flatten()
                .filter_map(|token| Action::parse(token))
                .collect(),
        }
    }

    /// A starting policy derived from a character's class, role, and flaw.
    pub fn suggested_for(member: &Character) -> ActorPolicy {
        let role_text = format!("{} {}", member.role, member.personality).to_lowercase();
        let class_text = member.char_class.to_lowercase();
        let mentions = |text: &str, words: &[&str]| words.iter().any(|w| text.contains(w));

        let mut policy = ActorPolicy {
            caution: Some(DEFAULT_WEIGHT),
            aggression: Some(DEFAULT_WEIGHT),
            exploration: Some(DEFAULT_WEIGHT),
            priorities: BTreeMap::new(),
            tie_breaker: Some(tokens(&[
                Action::Attack,
                Action::Investigate,
                Action::Defend,
                Action::Negotiate,
                Action::Rest,
            ])),
        };

        if mentions(&class_text, &["fighter", "barbarian", "paladin", "ranger"]) {
            policy.priorities.insert("attack".into(), 1.0);
            policy.priorities.insert("exploit-mastery".into(), 0.8);
            policy.aggression = Some(0.8);
        }
        if mentions(&class_text, &["wizard", "cleric", "rogue", "bard", "druid"]) {
            policy.priorities.insert("investigate".into(), 0.9);
            policy.exploration = Some(0.8);
        }
        if mentions(&role_text, &["face", "diplomat", "charisma"]) {
            policy.priorities.insert("negotiate".into(), 1.1);
            policy.tie_breaker = Some(tokens(&[
                Action::Negotiate,
                Action::Investigate,
                Action::Defend,
                Action::Attack,
                Action::Rest,
            ]));
        }
        if mentions(&role_text, &["tank", "guardian", "protector"]) {
            policy.priorities.insert("defend".into(), 0.8);
            policy.caution = Some(0.7);
        }
        if !member.flaw.is_empty() {
            *policy.priorities.entry("rest".into()).or_insert(0.0) += 0.2;
        }
        policy
    }
}

fn tokens(actions: &[Action]) -> Vec<String> {
    actions.iter().map(|a| a.as_str().to_string()).collect()
}

/// An [`ActorPolicy`] with defaults applied and tokens parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPolicy {
    /// Low-hp retreat weight.
    pub caution: f64,
    /// Combat weight.
    pub aggression: f64,
    /// Clue-seeking weight.
    pub exploration: f64,
    /// Flat per-action bonuses.
    pub priorities: BTreeMap<Action, f64>,
    /// Ordered tie-break preference.
    pub tie_breaker: Vec<Action>,
}

impl Default for ResolvedPolicy {
    fn default() -> Self {
        ActorPolicy::default().resolve()
    }
}

/// The full policy configuration for a party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyProfile {
    /// Campaign-wide nudges.
    pub campaign: CampaignPolicy,
    /// Weights for characters without an override.
    pub default: ActorPolicy,
    /// Per-character overrides keyed by name.
    pub characters: BTreeMap<String, ActorPolicy>,
}

impl PolicyProfile {
    /// Parse a profile from JSON.
    pub fn from_json(text: &str) -> SimResult<Self> {
        serde_json::from_str(text).map_err(|e| SimError::InvalidPolicy(e.to_string()))
    }

    /// Whether the profile configures anything at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The effective policy for `actor_name`.
    pub fn resolve(&self, actor_name: &str) -> ResolvedPolicy {
        match self.characters.get(actor_name) {
            Some(overrides) => self.default.merged_with(overrides).resolve(),
            None => self.default.resolve(),
        }
    }

    /// Suggest a profile for a party, one override per member.
    pub fn suggested_for(party: &[Character]) -> Self {
        Self {
            campaign: CampaignPolicy::default(),
            default: ActorPolicy {
                caution: Some(DEFAULT_WEIGHT),
                aggression: Some(DEFAULT_WEIGHT),
                exploration: Some(0.6),
                priorities: BTreeMap::from([
                    ("investigate".to_string(), 0.5),
                    ("attack".to_string(), 0.3),
                    ("defend".to_string(), 0.2),
                ]),
                tie_breaker: Some(tokens(&[
                    Action::Investigate,
                    Action::Attack,
                    Action::Defend,
                    Action::Negotiate,
                    Action::Rest,
                ])),
            },
            characters: party
                .iter()
                .map(|m| (m.name.clone(), ActorPolicy::suggested_for(m)))
                .collect(),
        }
    }
}
