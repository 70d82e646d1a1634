//! The ruleset abstraction.
//!
//! A ruleset owns its own seeded [`ql_core::Dice`] stream. Validation is a
//! pure check; resolution always produces some outcome.

pub mod extended;
pub mod generic;

use ql_core::{Action, ActionIntent, ActionOutcome, CampaignState};
use serde::{Deserialize, Serialize};

use crate::srd::SrdContent;

/// Resolution strategy for action intents.
pub trait Ruleset: std::fmt::Debug {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Actions this ruleset knows how to resolve, in scene order.
    fn supported_actions(&self) -> &[Action];

    /// Whether `intent` may be resolved: the action is supported and the
    /// actor is a party member still on their feet.
    fn validate_intent(&self, campaign: &CampaignState, intent: &ActionIntent) -> bool {
        self.supported_actions().contains(&intent.action)
            && campaign
                .member(&intent.actor_name)
                .is_some_and(|c| c.is_active())
    }

    /// Resolve a validated intent with one d20 check.
    fn resolve_intent(&mut self, campaign: &CampaignState, intent: &ActionIntent) -> ActionOutcome;
}

/// Which ruleset a session is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetKind {
    /// The five core actions.
    #[default]
    Generic,
    /// Core actions plus equipment and mastery.
    Extended,
}

impl RulesetKind {
    /// Build a boxed ruleset of this kind.
    pub fn build(self, seed: u64, srd: &SrdContent) -> Box<dyn Ruleset> {
        match self {
            Self::Generic => Box::new(generic::GenericRuleset::new(seed)),
            Self::Extended => Box::new(extended::ExtendedRuleset::new(srd.clone(), seed)),
        }
    }
}

impl std::fmt::Display for RulesetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Extended => write!(f, "extended"),
        }
    }
}
