//! Rulesets for Questline.
//!
//! A [`Ruleset`] validates an intent and resolves it with a single d20 check
//! against a fixed per-action threshold. Ships with a [`GenericRuleset`]
//! covering the five core actions and an [`ExtendedRuleset`] that adds
//! equipment and weapon-mastery actions flavored by [`SrdContent`].

pub mod error;
pub mod rules;
pub mod srd;

pub use error::{RulesError, RulesResult};
pub use rules::extended::ExtendedRuleset;
pub use rules::generic::GenericRuleset;
pub use rules::{Ruleset, RulesetKind};
pub use srd::{SrdContent, SrdSummary};
