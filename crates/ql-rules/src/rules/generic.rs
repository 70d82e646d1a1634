//! The generic d20 ruleset.

use ql_core::{Action, ActionIntent, ActionOutcome, CLUE_DISCOVERED, CampaignState, Dice, FlagUpdate};

use super::Ruleset;

/// Minimum d20 roll for a landed attack.
pub const ATTACK_THRESHOLD: u32 = 10;
/// Minimum d20 roll to brace in time.
pub const DEFEND_THRESHOLD: u32 = 8;
/// Minimum d20 roll to uncover a clue.
pub const INVESTIGATE_THRESHOLD: u32 = 11;
/// Minimum d20 roll to win a negotiation.
pub const NEGOTIATE_THRESHOLD: u32 = 12;

/// Resolves attack, defend, investigate, negotiate, and rest.
#[derive(Debug, Clone)]
pub struct GenericRuleset {
    dice: Dice,
}

impl GenericRuleset {
    /// Create a ruleset whose checks draw from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            dice: Dice::seeded(seed),
        }
    }
}

impl Ruleset for GenericRuleset {
    fn name(&self) -> &str {
        "generic"
    }

    fn supported_actions(&self) -> &[Action] {
        &Action::GENERIC
    }

    fn resolve_intent(&mut self, _campaign: &CampaignState, intent: &ActionIntent) -> ActionOutcome {
        resolve_core(&mut self.dice, intent)
    }
}

/// Resolve one of the five core actions against `dice`.
///
/// Actions outside the core set resolve as a rest. Callers validate first.
pub(crate) fn resolve_core(dice: &mut Dice, intent: &ActionIntent) -> ActionOutcome {
    let name = intent.actor_name.as_str();

    let outcome = match intent.action {
        Action::Attack => {
            let check = dice.check(ATTACK_THRESHOLD);
            let roll = check.roll;
            if check.succeeded() {
                ActionOutcome::new(name, true, format!("{name} attacks and lands a hit (roll={roll})"))
                    .with_hp_delta(name, 0)
            } else {
                ActionOutcome::new(name, false, format!("{name} misses and takes strain (roll={roll})"))
                    .with_hp_delta(name, -1)
            }
        }
        Action::Defend => {
            let check = dice.check(DEFEND_THRESHOLD);
            let roll = check.roll;
            if check.succeeded() {
                ActionOutcome::new(name, true, format!("{name} fortifies position (roll={roll})"))
            } else {
                ActionOutcome::new(name, false, format!("{name} fails to brace in time (roll={roll})"))
            }
        }
        Action::Investigate => {
            let check = dice.check(INVESTIGATE_THRESHOLD);
            let roll = check.roll;
            if check.succeeded() {
                ActionOutcome::new(name, true, format!("{name} uncovers a clue (roll={roll})"))
                    .with_flag(FlagUpdate::Discovery(CLUE_DISCOVERED.to_string()))
            } else {
                ActionOutcome::new(name, false, format!("{name} finds nothing useful (roll={roll})"))
            }
        }
        Action::Negotiate => {
            let check = dice.check(NEGOTIATE_THRESHOLD);
            let roll = check.roll;
            if check.succeeded() {
                ActionOutcome::new(name, true, format!("{name} secures a favorable bargain (roll={roll})"))
            } else {
                ActionOutcome::new(name, false, format!("{name} fails to persuade (roll={roll})"))
            }
        }
        Action::Rest | Action::UseEquipment | Action::ExploitMastery => {
            // Rest always succeeds; the roll is still drawn to keep streams aligned.
            let roll = dice.check(1).roll;
            ActionOutcome::new(name, true, format!("{name} takes a breath and recovers (roll={roll})"))
                .with_hp_delta(name, 1)
        }
    };

    tracing::debug!(
        actor = name,
        action = %intent.action,
        success = outcome.success,
        "resolved intent"
    );
    outcome
}
