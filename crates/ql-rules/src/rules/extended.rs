//! The extended ruleset: core actions plus equipment and mastery.

use ql_core::{Action, ActionIntent, ActionOutcome, CampaignState, Dice, FlagUpdate};

use super::Ruleset;
use super::generic::resolve_core;
use crate::srd::SrdContent;

/// Minimum d20 roll to use equipment effectively.
pub const USE_EQUIPMENT_THRESHOLD: u32 = 9;
/// Minimum d20 roll to trigger a mastery property.
pub const EXPLOIT_MASTERY_THRESHOLD: u32 = 11;

/// A superset of the generic ruleset flavored by SRD content.
///
/// Core actions resolve exactly as in the generic ruleset, drawing from
/// the same dice stream.
#[derive(Debug, Clone)]
pub struct ExtendedRuleset {
    srd: SrdContent,
    dice: Dice,
}

impl ExtendedRuleset {
    /// Create a ruleset over `srd` whose checks draw from `seed`.
    pub fn new(srd: SrdContent, seed: u64) -> Self {
        Self {
            srd,
            dice: Dice::seeded(seed),
        }
    }

    fn use_equipment(&mut self, name: &str) -> ActionOutcome {
        let check = self.dice.check(USE_EQUIPMENT_THRESHOLD);
        let roll = check.roll;
        let item = self
            .dice
            .pick(&self.srd.equipment_names)
            .map_or("gear", String::as_str);
        if check.succeeded() {
            ActionOutcome::new(name, true, format!("{name} uses {item} effectively (roll={roll})"))
                .with_hp_delta(name, 0)
        } else {
            ActionOutcome::new(name, false, format!("{name} fumbles {item} under pressure (roll={roll})"))
                .with_hp_delta(name, -1)
        }
    }

    fn exploit_mastery(&mut self, name: &str) -> ActionOutcome {
        let check = self.dice.check(EXPLOIT_MASTERY_THRESHOLD);
        let roll = check.roll;
        let mastery = self
            .dice
            .pick(&self.srd.mastery_property_names)
            .map_or("mastery", String::as_str);
        if check.succeeded() {
            ActionOutcome::new(
                name,
                true,
                format!("{name} applies {mastery} mastery to gain momentum (roll={roll})"),
            )
            .with_flag(FlagUpdate::Mastery(mastery.to_string()))
        } else {
            ActionOutcome::new(
                name,
                false,
                format!("{name} fails to trigger {mastery} mastery (roll={roll})"),
            )
        }
    }
}

impl Ruleset for ExtendedRuleset {
    fn name(&self) -> &str {
        "extended"
    }

    fn supported_actions(&self) -> &[Action] {
        &Action::EXTENDED
    }

    fn resolve_intent(&mut self, _campaign: &CampaignState, intent: &ActionIntent) -> ActionOutcome {
        let name = intent.actor_name.as_str();
        match intent.action {
            Action::UseEquipment => self.use_equipment(name),
            Action::ExploitMastery => self.exploit_mastery(name),
            _ => resolve_core(&mut self.dice, intent),
        }
    }
}
