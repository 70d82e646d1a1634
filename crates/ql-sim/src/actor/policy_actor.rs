//! The policy-scored actor.

use ql_core::{ActionIntent, CampaignState, Dice, Scene};

use super::policy::PolicyProfile;
use super::scoring::{Situation, score_options, select};
use super::{Actor, NO_OPTION_FALLBACK};

/// Ranks legal options with a [`PolicyProfile`] and picks the best.
#[derive(Debug, Clone)]
pub struct PolicyActor {
    profile: PolicyProfile,
    dice: Dice,
}

impl PolicyActor {
    /// An actor over `profile` whose tie-breaks draw from `seed`.
    pub fn new(profile: PolicyProfile, seed: u64) -> Self {
        Self {
            profile,
            dice: Dice::seeded(seed),
        }
    }
}

impl Actor for PolicyActor {
    fn name(&self) -> &str {
        "policy"
    }

    fn choose_action(
        &mut self,
        campaign: &CampaignState,
        scene: &Scene,
        actor_name: &str,
    ) -> ActionIntent {
        let Some(member) = campaign.member(actor_name) else {
            let action = scene.options.first().copied().unwrap_or(NO_OPTION_FALLBACK);
            return ActionIntent::new(actor_name, action);
        };

        let policy = self.profile.resolve(actor_name);
        let situation = Situation::of(campaign, member);
        let scores = score_options(&scene.options, &policy, &self.profile.campaign, &situation);
        let action = select(&scores, &policy.tie_breaker, &mut self.dice)
            .or_else(|| scene.options.first().copied())
            .unwrap_or(NO_OPTION_FALLBACK);

        tracing::debug!(actor = actor_name, %action, ?scores, "policy choice");
        ActionIntent::new(actor_name, action)
    }
}
