//! Actors choose one intent per living character per turn.
//!
//! [`HeuristicActor`] applies three fixed rules of thumb. [`PolicyActor`]
//! ranks every legal option with the weighted scoring in [`scoring`] and
//! breaks ties deterministically.

pub mod policy;
pub mod policy_actor;
pub mod scoring;

use ql_core::{Action, ActionIntent, CampaignState, Scene};

use crate::assist::AssistStatus;

pub use policy::{ActorPolicy, CampaignPolicy, PolicyProfile, ResolvedPolicy};
pub use policy_actor::PolicyActor;
pub use scoring::{LOW_HP, Situation, score_options};

/// Chooses an action for one character.
pub trait Actor: std::fmt::Debug {
    /// Human-readable name for this actor.
    fn name(&self) -> &str;

    /// Pick an intent for `actor_name` from `scene.options`.
    ///
    /// Never fails. A scene with no options yields an intent the engine
    /// will reject.
    fn choose_action(
        &mut self,
        campaign: &CampaignState,
        scene: &Scene,
        actor_name: &str,
    ) -> ActionIntent;

    /// Collaborator counters, for decorators that have them.
    fn assist_status(&self) -> Option<&AssistStatus> {
        None
    }
}

impl<A: Actor + ?Sized> Actor for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_action(
        &mut self,
        campaign: &CampaignState,
        scene: &Scene,
        actor_name: &str,
    ) -> ActionIntent {
        (**self).choose_action(campaign, scene, actor_name)
    }

    fn assist_status(&self) -> Option<&AssistStatus> {
        (**self).assist_status()
    }
}

/// The action chosen when a scene offers nothing.
pub(crate) const NO_OPTION_FALLBACK: Action = Action::Defend;

/// Rest when hurt, investigate until a clue turns up, otherwise attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicActor;

impl Actor for HeuristicActor {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_action(
        &mut self,
        campaign: &CampaignState,
        scene: &Scene,
        actor_name: &str,
    ) -> ActionIntent {
        let hp = campaign.member(actor_name).map_or(0, |c| c.hp);
        let action = if hp <= LOW_HP && scene.offers(Action::Rest) {
            Action::Rest
        } else if !campaign.flags.discovery_made() && scene.offers(Action::Investigate) {
            Action::Investigate
        } else if scene.offers(Action::Attack) {
            Action::Attack
        } else {
            scene.options.first().copied().unwrap_or(NO_OPTION_FALLBACK)
        };
        ActionIntent::new(actor_name, action)
    }
}
