//! The session engine: the turn loop and its lifecycle.

use ql_core::{
    ActionIntent, ActionOutcome, CampaignState, Scene, SessionEnding, SessionResult, TurnResult,
};
use ql_rules::{Ruleset, RulesetKind, SrdContent};

use crate::actor::{Actor, HeuristicActor, PolicyActor, PolicyProfile};
use crate::assist::{AssistStatus, AssistedActor, AssistedDirector, DecisionClient, SceneClient};
use crate::config::{ActorKind, SessionConfig};
use crate::director::{Director, SimpleDirector, SrdDirector};
use crate::error::{SimError, SimResult};

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// `run` has not been called.
    NotStarted,
    /// Turns are executing.
    Running,
    /// The turn budget was used up.
    Completed,
    /// Every party member reached 0 hp.
    AllDefeated,
}

/// The turn loop wiring a director, an actor, and a ruleset together.
///
/// Turns are strictly sequential, and so are the characters within a turn:
/// a later character sees the hp and flag changes made by earlier ones.
#[derive(Debug)]
pub struct SessionEngine {
    ruleset: Box<dyn Ruleset>,
    director: Box<dyn Director>,
    actor: Box<dyn Actor>,
    status: SessionStatus,
}

impl SessionEngine {
    /// Assemble an engine from its three strategies.
    pub fn new(ruleset: Box<dyn Ruleset>, director: Box<dyn Director>, actor: Box<dyn Actor>) -> Self {
        Self {
            ruleset,
            director,
            actor,
            status: SessionStatus::NotStarted,
        }
    }

    /// Build the deterministic strategies described by `config`.
    ///
    /// The director matches the ruleset's vocabulary. Its tone cue comes
    /// from the config, or else from the profile's campaign policy.
    pub fn from_config(config: &SessionConfig, srd: &SrdContent, profile: PolicyProfile) -> Self {
        let guidance = director_guidance(config, &profile);
        Self::new(
            config.ruleset.build(config.seed, srd),
            deterministic_director(config, srd, guidance),
            deterministic_actor(config, profile),
        )
    }

    /// Like [`from_config`](Self::from_config), with collaborators proposing
    /// scenes and decisions on top of the deterministic strategies.
    ///
    /// The director's collaborator receives the director tone cue; the
    /// actor's collaborator receives the profile's `actor_guidance`.
    pub fn assisted<S, D>(
        config: &SessionConfig,
        srd: &SrdContent,
        profile: PolicyProfile,
        scenes: S,
        decisions: D,
    ) -> Self
    where
        S: SceneClient + 'static,
        D: DecisionClient + 'static,
    {
        let guidance = director_guidance(config, &profile);
        let actor_guidance = profile.campaign.actor_guidance.clone();

        let mut director = AssistedDirector::new(
            deterministic_director(config, srd, guidance.clone()),
            scenes,
        );
        if let Some(guidance) = guidance {
            director = director.with_guidance(guidance);
        }
        let mut actor = AssistedActor::new(deterministic_actor(config, profile), decisions);
        if let Some(guidance) = actor_guidance.filter(|g| !g.trim().is_empty()) {
            actor = actor.with_guidance(guidance);
        }
        Self::new(
            config.ruleset.build(config.seed, srd),
            Box::new(director),
            Box::new(actor),
        )
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Collaborator counters of the director, if it is assisted.
    pub fn director_assist(&self) -> Option<&AssistStatus> {
        self.director.assist_status()
    }

    /// Collaborator counters of the actor, if it is assisted.
    pub fn actor_assist(&self) -> Option<&AssistStatus> {
        self.actor.assist_status()
    }

    /// Run up to `max_turns` turns, continuing from `campaign.turn_index`.
    ///
    /// Configuration problems are rejected before the first turn. Invalid
    /// intents are logged and skipped; nothing after the first turn fails.
    pub fn run(&mut self, mut campaign: CampaignState, max_turns: u32) -> SimResult<SessionResult> {
        if max_turns == 0 {
            return Err(SimError::ZeroTurns);
        }
        if campaign.party.is_empty() {
            return Err(SimError::EmptyParty);
        }
        campaign.validate()?;

        self.status = SessionStatus::Running;
        let start = campaign.turn_index;
        tracing::info!(
            setting = %campaign.setting_name,
            ruleset = self.ruleset.name(),
            director = self.director.name(),
            actor = self.actor.name(),
            start_turn = start + 1,
            max_turns,
            "session started"
        );

        let mut turns = Vec::new();
        let mut ending = SessionEnding::Completed;
        for turn in (start + 1)..=start.saturating_add(max_turns) {
            turns.push(self.play_turn(&mut campaign, turn));

            if campaign.all_defeated() {
                campaign.log.push("Session ended: all party members defeated".to_string());
                ending = SessionEnding::AllDefeated;
                break;
            }
        }

        self.status = match ending {
            SessionEnding::Completed => SessionStatus::Completed,
            SessionEnding::AllDefeated => SessionStatus::AllDefeated,
        };
        let total_turns = u32::try_from(turns.len()).unwrap_or(u32::MAX);
        tracing::info!(total_turns, %ending, "session finished");

        Ok(SessionResult {
            setting_name: campaign.setting_name.clone(),
            total_turns,
            ending,
            final_state: campaign,
            turns,
        })
    }

    fn play_turn(&mut self, campaign: &mut CampaignState, turn: u32) -> TurnResult {
        campaign.turn_index = turn;
        let scene = self.director.build_scene(campaign);

        let mut intents = Vec::new();
        let mut outcomes = Vec::new();
        for name in campaign.active_members() {
            // An earlier outcome this turn may have dropped this character.
            if !campaign.member(&name).is_some_and(|c| c.is_active()) {
                continue;
            }

            let intent = self.actor.choose_action(campaign, &scene, &name);
            if !self.accepts(campaign, &scene, &name, &intent) {
                tracing::warn!(turn, actor = %name, action = %intent.action, "rejected intent");
                campaign.log.push(format!("Turn {turn}: {name} submitted invalid action"));
                continue;
            }

            let outcome = self.ruleset.resolve_intent(campaign, &intent);
            apply_outcome(campaign, &outcome);
            campaign.log.push(format!("Turn {turn}: {}", outcome.summary));
            intents.push(intent);
            outcomes.push(outcome);
        }

        TurnResult {
            turn_index: turn,
            scene_prompt: scene.prompt,
            intents,
            outcomes,
        }
    }

    fn accepts(
        &self,
        campaign: &CampaignState,
        scene: &Scene,
        name: &str,
        intent: &ActionIntent,
    ) -> bool {
        intent.actor_name == name
            && scene.offers(intent.action)
            && self.ruleset.validate_intent(campaign, intent)
    }
}

fn director_guidance(config: &SessionConfig, profile: &PolicyProfile) -> Option<String> {
    config
        .director_guidance
        .clone()
        .or_else(|| profile.campaign.director_guidance.clone())
        .filter(|g| !g.trim().is_empty())
}

fn deterministic_director(
    config: &SessionConfig,
    srd: &SrdContent,
    guidance: Option<String>,
) -> Box<dyn Director> {
    let guidance = guidance.unwrap_or_default();
    match config.ruleset {
        RulesetKind::Generic => Box::new(
            SimpleDirector::new(config.seed)
                .with_source_chunks(config.source_chunks.clone())
                .with_guidance(guidance),
        ),
        RulesetKind::Extended => Box::new(
            SrdDirector::new(srd.clone(), config.seed)
                .with_source_chunks(config.source_chunks.clone())
                .with_guidance(guidance),
        ),
    }
}

fn deterministic_actor(config: &SessionConfig, profile: PolicyProfile) -> Box<dyn Actor> {
    match config.actor {
        ActorKind::Policy => Box::new(PolicyActor::new(profile, config.seed)),
        ActorKind::Heuristic => Box::new(HeuristicActor),
    }
}

/// Apply hp deltas (clamped at 0) and merge flag updates.
fn apply_outcome(campaign: &mut CampaignState, outcome: &ActionOutcome) {
    for (name, delta) in &outcome.hp_delta {
        match campaign.member_mut(name) {
            Ok(member) => member.apply_hp_delta(*delta),
            Err(e) => tracing::warn!(error = %e, "ignored hp delta"),
        }
    }
    for update in &outcome.flag_updates {
        campaign.flags.apply(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_core::{Action, Character, Encounter, FlagUpdate};

    /// Resolves every intent as a fixed hp change.
    #[derive(Debug)]
    struct FixedRuleset(i32);

    impl Ruleset for FixedRuleset {
        fn name(&self) -> &str {
            "fixed"
        }
        fn supported_actions(&self) -> &[Action] {
            &Action::GENERIC
        }
        fn resolve_intent(&mut self, _c: &CampaignState, intent: &ActionIntent) -> ActionOutcome {
            let name = intent.actor_name.clone();
            ActionOutcome::new(&name, true, format!("{name} does {}", intent.action))
                .with_hp_delta(&name, self.0)
                .with_flag(FlagUpdate::Discovery("seen".into()))
        }
    }

    /// Always proposes the same action.
    #[derive(Debug)]
    struct Always(Action);

    impl Actor for Always {
        fn name(&self) -> &str {
            "always"
        }
        fn choose_action(&mut self, _c: &CampaignState, _s: &Scene, actor_name: &str) -> ActionIntent {
            ActionIntent::new(actor_name, self.0)
        }
    }

    fn campaign(hps: &[i32]) -> CampaignState {
        let party = hps
            .iter()
            .enumerate()
            .map(|(i, hp)| Character::new(format!("Hero{i}"), *hp))
            .collect();
        CampaignState::new("Barovia", "Chapter 1", party)
            .with_encounters(vec![Encounter::new("gate", "Gates", 2, "Iron bars.")])
    }

    fn engine(delta: i32, action: Action) -> SessionEngine {
        SessionEngine::new(
            Box::new(FixedRuleset(delta)),
            Box::new(SimpleDirector::new(1)),
            Box::new(Always(action)),
        )
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut e = engine(0, Action::Rest);
        assert!(matches!(e.run(campaign(&[5]), 0), Err(SimError::ZeroTurns)));
        assert!(matches!(e.run(campaign(&[]), 3), Err(SimError::EmptyParty)));
        assert!(matches!(e.run(campaign(&[5, -1]), 3), Err(SimError::InvalidParty(_))));
        assert_eq!(e.status(), SessionStatus::NotStarted);
    }

    #[test]
    fn runs_full_budget() {
        let mut e = engine(0, Action::Rest);
        let result = e.run(campaign(&[5, 6]), 4).unwrap();
        assert_eq!(result.total_turns, 4);
        assert_eq!(result.turns.len(), 4);
        assert_eq!(result.ending, SessionEnding::Completed);
        assert_eq!(result.final_state.turn_index, 4);
        assert_eq!(result.final_state.log.len(), 8);
        assert_eq!(result.final_state.log[0], "Turn 1: Hero0 does rest");
        assert_eq!(result.final_state.flags.latest_discovery.as_deref(), Some("seen"));
        assert_eq!(e.status(), SessionStatus::Completed);
    }

    #[test]
    fn stops_when_party_falls() {
        let mut e = engine(-2, Action::Attack);
        let result = e.run(campaign(&[3, 2]), 10).unwrap();
        assert_eq!(result.ending, SessionEnding::AllDefeated);
        assert_eq!(result.total_turns, 2);
        assert!(result.final_state.party.iter().all(|c| c.hp == 0));
        assert_eq!(
            result.final_state.log.last().map(String::as_str),
            Some("Session ended: all party members defeated")
        );
        assert_eq!(e.status(), SessionStatus::AllDefeated);
    }

    #[test]
    fn defeated_members_do_not_act() {
        let mut e = engine(0, Action::Rest);
        let result = e.run(campaign(&[0, 4]), 1).unwrap();
        assert_eq!(result.turns[0].intents.len(), 1);
        assert_eq!(result.turns[0].intents[0].actor_name, "Hero1");
    }

    #[test]
    fn unoffered_action_is_skipped() {
        let mut e = engine(0, Action::ExploitMastery);
        let result = e.run(campaign(&[5]), 2).unwrap();
        assert!(result.turns.iter().all(|t| t.intents.is_empty()));
        assert_eq!(result.final_state.log[0], "Turn 1: Hero0 submitted invalid action");
        assert_eq!(result.final_state.party[0].hp, 5);
    }

    #[test]
    fn continues_turn_numbering() {
        let mut e = engine(0, Action::Defend);
        let mut c = campaign(&[5]);
        c.turn_index = 5;
        let result = e.run(c, 2).unwrap();
        assert_eq!(result.total_turns, 2);
        assert_eq!(result.turns[0].turn_index, 6);
        assert_eq!(result.final_state.turn_index, 7);
    }

    #[test]
    fn hp_never_negative() {
        let mut e = engine(-50, Action::Attack);
        let result = e.run(campaign(&[1]), 3).unwrap();
        assert_eq!(result.final_state.party[0].hp, 0);
    }

    #[test]
    fn from_config_matches_vocabulary() {
        let config = SessionConfig::default().with_ruleset(RulesetKind::Extended);
        let mut e = SessionEngine::from_config(&config, &SrdContent::default(), PolicyProfile::default());
        let result = e.run(campaign(&[12]), 3).unwrap();
        assert!(result.turns[0].scene_prompt.contains("SRD context"));
        assert!(e.director_assist().is_none());
        assert!(e.actor_assist().is_none());
    }

    /// Records the guidance it is sent and never answers.
    #[derive(Debug, Default)]
    struct Silent(std::rc::Rc<std::cell::RefCell<Vec<Option<String>>>>);

    impl SceneClient for Silent {
        fn propose_scene(
            &mut self,
            request: &crate::assist::SceneRequest,
        ) -> Result<crate::assist::SceneReply, crate::error::AssistError> {
            self.0.borrow_mut().push(request.guidance.clone());
            Err(crate::error::AssistError::Unavailable("offline".into()))
        }
    }

    impl DecisionClient for Silent {
        fn decide(
            &mut self,
            request: &crate::assist::DecisionRequest,
        ) -> Result<crate::assist::DecisionReply, crate::error::AssistError> {
            self.0.borrow_mut().push(request.guidance.clone());
            Err(crate::error::AssistError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn assisted_engine_forwards_guidance() {
        let profile = PolicyProfile::from_json(
            r#"{"campaign": {"director_guidance": "gothic dread", "actor_guidance": "protect the villagers"}}"#,
        )
        .unwrap();
        let scenes = Silent::default();
        let decisions = Silent::default();
        let (scene_seen, decision_seen) = (scenes.0.clone(), decisions.0.clone());

        let config = SessionConfig::default().with_seed(3);
        let mut e = SessionEngine::assisted(&config, &SrdContent::default(), profile, scenes, decisions);
        e.run(campaign(&[12, 9]), 2).unwrap();

        assert_eq!(scene_seen.borrow().len(), 2);
        assert!(scene_seen.borrow().iter().all(|g| g.as_deref() == Some("gothic dread")));
        assert_eq!(decision_seen.borrow().len(), 4);
        assert!(
            decision_seen
                .borrow()
                .iter()
                .all(|g| g.as_deref() == Some("protect the villagers"))
        );
        assert_eq!(e.actor_assist().map(|s| s.fallbacks), Some(4));
        assert_eq!(e.director_assist().map(|s| s.fallbacks), Some(2));
    }

    #[test]
    fn offline_collaborators_change_nothing() {
        let config = SessionConfig::default().with_seed(11);
        let plain = SessionEngine::from_config(&config, &SrdContent::default(), PolicyProfile::default())
            .run(campaign(&[12, 9]), 4)
            .unwrap();
        let assisted = SessionEngine::assisted(
            &config,
            &SrdContent::default(),
            PolicyProfile::default(),
            Silent::default(),
            Silent::default(),
        )
        .run(campaign(&[12, 9]), 4)
        .unwrap();
        assert_eq!(assisted, plain);
    }
}
