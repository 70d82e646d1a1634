//! Decorators that let an external collaborator (for example a language
//! model) propose scenes and decisions.
//!
//! The collaborator is reached through [`SceneClient`] or
//! [`DecisionClient`]. Replies are sanitized against the wrapped
//! deterministic component's output. On any failure the decorator returns
//! that output unchanged, so a session with a broken collaborator is
//! indistinguishable from one without it. Failures are counted in
//! [`AssistStatus`] and never abort a run.

use std::collections::BTreeMap;

use ql_core::{Action, ActionIntent, CampaignFlags, CampaignState, Character, Scene};
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::director::Director;
use crate::error::AssistError;

/// Most options a collaborator may put in a scene.
pub const MAX_OPTIONS: usize = 8;
/// Log lines sent with a scene request.
pub const SCENE_LOG_WINDOW: usize = 6;
/// Log lines sent with a decision request.
pub const DECISION_LOG_WINDOW: usize = 4;

/// Counters for one decorator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistStatus {
    /// Calls made to the collaborator.
    pub attempts: u32,
    /// Calls whose reply was discarded in favor of the fallback.
    pub fallbacks: u32,
    /// The most recent failure.
    pub last_error: Option<AssistError>,
}

impl AssistStatus {
    fn record_failure(&mut self, component: &str, error: AssistError) {
        tracing::warn!(component, %error, "collaborator failed, using fallback");
        self.fallbacks += 1;
        self.last_error = Some(error);
    }
}

/// A party member as the collaborator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    /// Character name.
    pub name: String,
    /// Current hit points.
    pub hp: i32,
    /// Party role.
    pub role: String,
    /// Character class.
    pub class: String,
    /// Personal goal.
    pub goal: String,
}

impl From<&Character> for MemberView {
    fn from(c: &Character) -> Self {
        Self {
            name: c.name.clone(),
            hp: c.hp,
            role: c.role.clone(),
            class: c.char_class.clone(),
            goal: c.goal.clone(),
        }
    }
}

/// What a scene collaborator is asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRequest {
    /// Setting name.
    pub setting: String,
    /// Chapter label.
    pub chapter: String,
    /// Turn being built.
    pub turn_index: u32,
    /// Party snapshot.
    pub party: Vec<MemberView>,
    /// Current flags.
    pub flags: CampaignFlags,
    /// Most recent log lines.
    pub recent_log: Vec<String>,
    /// The deterministic scene the reply must stay compatible with.
    pub fallback_scene: Scene,
    /// Optional tone cue.
    pub guidance: Option<String>,
}

/// A scene collaborator's answer, before sanitizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneReply {
    /// Proposed prompt.
    #[serde(default)]
    pub prompt: String,
    /// Proposed option tokens.
    #[serde(default)]
    pub options: Vec<String>,
}

/// What a decision collaborator is asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The acting character.
    pub actor: Character,
    /// Scene prompt.
    pub scene: String,
    /// Legal actions.
    pub allowed_actions: Vec<Action>,
    /// Hit points of the whole party.
    pub party_hp: BTreeMap<String, i32>,
    /// Current flags.
    pub flags: CampaignFlags,
    /// Most recent log lines.
    pub recent_log: Vec<String>,
    /// The deterministic choice.
    pub fallback_action: Action,
    /// Optional tone cue.
    pub guidance: Option<String>,
}

/// A decision collaborator's answer, before sanitizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReply {
    /// Proposed action token.
    pub action: String,
    /// Optional target.
    #[serde(default)]
    pub target: Option<String>,
}

/// Source of proposed scenes.
pub trait SceneClient: std::fmt::Debug {
    /// Propose a scene.
    fn propose_scene(&mut self, request: &SceneRequest) -> Result<SceneReply, AssistError>;
}

/// Source of proposed decisions.
pub trait DecisionClient: std::fmt::Debug {
    /// Propose an action.
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionReply, AssistError>;
}

/// Trim, drop empties and duplicates, and cap at [`MAX_OPTIONS`].
pub fn clean_options(raw: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for option in raw {
        let token = option.trim();
        if !token.is_empty() && !cleaned.iter().any(|c| c == token) {
            cleaned.push(token.to_string());
        }
    }
    cleaned.truncate(MAX_OPTIONS);
    cleaned
}

/// Keep only the reply parts compatible with `fallback`.
///
/// An empty prompt falls back to the deterministic prompt; options are
/// limited to those the fallback scene offers. A reply with neither a
/// prompt nor a usable option is malformed.
pub fn sanitize_scene(reply: &SceneReply, fallback: &Scene) -> Result<Scene, AssistError> {
    let options: Vec<Action> = clean_options(&reply.options)
        .iter()
        .filter_map(|token| Action::parse(token))
        .filter(|action| fallback.offers(*action))
        .collect();
    let prompt = reply.prompt.trim();

    if prompt.is_empty() && options.is_empty() {
        return Err(AssistError::Malformed("no prompt and no usable options".into()));
    }
    let prompt = if prompt.is_empty() {
        fallback.prompt.clone()
    } else {
        prompt.to_string()
    };
    let options = if options.is_empty() {
        fallback.options.clone()
    } else {
        options
    };
    Ok(Scene::new(prompt, options))
}

/// Wraps a director with a scene collaborator.
#[derive(Debug)]
pub struct AssistedDirector<D, C> {
    fallback: D,
    client: C,
    guidance: Option<String>,
    status: AssistStatus,
}

impl<D: Director, C: SceneClient> AssistedDirector<D, C> {
    /// Decorate `fallback` with `client`.
    pub fn new(fallback: D, client: C) -> Self {
        Self {
            fallback,
            client,
            guidance: None,
            status: AssistStatus::default(),
        }
    }

    /// Forward a tone cue to the collaborator.
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    /// Counters so far.
    pub fn status(&self) -> &AssistStatus {
        &self.status
    }
}

impl<D: Director, C: SceneClient> Director for AssistedDirector<D, C> {
    fn name(&self) -> &str {
        "assisted"
    }

    fn build_scene(&mut self, campaign: &CampaignState) -> Scene {
        let fallback = self.fallback.build_scene(campaign);
        let request = SceneRequest {
            setting: campaign.setting_name.clone(),
            chapter: campaign.chapter.clone(),
            turn_index: campaign.turn_index,
            party: campaign.party.iter().map(MemberView::from).collect(),
            flags: campaign.flags.clone(),
            recent_log: campaign.recent_log(SCENE_LOG_WINDOW).to_vec(),
            fallback_scene: fallback.clone(),
            guidance: self.guidance.clone(),
        };

        self.status.attempts += 1;
        match self
            .client
            .propose_scene(&request)
            .and_then(|reply| sanitize_scene(&reply, &fallback))
        {
            Ok(scene) => scene,
            Err(error) => {
                self.status.record_failure("director", error);
                fallback
            }
        }
    }

    fn assist_status(&self) -> Option<&AssistStatus> {
        Some(&self.status)
    }
}

/// Wraps an actor with a decision collaborator.
#[derive(Debug)]
pub struct AssistedActor<A, C> {
    fallback: A,
    client: C,
    guidance: Option<String>,
    status: AssistStatus,
}

impl<A: Actor, C: DecisionClient> AssistedActor<A, C> {
    /// Decorate `fallback` with `client`.
    pub fn new(fallback: A, client: C) -> Self {
        Self {
            fallback,
            client,
            guidance: None,
            status: AssistStatus::default(),
        }
    }

    /// Forward a tone cue to the collaborator.
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    /// Counters so far.
    pub fn status(&self) -> &AssistStatus {
        &self.status
    }
}

impl<A: Actor, C: DecisionClient> Actor for AssistedActor<A, C> {
    fn name(&self) -> &str {
        "assisted"
    }

    fn choose_action(
        &mut self,
        campaign: &CampaignState,
        scene: &Scene,
        actor_name: &str,
    ) -> ActionIntent {
        let fallback = self.fallback.choose_action(campaign, scene, actor_name);
        let Some(member) = campaign.member(actor_name) else {
            return fallback;
        };
        let request = DecisionRequest {
            actor: member.clone(),
            scene: scene.prompt.clone(),
            allowed_actions: scene.options.clone(),
            party_hp: campaign.party.iter().map(|c| (c.name.clone(), c.hp)).collect(),
            flags: campaign.flags.clone(),
            recent_log: campaign.recent_log(DECISION_LOG_WINDOW).to_vec(),
            fallback_action: fallback.action,
            guidance: self.guidance.clone(),
        };

        self.status.attempts += 1;
        let reply = self.client.decide(&request).and_then(|reply| {
            match Action::parse(&reply.action).filter(|a| scene.offers(*a)) {
                Some(action) => Ok((action, reply.target)),
                None => Err(AssistError::Malformed(format!(
                    "action {:?} is not offered",
                    reply.action
                ))),
            }
        });
        match reply {
            Ok((action, target)) => {
                let intent = ActionIntent::new(actor_name, action);
                match target {
                    Some(target) => intent.with_target(target),
                    None => intent,
                }
            }
            Err(error) => {
                self.status.record_failure("actor", error);
                fallback
            }
        }
    }

    fn assist_status(&self) -> Option<&AssistStatus> {
        Some(&self.status)
    }
}
