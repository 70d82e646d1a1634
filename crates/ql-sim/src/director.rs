//! Directors build the scene offered to the party each turn.
//!
//! [`SimpleDirector`] cycles the campaign's encounters and offers the
//! generic vocabulary. [`SrdDirector`] adds SRD flavor and offers the
//! extended one.

use ql_core::{Action, CampaignState, Dice, Scene};
use ql_rules::SrdContent;

use crate::assist::AssistStatus;

/// Longest source excerpt appended to a scene prompt, in characters.
pub const EXCERPT_CHARS: usize = 240;

/// Builds the scene offered to the party each turn.
///
/// Called exactly once per turn. The scene's options must match the
/// vocabulary of the ruleset the director is paired with.
pub trait Director: std::fmt::Debug {
    /// Human-readable name for this director.
    fn name(&self) -> &str;

    /// Produce the scene for `campaign.turn_index`.
    fn build_scene(&mut self, campaign: &CampaignState) -> Scene;

    /// Collaborator counters, for decorators that have them.
    fn assist_status(&self) -> Option<&AssistStatus> {
        None
    }
}

impl<D: Director + ?Sized> Director for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn build_scene(&mut self, campaign: &CampaignState) -> Scene {
        (**self).build_scene(campaign)
    }

    fn assist_status(&self) -> Option<&AssistStatus> {
        (**self).assist_status()
    }
}

/// Cycles through the campaign's encounters in order.
#[derive(Debug, Clone)]
pub struct SimpleDirector {
    source_chunks: Vec<String>,
    guidance: Option<String>,
    dice: Dice,
}

impl SimpleDirector {
    /// A director offering the generic vocabulary.
    pub fn new(seed: u64) -> Self {
        Self {
            source_chunks: Vec::new(),
            guidance: None,
            dice: Dice::seeded(seed),
        }
    }

    /// Append a random source excerpt to every prompt.
    pub fn with_source_chunks(mut self, chunks: Vec<String>) -> Self {
        self.source_chunks = chunks;
        self
    }

    /// Append a tone cue to every prompt.
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = non_empty(guidance.into());
        self
    }
}

impl Director for SimpleDirector {
    fn name(&self) -> &str {
        "simple"
    }

    fn build_scene(&mut self, campaign: &CampaignState) -> Scene {
        let mut prompt = base_prompt(campaign);
        if let Some(excerpt) = pick_excerpt(&mut self.dice, &self.source_chunks) {
            prompt.push_str(&format!(" Source excerpt: {excerpt}"));
        }
        if let Some(guidance) = &self.guidance {
            prompt.push_str(&format!(" Tone cue: {guidance}"));
        }
        tracing::debug!(turn = campaign.turn_index, "built scene");
        Scene::new(prompt, Action::GENERIC)
    }
}

/// Encounter-cycling director that adds SRD flavor and the extended vocabulary.
#[derive(Debug, Clone)]
pub struct SrdDirector {
    srd: SrdContent,
    source_chunks: Vec<String>,
    guidance: Option<String>,
    dice: Dice,
}

impl SrdDirector {
    /// A director over `srd` whose flavor picks draw from `seed`.
    pub fn new(srd: SrdContent, seed: u64) -> Self {
        Self {
            srd,
            source_chunks: Vec::new(),
            guidance: None,
            dice: Dice::seeded(seed),
        }
    }

    /// Append a random source excerpt to every prompt.
    pub fn with_source_chunks(mut self, chunks: Vec<String>) -> Self {
        self.source_chunks = chunks;
        self
    }

    /// Append a tone cue to every prompt.
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = non_empty(guidance.into());
        self
    }
}

impl Director for SrdDirector {
    fn name(&self) -> &str {
        "srd"
    }

    fn build_scene(&mut self, campaign: &CampaignState) -> Scene {
        let base = base_prompt(campaign);

        let condition = pick_name(&mut self.dice, &self.srd.conditions);
        let item = pick_name(&mut self.dice, &self.srd.equipment_names);
        let background = pick_name(&mut self.dice, &self.srd.background_names);
        let mastery = pick_name(&mut self.dice, &self.srd.mastery_property_names);

        let mut prompt = format!(
            "{base} SRD context: condition={condition}, useful_equipment={item}, \
             background_hook={background}, mastery_angle={mastery}."
        );
        if let Some(excerpt) = pick_excerpt(&mut self.dice, &self.source_chunks) {
            prompt.push_str(&format!(" Source excerpt: {excerpt}"));
        }
        if let Some(guidance) = &self.guidance {
            prompt.push_str(&format!(" Tone cue: {guidance}"));
        }
        tracing::debug!(turn = campaign.turn_index, "built SRD scene");
        Scene::new(prompt, Action::EXTENDED)
    }
}

/// The encounter line for the current turn, or the quiet-moment fallback.
pub fn base_prompt(campaign: &CampaignState) -> String {
    if campaign.encounters.is_empty() {
        return format!("{}: A quiet moment with uncertain tension.", campaign.chapter);
    }
    let index = campaign.turn_index.saturating_sub(1) as usize % campaign.encounters.len();
    let encounter = &campaign.encounters[index];
    format!(
        "{}: {}. Threat {}. {}",
        campaign.chapter, encounter.title, encounter.threat, encounter.description
    )
}

fn pick_name(dice: &mut Dice, items: &[String]) -> String {
    dice.pick(items)
        .cloned()
        .unwrap_or_else(|| "none".to_string())
}

fn pick_excerpt(dice: &mut Dice, chunks: &[String]) -> Option<String> {
    dice.pick(chunks)
        .map(|chunk| chunk.chars().take(EXCERPT_CHARS).collect())
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
