//! Episode export: turns a session into a package of scene cards plus a
//! narration script and an image prompt sheet.

use std::path::{Path, PathBuf};

use ql_core::{SessionResult, TurnResult};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// File name of the JSON package.
pub const EPISODE_FILE: &str = "episode_package.json";
/// File name of the narration script.
pub const SCRIPT_FILE: &str = "narration_script.txt";
/// File name of the image prompt sheet.
pub const IMAGE_PROMPTS_FILE: &str = "image_prompts.txt";

const VOICE_HINT: &str = "Narrator, calm cinematic tone, medium pacing";

/// One turn, ready to narrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCard {
    /// Turn number.
    pub turn_index: u32,
    /// Card title.
    pub title: String,
    /// Full narration for the turn.
    pub narration: String,
    /// `name: action` lines.
    pub actions: Vec<String>,
    /// Outcome summaries.
    pub outcomes: Vec<String>,
    /// Prompt for an illustration.
    pub image_prompt: String,
    /// Hint for a narrator voice.
    pub voice_hint: String,
}

/// A whole session as an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePackage {
    /// Episode title.
    pub episode_title: String,
    /// Setting name.
    pub setting_name: String,
    /// Seed the session ran with.
    pub seed: u64,
    /// Turns executed.
    pub total_turns: u32,
    /// Roster and final condition.
    pub summary: String,
    /// One card per turn.
    pub scene_cards: Vec<SceneCard>,
}

/// Paths written by [`EpisodePackage::write_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// The JSON package.
    pub episode_json: PathBuf,
    /// The narration script.
    pub script: PathBuf,
    /// The image prompt sheet.
    pub image_prompts: PathBuf,
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

fn joined_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join("; ")
    }
}

impl SceneCard {
    fn from_turn(turn: &TurnResult) -> Self {
        let actions: Vec<String> = turn
            .intents
            .iter()
            .map(|i| format!("{}: {}", i.actor_name, i.action))
            .collect();
        let outcomes: Vec<String> = turn.outcomes.iter().map(|o| o.summary.clone()).collect();
        let narration = format!(
            "Scene {}. {} The party acts: {}. Outcomes: {}.",
            turn.turn_index,
            turn.scene_prompt,
            joined_or(&actions, "No action recorded"),
            joined_or(&outcomes, "No outcomes recorded"),
        );
        let image_prompt = format!(
            "Cinematic fantasy scene, turn {}. {}. Mood-rich lighting, dramatic composition, \
             detailed environment, narrative realism.",
            turn.turn_index, turn.scene_prompt
        );
        Self {
            turn_index: turn.turn_index,
            title: format!("Turn {}", turn.turn_index),
            narration,
            actions,
            outcomes,
            image_prompt,
            voice_hint: VOICE_HINT.to_string(),
        }
    }
}

impl EpisodePackage {
    /// Build the package for a session run with `seed`.
    pub fn build(result: &SessionResult, seed: u64) -> Self {
        let party = &result.final_state.party;
        let roster = party
            .iter()
            .map(|m| {
                format!(
                    "{} ({}/{}/{})",
                    m.name,
                    or(&m.char_class, "Adventurer"),
                    or(&m.role, "generalist"),
                    or(&m.background, "unknown background"),
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        let final_hp = party
            .iter()
            .map(|m| format!("{}: {} HP", m.name, m.hp))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            episode_title: format!("{} - Simulated Episode (Seed {seed})", result.setting_name),
            setting_name: result.setting_name.clone(),
            seed,
            total_turns: result.total_turns,
            summary: format!(
                "Party roster: {roster}. Automated session complete in {} turns. \
                 Final party condition: {final_hp}.",
                result.total_turns
            ),
            scene_cards: result.turns.iter().map(SceneCard::from_turn).collect(),
        }
    }

    /// Title, summary, then each card's narration.
    pub fn narration_script(&self) -> String {
        let mut lines = vec![self.episode_title.clone(), String::new(), self.summary.clone(), String::new()];
        for card in &self.scene_cards {
            lines.push(format!("[{}]", card.title));
            lines.push(card.narration.clone());
            lines.push(String::new());
        }
        format!("{}\n", lines.join("\n").trim())
    }

    /// Title, then one image prompt per card.
    pub fn image_prompt_sheet(&self) -> String {
        let mut lines = vec![self.episode_title.clone(), String::new()];
        lines.extend(
            self.scene_cards
                .iter()
                .map(|c| format!("{}: {}", c.title, c.image_prompt)),
        );
        format!("{}\n", lines.join("\n").trim())
    }

    /// Write the package, script, and prompt sheet into `dir`.
    pub fn write_to(&self, dir: &Path) -> SimResult<ExportPaths> {
        std::fs::create_dir_all(dir).map_err(|source| SimError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let paths = ExportPaths {
            episode_json: dir.join(EPISODE_FILE),
            script: dir.join(SCRIPT_FILE),
            image_prompts: dir.join(IMAGE_PROMPTS_FILE),
        };
        write(&paths.episode_json, &serde_json::to_string_pretty(self)?)?;
        write(&paths.script, &self.narration_script())?;
        write(&paths.image_prompts, &self.image_prompt_sheet())?;
        tracing::info!(dir = %dir.display(), cards = self.scene_cards.len(), "exported episode");
        Ok(paths)
    }
}

fn write(path: &Path, contents: &str) -> SimResult<()> {
    std::fs::write(path, contents).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}
