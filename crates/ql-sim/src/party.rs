//! Seeded party generation from role templates and presets.

use std::collections::BTreeMap;

use ql_core::{Character, Dice};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Lowest hp a generated character can have.
pub const MIN_HP: i32 = 6;

/// A party role with its class and base numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTemplate {
    /// Role name.
    pub role: &'static str,
    /// Class name.
    pub char_class: &'static str,
    /// Base hit points.
    pub hp: i32,
    /// Might, grit, wit.
    pub stats: [i32; 3],
}

/// Every role a preset can draw from.
pub static ROLE_TEMPLATES: [RoleTemplate; 6] = [
    RoleTemplate { role: "frontliner", char_class: "Fighter", hp: 14, stats: [4, 3, 1] },
    RoleTemplate { role: "divine_support", char_class: "Cleric", hp: 12, stats: [2, 3, 3] },
    RoleTemplate { role: "arcane_control", char_class: "Wizard", hp: 9, stats: [1, 1, 5] },
    RoleTemplate { role: "scout", char_class: "Rogue", hp: 10, stats: [2, 2, 4] },
    RoleTemplate { role: "face", char_class: "Bard", hp: 10, stats: [1, 2, 4] },
    RoleTemplate { role: "striker", char_class: "Ranger", hp: 11, stats: [3, 2, 3] },
];

const STAT_NAMES: [&str; 3] = ["might", "grit", "wit"];

const NAMES: [&str; 20] = [
    "Alaric", "Brina", "Cassian", "Delia", "Ember", "Fen", "Galen", "Hale", "Iris", "Joran",
    "Kael", "Liora", "Mira", "Nolan", "Orin", "Piper", "Quill", "Rhea", "Sylas", "Tamsin",
];

const PERSONALITIES: [&str; 7] = [
    "grim but loyal",
    "curious and analytical",
    "brash and fearless",
    "quietly compassionate",
    "sardonic and pragmatic",
    "optimistic despite danger",
    "ritualistic and disciplined",
];

const GOALS: [&str; 5] = [
    "break Strahd's hold over Barovia",
    "recover a lost family relic",
    "protect innocents trapped in the valley",
    "uncover the true history of Castle Ravenloft",
    "redeem a past failure",
];

const FLAWS: [&str; 6] = [
    "overconfident in battle",
    "cannot resist a mystery",
    "trusts too slowly",
    "acts before planning",
    "haunted by nightmares",
    "too protective of allies",
];

const DEFAULT_BACKGROUNDS: [&str; 4] = ["Acolyte", "Criminal", "Sage", "Soldier"];

/// A named party composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartyPreset {
    /// One of each role.
    #[default]
    Balanced,
    /// Fewer casters, thinner hp.
    Hardcore,
    /// Talkers and thinkers.
    StoryHeavy,
    /// Two fighters, two clerics, extra hp.
    CosSurvival,
}

impl PartyPreset {
    /// Every preset, in display order.
    pub const ALL: [PartyPreset; 4] = [
        Self::Balanced,
        Self::Hardcore,
        Self::StoryHeavy,
        Self::CosSurvival,
    ];

    /// The preset's name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Hardcore => "hardcore",
            Self::StoryHeavy => "story-heavy",
            Self::CosSurvival => "cos-survival",
        }
    }

    /// Roles drawn, in template order before shuffling.
    pub fn roles(self) -> &'static [&'static str] {
        match self {
            Self::Balanced => &["frontliner", "divine_support", "arcane_control", "scout", "face", "striker"],
            Self::Hardcore => &["frontliner", "frontliner", "divine_support", "striker", "scout"],
            Self::StoryHeavy => &["face", "arcane_control", "divine_support", "scout", "striker"],
            Self::CosSurvival => &["frontliner", "frontliner", "divine_support", "divine_support", "striker"],
        }
    }

    /// Added to every template's hp.
    pub fn hp_delta(self) -> i32 {
        match self {
            Self::Balanced | Self::StoryHeavy => 0,
            Self::Hardcore => -1,
            Self::CosSurvival => 2,
        }
    }

    /// Personalities drawn from.
    pub fn personalities(self) -> &'static [&'static str] {
        match self {
            Self::Balanced => &PERSONALITIES,
            Self::Hardcore => &[
                "grim but loyal",
                "sardonic and pragmatic",
                "ritualistic and disciplined",
                "brash and fearless",
            ],
            Self::StoryHeavy => &[
                "quietly compassionate",
                "curious and analytical",
                "optimistic despite danger",
                "cannot stop cataloging omens",
                "soft-spoken but relentless",
            ],
            Self::CosSurvival => &[
                "grim but loyal",
                "ritualistic and disciplined",
                "quietly compassionate",
                "sardonic and pragmatic",
            ],
        }
    }
}

impl std::fmt::Display for PartyPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartyPreset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}

fn template(role: &str) -> Option<&'static RoleTemplate> {
    ROLE_TEMPLATES.iter().find(|t| t.role == role)
}

/// Generate `size` characters.
///
/// Roles cycle when `size` exceeds the preset. Names cycle too, with a
/// numeral suffix from the second pass on ("Iris II"), so every name in the
/// party stays unique. Backgrounds come
/// from `backgrounds` when non-empty. Every character gets `max_hp` set to
/// its starting hp.
pub fn generate_party(
    size: usize,
    seed: u64,
    preset: PartyPreset,
    backgrounds: &[String],
) -> SimResult<Vec<Character>> {
    if size == 0 {
        return Err(SimError::InvalidPartySize);
    }
    let mut dice = Dice::seeded(seed);

    let mut templates: Vec<&RoleTemplate> = preset.roles().iter().filter_map(|r| template(r)).collect();
    dice.shuffle(&mut templates);
    let mut names = NAMES;
    dice.shuffle(&mut names);

    let backgrounds: Vec<&str> = if backgrounds.is_empty() {
        DEFAULT_BACKGROUNDS.to_vec()
    } else {
        backgrounds.iter().map(String::as_str).collect()
    };

    let mut party = Vec::with_capacity(size);
    for index in 0..size {
        let t = templates[index % templates.len()];
        let name = party_name(&names, index);
        let background = pick(&mut dice, &backgrounds);
        let personality = pick(&mut dice, preset.personalities());
        let goal = pick(&mut dice, &GOALS);
        let flaw = pick(&mut dice, &FLAWS);
        let hp = (t.hp + preset.hp_delta()).max(MIN_HP);

        let mut member = Character::new(name, hp)
            .with_max_hp(hp)
            .with_role(t.role)
            .with_class(t.char_class)
            .with_background(background)
            .with_personality(personality);
        member.stats = STAT_NAMES
            .iter()
            .zip(t.stats)
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>();
        member.tags = vec![
            t.role.to_string(),
            t.char_class.to_lowercase(),
            format!("preset:{preset}"),
        ];
        member.goal = goal.to_string();
        member.flaw = flaw.to_string();
        party.push(member);
    }
    tracing::debug!(size, seed, %preset, "generated party");
    Ok(party)
}

fn party_name(names: &[&str], index: usize) -> String {
    let base = names[index % names.len()];
    match index / names.len() {
        0 => base.to_string(),
        pass => format!("{base} {}", roman(pass + 1)),
    }
}

fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "M"), (900, "CM"), (500, "D"), (400, "CD"), (100, "C"), (90, "XC"),
        (50, "L"), (40, "XL"), (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

fn pick<'a>(dice: &mut Dice, items: &[&'a str]) -> &'a str {
    dice.pick(items).copied().unwrap_or_default()
}
