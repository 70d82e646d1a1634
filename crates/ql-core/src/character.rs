//! Party members and the encounters they move through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A party member.
///
/// Characters are never removed from the party. One at 0 hp is simply
/// skipped when the turn comes around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Unique within a party.
    pub name: String,
    /// Current hit points, never below 0.
    pub hp: i32,
    /// Upper bound for healing, when the loader models one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,
    /// Named integer attributes.
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Party role, e.g. "face" or "frontliner".
    #[serde(default)]
    pub role: String,
    /// Character class, e.g. "Fighter".
    #[serde(default)]
    pub char_class: String,
    /// Background, e.g. "Sage".
    #[serde(default)]
    pub background: String,
    /// Personality sketch.
    #[serde(default)]
    pub personality: String,
    /// Personal goal.
    #[serde(default)]
    pub goal: String,
    /// Character flaw.
    #[serde(default)]
    pub flaw: String,
}

impl Character {
    /// Create a character with a name and hit points; everything else empty.
    pub fn new(name: impl Into<String>, hp: i32) -> Self {
        Self {
            name: name.into(),
            hp,
            max_hp: None,
            stats: BTreeMap::new(),
            tags: Vec::new(),
            role: String::new(),
            char_class: String::new(),
            background: String::new(),
            personality: String::new(),
            goal: String::new(),
            flaw: String::new(),
        }
    }

    /// Set the class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.char_class = class.into();
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the background.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the personality.
    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    /// Cap healing at `max_hp`.
    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    /// Whether the character still acts.
    pub fn is_active(&self) -> bool {
        self.hp > 0
    }

    /// Apply an hp change, clamping into `[0, max_hp]`.
    pub fn apply_hp_delta(&mut self, delta: i32) {
        let mut hp = self.hp.saturating_add(delta).max(0);
        if let Some(max) = self.max_hp {
            // Never heal past the cap, but don't undo damage already above it.
            hp = hp.min(max.max(self.hp));
        }
        self.hp = hp;
    }
}

/// A static scenario descriptor the director cycles through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Stable identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Threat level.
    pub threat: i32,
    /// Scene description.
    pub description: String,
}

impl Encounter {
    /// Create an encounter.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        threat: i32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            threat,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_never_goes_negative() {
        let mut c = Character::new("Kael", 1);
        c.apply_hp_delta(-5);
        assert_eq!(c.hp, 0);
        assert!(!c.is_active());
    }

    #[test]
    fn healing_respects_max() {
        let mut c = Character::new("Mira", 9).with_max_hp(10);
        c.apply_hp_delta(1);
        c.apply_hp_delta(1);
        assert_eq!(c.hp, 10);
    }

    #[test]
    fn healing_without_max_is_unbounded() {
        let mut c = Character::new("Fen", 14);
        c.apply_hp_delta(1);
        assert_eq!(c.hp, 15);
    }

    #[test]
    fn deserializes_minimal_record() {
        let c: Character = serde_json::from_str(r#"{"name":"Iris","hp":9}"#).unwrap();
        assert_eq!(c.name, "Iris");
        assert!(c.stats.is_empty());
        assert!(c.char_class.is_empty());
        assert_eq!(c.max_hp, None);
    }

    proptest::proptest! {
        #[test]
        fn hp_stays_within_bounds(
            start in 0i32..40,
            max in proptest::option::of(1i32..40),
            deltas in proptest::collection::vec(-10i32..10, 0..30),
        ) {
            let mut c = Character::new("Kael", start);
            c.max_hp = max;
            for delta in deltas {
                let before = c.hp;
                c.apply_hp_delta(delta);
                proptest::prop_assert!(c.hp >= 0);
                if let Some(max) = max {
                    proptest::prop_assert!(c.hp <= max.max(before));
                }
            }
        }
    }
}
