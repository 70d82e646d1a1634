//! Weighted action scoring.
//!
//! [`score_options`] is a pure function of the scene's options, the
//! character's resolved policy, the campaign policy, and a [`Situation`]
//! snapshot. Only [`select`] touches randomness, and only to break ties
//! the policy's tie-breaker list leaves open.

use ql_core::{Action, CampaignState, Character, Dice};

use super::policy::{CampaignPolicy, ResolvedPolicy};

/// Starting score for every legal option.
pub const BASE_SCORE: f64 = 1.0;
/// Scores closer than this are tied.
pub const TIE_EPSILON: f64 = 1e-9;
/// Hit points at or below which the retreat nudge applies.
pub const LOW_HP: i32 = 3;

const PREFERRED_BONUS: f64 = 0.35;
const AVOID_PENALTY: f64 = 0.45;

const FACE_WORDS: [&str; 3] = ["face", "diplomat", "charisma"];
const STRIKER_CLASSES: [&str; 4] = ["fighter", "barbarian", "paladin", "ranger"];
const SCHOLAR_CLASSES: [&str; 4] = ["wizard", "cleric", "rogue", "bard"];
const MASTERY_CLASSES: [&str; 3] = ["fighter", "barbarian", "ranger"];

/// The state the heuristics read for one character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Situation {
    /// Current hit points.
    pub hp: i32,
    /// Whether the party has found a clue.
    pub discovery_made: bool,
    /// Lowercased role and personality.
    pub role_text: String,
    /// Lowercased class.
    pub class_text: String,
    /// Whether the character has a background.
    pub has_background: bool,
}

impl Situation {
    /// Snapshot `member` within `campaign`.
    pub fn of(campaign: &CampaignState, member: &Character) -> Self {
        Self {
            hp: member.hp,
            discovery_made: campaign.flags.discovery_made(),
            role_text: format!("{} {}", member.role, member.personality).to_lowercase(),
            class_text: member.char_class.to_lowercase(),
            has_background: !member.background.is_empty(),
        }
    }
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Score every distinct option, in scene order.
pub fn score_options(
    options: &[Action],
    policy: &ResolvedPolicy,
    campaign: &CampaignPolicy,
    situation: &Situation,
) -> Vec<(Action, f64)> {
    let mut scores: Vec<(Action, f64)> = Vec::with_capacity(options.len());
    for &option in options {
        if !scores.iter().any(|(a, _)| *a == option) {
            scores.push((option, BASE_SCORE));
        }
    }
    let mut nudge = |action: Action, amount: f64| {
        if let Some((_, score)) = scores.iter_mut().find(|(a, _)| *a == action) {
            *score += amount;
        }
    };

    for (&action, &weight) in &policy.priorities {
        nudge(action, weight);
    }

    if situation.hp <= LOW_HP {
        nudge(Action::Rest, 2.5 + policy.caution);
        nudge(Action::Defend, 1.5 + policy.caution);
        nudge(Action::Attack, -1.0);
    }

    if !situation.discovery_made {
        nudge(Action::Investigate, 1.5 + policy.exploration);
    }

    if mentions(&situation.role_text, &FACE_WORDS) {
        nudge(Action::Negotiate, 1.2);
    }
    if mentions(&situation.class_text, &STRIKER_CLASSES) {
        nudge(Action::Attack, 1.2 + policy.aggression);
    }
    if mentions(&situation.class_text, &SCHOLAR_CLASSES) {
        nudge(Action::Investigate, 1.0 + policy.exploration);
    }
    if mentions(&situation.class_text, &MASTERY_CLASSES) {
        nudge(Action::ExploitMastery, 1.0 + policy.aggression);
    }
    if situation.has_background {
        nudge(Action::UseEquipment, 0.6);
    }

    for action in campaign.preferred_actions.iter().filter_map(|t| Action::parse(t)) {
        nudge(action, PREFERRED_BONUS);
    }
    for action in campaign.avoid_actions.iter().filter_map(|t| Action::parse(t)) {
        nudge(action, -AVOID_PENALTY);
    }

    scores
}

/// Pick the best-scoring action.
///
/// Ties go to the first tied entry of `tie_breaker`, then to a seeded
/// uniform pick among the tied options in scene order. `None` only when
/// `scores` is empty.
pub fn select(scores: &[(Action, f64)], tie_breaker: &[Action], dice: &mut Dice) -> Option<Action> {
    let best = scores
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<Action> = scores
        .iter()
        .filter(|(_, s)| (best - s).abs() <= TIE_EPSILON)
        .map(|(a, _)| *a)
        .collect();

    match tied.as_slice() {
        [] => None,
        [only] => Some(*only),
        _ => tie_breaker
            .iter()
            .find(|a| tied.contains(a))
            .copied()
            .or_else(|| dice.pick(&tied).copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn situation(hp: i32) -> Situation {
        Situation {
            hp,
            discovery_made: false,
            ..Situation::default()
        }
    }

    fn score_of(scores: &[(Action, f64)], action: Action) -> f64 {
        scores.iter().find(|(a, _)| *a == action).map(|(_, s)| *s).unwrap()
    }

    #[test]
    fn low_hp_prefers_rest() {
        let policy = ResolvedPolicy {
            caution: 0.8,
            ..ResolvedPolicy::default()
        };
        let scores = score_options(&Action::GENERIC, &policy, &CampaignPolicy::default(), &situation(2));
        let mut dice = Dice::seeded(42);
        assert_eq!(select(&scores, &[], &mut dice), Some(Action::Rest));
        assert!((score_of(&scores, Action::Rest) - 4.3).abs() < 1e-9);
        assert!((score_of(&scores, Action::Attack) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn undiscovered_clue_beats_attack_for_non_combat_class() {
        let s = Situation {
            hp: 10,
            class_text: "sorcerer".into(),
            ..Situation::default()
        };
        let scores = score_options(&Action::GENERIC, &ResolvedPolicy::default(), &CampaignPolicy::default(), &s);
        let mut dice = Dice::seeded(1);
        assert_eq!(select(&scores, &[], &mut dice), Some(Action::Investigate));
    }

    #[test]
    fn class_keywords_apply() {
        let s = Situation {
            hp: 10,
            discovery_made: true,
            class_text: "ranger".into(),
            role_text: "striker grim".into(),
            has_background: true,
        };
        let scores = score_options(&Action::EXTENDED, &ResolvedPolicy::default(), &CampaignPolicy::default(), &s);
        assert!((score_of(&scores, Action::Attack) - 2.7).abs() < 1e-9);
        assert!((score_of(&scores, Action::ExploitMastery) - 2.5).abs() < 1e-9);
        assert!((score_of(&scores, Action::UseEquipment) - 1.6).abs() < 1e-9);
        assert!((score_of(&scores, Action::Investigate) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn campaign_nudges_only_touch_offered_options() {
        let campaign = CampaignPolicy {
            preferred_actions: vec!["negotiate".into(), "use-equipment".into()],
            avoid_actions: vec!["attack".into(), "bogus".into()],
            ..CampaignPolicy::default()
        };
        let s = Situation {
            hp: 10,
            discovery_made: true,
            ..Situation::default()
        };
        let scores = score_options(&Action::GENERIC, &ResolvedPolicy::default(), &campaign, &s);
        assert_eq!(scores.len(), 5);
        assert!((score_of(&scores, Action::Negotiate) - 1.35).abs() < 1e-9);
        assert!((score_of(&scores, Action::Attack) - 0.55).abs() < 1e-9);
        assert!(scores.iter().all(|(a, _)| *a != Action::UseEquipment));
    }

    #[test]
    fn tie_breaker_resolves_ties() {
        let scores = vec![(Action::Attack, 1.0), (Action::Defend, 1.0), (Action::Rest, 0.5)];
        let mut dice = Dice::seeded(3);
        assert_eq!(
            select(&scores, &[Action::Rest, Action::Defend, Action::Attack], &mut dice),
            Some(Action::Defend)
        );
    }

    #[test]
    fn empty_scores_select_nothing() {
        let mut dice = Dice::seeded(3);
        assert_eq!(select(&[], &[], &mut dice), None);
    }

    #[test]
    fn duplicate_options_are_scored_once() {
        let options = [Action::Attack, Action::Attack, Action::Rest];
        let scores = score_options(&options, &ResolvedPolicy::default(), &CampaignPolicy::default(), &situation(10));
        assert_eq!(scores.len(), 2);
    }

    fn any_action() -> impl Strategy<Value = Action> {
        prop::sample::select(Action::EXTENDED.to_vec())
    }

    fn any_policy() -> impl Strategy<Value = ResolvedPolicy> {
        (
            -2.0..2.0f64,
            -2.0..2.0f64,
            -2.0..2.0f64,
            prop::collection::btree_map(any_action(), -3.0..3.0f64, 0..4),
            prop::collection::vec(any_action(), 0..3),
        )
            .prop_map(|(caution, aggression, exploration, priorities, tie_breaker)| ResolvedPolicy {
                caution,
                aggression,
                exploration,
                priorities,
                tie_breaker,
            })
    }

    proptest! {
        #[test]
        fn always_picks_an_offered_option(
            options in prop::collection::vec(any_action(), 1..7),
            policy in any_policy(),
            hp in 0..20i32,
            discovery_made in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let s = Situation { hp, discovery_made, class_text: "fighter".into(), ..Situation::default() };
            let scores = score_options(&options, &policy, &CampaignPolicy::default(), &s);
            let picked = select(&scores, &policy.tie_breaker, &mut Dice::seeded(seed));
            prop_assert!(picked.is_some_and(|a| options.contains(&a)));
        }

        #[test]
        fn tie_break_is_deterministic(
            options in prop::collection::vec(any_action(), 1..7),
            seed in any::<u64>(),
        ) {
            let scores: Vec<(Action, f64)> = options.iter().map(|a| (*a, 1.0)).collect();
            let a = select(&scores, &[], &mut Dice::seeded(seed));
            let b = select(&scores, &[], &mut Dice::seeded(seed));
            prop_assert_eq!(a, b);
        }
    }
}
