//! Post-run analysis: what went wrong in a session, and what to tune.

use ql_core::{Action, SessionResult};
use serde::{Deserialize, Serialize};

/// Recommendation when the whole party fell.
pub const REC_TPK: &str = "Lower early threat or increase safety valves to avoid full party defeat.";
/// Recommendation when the party ends badly hurt.
pub const REC_ATTRITION: &str =
    "Add healing opportunities or reduce attrition pressure between scenes.";
/// Recommendation when too many turns were purely defensive.
pub const REC_STALLED: &str = "Increase actionable hooks per scene to reduce defensive dead turns.";
/// Recommendation when no clue was found.
pub const REC_NO_CLUE: &str =
    "Seed guaranteed clue paths so investigation failures do not stall progression.";
/// Recommendation when nothing stood out.
pub const REC_STABLE: &str =
    "Current scenario appears stable in this run; test with more seeds for confidence.";

/// Average party hp below which attrition is flagged.
pub const LOW_AVERAGE_HP: f64 = 3.0;
/// Recommendations kept in a summary.
pub const TOP_RECOMMENDATIONS: usize = 5;

/// Findings for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    /// Every party member ended at 0 hp.
    pub tpk: bool,
    /// Mean final hp, rounded to two decimals.
    pub average_party_hp: f64,
    /// Turns in which someone rested.
    pub low_hp_turns: u32,
    /// Turns in which every accepted action was defend or rest.
    pub stalled_turns: u32,
    /// Whether a clue was discovered.
    pub clue_discovered: bool,
    /// Tuning advice, most severe first.
    pub recommendations: Vec<String>,
}

/// One recommendation and how many runs produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCount {
    /// The advice.
    pub recommendation: String,
    /// Runs that produced it.
    pub count: usize,
}

/// Aggregate over several runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Runs analyzed.
    pub runs: usize,
    /// Share of runs ending in a TPK, rounded to three decimals.
    pub tpk_rate: f64,
    /// Mean of the per-run average hp, rounded to two decimals.
    pub avg_final_party_hp: f64,
    /// Mean stalled turns, rounded to two decimals.
    pub avg_stalled_turns: f64,
    /// The most frequent recommendations.
    pub common_recommendations: Vec<RecommendationCount>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Analyze one session.
pub fn analyze_session(result: &SessionResult) -> RunAnalysis {
    let party = &result.final_state.party;
    let total_hp: i32 = party.iter().map(|c| c.hp).sum();
    let average_party_hp = f64::from(total_hp) / party.len().max(1) as f64;
    let tpk = party.iter().all(|c| !c.is_active());

    let mut low_hp_turns = 0;
    let mut stalled_turns = 0;
    for turn in &result.turns {
        if turn.intents.iter().any(|i| i.action == Action::Rest) {
            low_hp_turns += 1;
        }
        if !turn.intents.is_empty()
            && turn
                .intents
                .iter()
                .all(|i| matches!(i.action, Action::Rest | Action::Defend))
        {
            stalled_turns += 1;
        }
    }
    let clue_discovered = result.final_state.flags.discovery_made();

    let mut recommendations = Vec::new();
    if tpk {
        recommendations.push(REC_TPK.to_string());
    }
    if average_party_hp < LOW_AVERAGE_HP {
        recommendations.push(REC_ATTRITION.to_string());
    }
    if stalled_turns >= (result.total_turns / 3).max(1) {
        recommendations.push(REC_STALLED.to_string());
    }
    if !clue_discovered {
        recommendations.push(REC_NO_CLUE.to_string());
    }
    if recommendations.is_empty() {
        recommendations.push(REC_STABLE.to_string());
    }

    RunAnalysis {
        tpk,
        average_party_hp: round_to(average_party_hp, 2),
        low_hp_turns,
        stalled_turns,
        clue_discovered,
        recommendations,
    }
}

/// Aggregate several analyses.
pub fn summarize_analyses(analyses: &[RunAnalysis]) -> AnalysisSummary {
    if analyses.is_empty() {
        return AnalysisSummary::default();
    }
    let runs = analyses.len() as f64;
    let tpks = analyses.iter().filter(|a| a.tpk).count() as f64;
    let hp: f64 = analyses.iter().map(|a| a.average_party_hp).sum();
    let stalled: f64 = analyses.iter().map(|a| f64::from(a.stalled_turns)).sum();

    // First-seen order breaks count ties.
    let mut counts: Vec<RecommendationCount> = Vec::new();
    for rec in analyses.iter().flat_map(|a| &a.recommendations) {
        match counts.iter_mut().find(|c| &c.recommendation == rec) {
            Some(entry) => entry.count += 1,
            None => counts.push(RecommendationCount {
                recommendation: rec.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_RECOMMENDATIONS);

    AnalysisSummary {
        runs: analyses.len(),
        tpk_rate: round_to(tpks / runs, 3),
        avg_final_party_hp: round_to(hp / runs, 2),
        avg_stalled_turns: round_to(stalled / runs, 2),
        common_recommendations: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_core::{
        ActionIntent, CLUE_DISCOVERED, CampaignState, Character, SessionEnding, TurnResult,
    };

    fn turn(index: u32, actions: &[Action]) -> TurnResult {
        TurnResult {
            turn_index: index,
            scene_prompt: String::new(),
            intents: actions.iter().map(|a| ActionIntent::new("Kael", *a)).collect(),
            outcomes: Vec::new(),
        }
    }

    fn result(hps: &[i32], turns: Vec<TurnResult>, clue: bool) -> SessionResult {
        let party = hps
            .iter()
            .enumerate()
            .map(|(i, hp)| Character::new(format!("Hero{i}"), *hp))
            .collect();
        let mut state = CampaignState::new("Barovia", "Chapter 1", party);
        if clue {
            state.flags.latest_discovery = Some(CLUE_DISCOVERED.into());
        }
        SessionResult {
            setting_name: "Barovia".into(),
            total_turns: turns.len() as u32,
            ending: SessionEnding::Completed,
            final_state: state,
            turns,
        }
    }

    #[test]
    fn tpk_run_collects_every_warning() {
        let r = result(&[0, 0], vec![turn(1, &[Action::Rest]), turn(2, &[Action::Defend])], false);
        let a = analyze_session(&r);
        assert!(a.tpk);
        assert_eq!(a.average_party_hp, 0.0);
        assert_eq!(a.low_hp_turns, 1);
        assert_eq!(a.stalled_turns, 2);
        assert_eq!(a.recommendations, vec![REC_TPK, REC_ATTRITION, REC_STALLED, REC_NO_CLUE]);
    }

    #[test]
    fn healthy_run_is_stable() {
        let turns = vec![
            turn(1, &[Action::Attack]),
            turn(2, &[Action::Investigate]),
            turn(3, &[]),
        ];
        let a = analyze_session(&result(&[10, 7], turns, true));
        assert!(!a.tpk);
        assert_eq!(a.average_party_hp, 8.5);
        assert_eq!(a.stalled_turns, 0);
        assert_eq!(a.recommendations, vec![REC_STABLE]);
    }

    #[test]
    fn average_is_rounded() {
        let a = analyze_session(&result(&[1, 1, 2], vec![turn(1, &[Action::Attack])], true));
        assert_eq!(a.average_party_hp, 1.33);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(summarize_analyses(&[]), AnalysisSummary::default());
    }

    #[test]
    fn summary_counts_recommendations() {
        let tpk = analyze_session(&result(&[0], vec![turn(1, &[Action::Rest])], false));
        let ok = analyze_session(&result(&[9], vec![turn(1, &[Action::Attack])], true));
        let summary = summarize_analyses(&[tpk.clone(), ok, tpk]);
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.tpk_rate, 0.667);
        assert_eq!(summary.avg_final_party_hp, 3.0);
        assert_eq!(summary.avg_stalled_turns, 0.67);
        assert_eq!(summary.common_recommendations[0].recommendation, REC_TPK);
        assert_eq!(summary.common_recommendations[0].count, 2);
        assert_eq!(summary.common_recommendations.last().unwrap().recommendation, REC_STABLE);
    }
}
