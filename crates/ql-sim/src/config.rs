use ql_rules::RulesetKind;
use serde::{Deserialize, Serialize};

/// Which deterministic actor drives the party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Weighted scoring over a policy profile.
    #[default]
    Policy,
    /// Fixed rules of thumb, no policy.
    Heuristic,
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Policy => write!(f, "policy"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Configuration for a session run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Seed shared by the ruleset, director, and actor streams.
    pub seed: u64,
    /// Maximum number of turns to execute.
    pub turns: u32,
    /// Resolution strategy; also decides the director's vocabulary.
    pub ruleset: RulesetKind,
    /// Actor strategy.
    pub actor: ActorKind,
    /// Source text the director may quote from.
    pub source_chunks: Vec<String>,
    /// Tone cue appended to every scene prompt.
    pub director_guidance: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            turns: 6,
            ruleset: RulesetKind::Generic,
            actor: ActorKind::Policy,
            source_chunks: Vec::new(),
            director_guidance: None,
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the turn budget.
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }

    /// Set the ruleset kind.
    pub fn with_ruleset(mut self, ruleset: RulesetKind) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Set the actor kind.
    pub fn with_actor(mut self, actor: ActorKind) -> Self {
        self.actor = actor;
        self
    }

    /// Provide source text chunks for prompt excerpts.
    pub fn with_source_chunks(mut self, chunks: Vec<String>) -> Self {
        self.source_chunks = chunks;
        self
    }

    /// Set the director's tone cue.
    pub fn with_director_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.director_guidance = Some(guidance.into());
        self
    }
}
