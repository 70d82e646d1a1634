//! Turn-based session simulation for Questline.
//!
//! A [`SessionEngine`] drives turns over a [`ql_core::CampaignState`]: each
//! turn a [`Director`] builds a scene, an [`Actor`] picks an intent for every
//! living character, and a [`ql_rules::Ruleset`] resolves it. The engine and
//! its strategies are deterministic for a fixed seed; external collaborators
//! plug in through the decorators in [`assist`].

/// Actors and the policy scoring behind them.
pub mod actor;
/// Post-run analysis and recommendations.
pub mod analysis;
/// Collaborator-backed decorators with deterministic fallback.
pub mod assist;
/// Configuration types for session runs.
pub mod config;
/// Scene construction.
pub mod director;
/// The session engine and its lifecycle.
pub mod engine;
/// Error types for the simulation crate.
pub mod error;
/// Episode packages for narration.
pub mod export;
/// Seeded party generation.
pub mod party;

pub use actor::{Actor, ActorPolicy, CampaignPolicy, HeuristicActor, PolicyActor, PolicyProfile};
pub use analysis::{AnalysisSummary, RunAnalysis, analyze_session, summarize_analyses};
pub use assist::{AssistStatus, AssistedActor, AssistedDirector, DecisionClient, SceneClient};
pub use config::{ActorKind, SessionConfig};
pub use director::{Director, SimpleDirector, SrdDirector};
pub use engine::{SessionEngine, SessionStatus};
pub use error::{AssistError, SimError, SimResult};
pub use export::EpisodePackage;
pub use party::{PartyPreset, generate_party};
