//! Core types for Questline: the party, campaign state, actions, and dice.
//!
//! This crate defines the plain data records that the session engine moves
//! between its strategy roles. Records carry invariant checks (unique party
//! names, non-negative hit points) but no game logic of their own. Everything
//! serializes to JSON, which is what the ledger persists.

/// Action tokens, intents, outcomes, and scenes.
pub mod action;
/// Campaign state: the aggregate root mutated by the session engine.
pub mod campaign;
/// Characters and encounters.
pub mod character;
/// Seeded dice and the RNG source behind every stochastic decision.
pub mod dice;
/// Error types used throughout the crate.
pub mod error;
/// Typed cross-turn flags shared by rulesets, directors, and actors.
pub mod flags;
/// Turn and session records produced by the engine.
pub mod record;

/// Re-export action types.
pub use action::{Action, ActionIntent, ActionOutcome, Scene};
/// Re-export the campaign aggregate.
pub use campaign::CampaignState;
/// Re-export party and scenario types.
pub use character::{Character, Encounter};
/// Re-export dice types.
pub use dice::Dice;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export flag types.
pub use flags::{CLUE_DISCOVERED, CampaignFlags, FlagUpdate};
/// Re-export record types.
pub use record::{SessionEnding, SessionResult, TurnResult};
