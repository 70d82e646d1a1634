//! Sessions recorded through the ledger and resumed from its snapshot.

use ql_core::{CampaignState, Character, Encounter};
use ql_ledger::{Ledger, LedgerError};
use ql_rules::SrdContent;
use ql_sim::{PolicyProfile, SessionConfig, SessionEngine};
use tempfile::TempDir;

fn campaign() -> CampaignState {
    let party = vec![
        Character::new("Kael", 14).with_class("Fighter").with_role("frontliner"),
        Character::new("Mira", 9).with_class("Wizard").with_background("Sage"),
    ];
    CampaignState::new("Barovia", "Chapter 1", party).with_encounters(vec![
        Encounter::new("gates", "Gates of Barovia", 2, "Mist coils around iron bars."),
        Encounter::new("village", "Village of Barovia", 3, "Shutters slam as you pass."),
    ])
}

fn run_session(ledger: &Ledger, seed: u64, turns: u32) -> ql_core::SessionResult {
    let start = if ledger.has_latest_state() {
        ledger.load_latest_state().unwrap()
    } else {
        campaign()
    };
    let config = SessionConfig::default().with_seed(seed).with_turns(turns);
    let result = SessionEngine::from_config(&config, &SrdContent::default(), PolicyProfile::default())
        .run(start, turns)
        .unwrap();
    ledger.record_session(&result, seed, turns, "default").unwrap();
    result
}

#[test]
fn three_sessions_chain_through_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let ledger = Ledger::ensure(dir.path(), "curse-of-strahd").unwrap();

    let first = run_session(&ledger, 1, 2);
    let second = run_session(&ledger, 2, 2);
    let third = run_session(&ledger, 3, 2);

    let manifest = ledger.manifest().unwrap();
    assert_eq!(manifest.session_count, 3);
    let ids: Vec<&str> = manifest.sessions.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids, ["session_0001", "session_0002", "session_0003"]);
    assert_eq!(ledger.load_latest_state().unwrap(), third.final_state);

    // Each session continues the turn count of the one before it.
    assert!(first.final_state.turn_index <= second.final_state.turn_index);
    assert!(second.final_state.turn_index <= third.final_state.turn_index);
    assert!(third.final_state.log.starts_with(&first.final_state.log));

    let payload = ledger.load_session("session_0002").unwrap();
    assert_eq!(payload.result, second);
    assert_eq!(payload.seed, 2);
    assert_eq!(payload.source_profile, "default");
}

#[test]
fn reopening_keeps_history() {
    let dir = TempDir::new().unwrap();
    {
        let ledger = Ledger::ensure(dir.path(), "curse-of-strahd").unwrap();
        run_session(&ledger, 7, 1);
    }
    let ledger = Ledger::ensure(dir.path(), "curse-of-strahd").unwrap();
    run_session(&ledger, 8, 1);
    assert_eq!(ledger.manifest().unwrap().session_count, 2);
}

#[test]
fn campaigns_do_not_share_state() {
    let dir = TempDir::new().unwrap();
    let a = Ledger::ensure(dir.path(), "alpha").unwrap();
    let b = Ledger::ensure(dir.path(), "beta").unwrap();
    run_session(&a, 1, 1);
    assert!(!b.has_latest_state());
    assert!(matches!(b.load_latest_state(), Err(LedgerError::MissingSnapshot(_))));
}

#[test]
fn manifest_from_another_campaign_is_corrupt() {
    let dir = TempDir::new().unwrap();
    Ledger::ensure(dir.path(), "alpha").unwrap();
    std::fs::create_dir_all(dir.path().join("beta")).unwrap();
    std::fs::copy(
        dir.path().join("alpha/manifest.json"),
        dir.path().join("beta/manifest.json"),
    )
    .unwrap();
    assert!(matches!(
        Ledger::ensure(dir.path(), "beta"),
        Err(LedgerError::Corrupt { .. })
    ));
}

fn engine(seed: u64) -> SessionEngine {
    let config = SessionConfig::default().with_seed(seed);
    SessionEngine::from_config(&config, &SrdContent::default(), PolicyProfile::default())
}

#[test]
fn resume_from_disk_continues_an_uninterrupted_run() {
    let dir = TempDir::new().unwrap();
    let ledger = Ledger::ensure(dir.path(), "curse-of-strahd").unwrap();
    let straight = engine(5).run(campaign(), 6).unwrap();

    let first = engine(5).run(campaign(), 3).unwrap();
    assert_eq!(first.turns, straight.turns[..3]);
    ledger.record_session(&first, 5, 3, "default").unwrap();

    let restored = ledger.load_latest_state().unwrap();
    assert_eq!(restored, first.final_state);
    let resumed = engine(6).run(restored, 3).unwrap();
    ledger.record_session(&resumed, 6, 3, "default").unwrap();

    // The disk round trip loses nothing: same as continuing in memory.
    let in_memory = engine(6).run(first.final_state.clone(), 3).unwrap();
    assert_eq!(resumed, in_memory);
    assert_eq!(ledger.load_latest_state().unwrap(), resumed.final_state);

    // Same shape as the straight run, modulo the second seed.
    let stitched: Vec<u32> = first.turns.iter().chain(&resumed.turns).map(|t| t.turn_index).collect();
    let expected: Vec<u32> = straight.turns.iter().map(|t| t.turn_index).collect();
    assert_eq!(stitched, expected);
    assert_eq!(resumed.final_state.turn_index, straight.final_state.turn_index);
    assert_eq!(resumed.final_state.log.len(), straight.final_state.log.len());
    assert!(resumed.final_state.log.starts_with(&first.final_state.log));
    assert!(resumed.final_state.log[first.final_state.log.len()].starts_with("Turn 4: "));
}
