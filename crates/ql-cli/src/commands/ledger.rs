use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ql_ledger::Ledger;

pub fn run(ledger_dir: &Path, campaign_id: &str) -> Result<(), String> {
    if !ledger_dir.join(campaign_id).is_dir() {
        return Err(format!(
            "no ledger for campaign '{campaign_id}' under {}",
            ledger_dir.display()
        ));
    }
    let ledger = Ledger::ensure(ledger_dir, campaign_id).map_err(|e| e.to_string())?;
    let manifest = ledger.manifest().map_err(|e| e.to_string())?;

    println!(
        "  {} '{}' {}",
        "Ledger".bold(),
        manifest.campaign_id,
        format!("({} session(s), created {})", manifest.session_count, manifest.created_at.to_rfc3339()).dimmed()
    );
    println!();

    if manifest.sessions.is_empty() {
        println!("  No sessions recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Session", "Recorded", "Seed", "Turns", "Source"]);
    for s in &manifest.sessions {
        table.add_row(vec![
            s.session_id.clone(),
            s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.seed.to_string(),
            s.turns.to_string(),
            s.source_profile.clone(),
        ]);
    }
    println!("{table}");
    println!();

    if ledger.has_latest_state() {
        let state = ledger.load_latest_state().map_err(|e| e.to_string())?;
        let hp: Vec<String> = state.party.iter().map(|m| format!("{} {}", m.name, m.hp)).collect();
        println!("  Snapshot at turn {}: {}", state.turn_index, hp.join(", "));
    }
    Ok(())
}
