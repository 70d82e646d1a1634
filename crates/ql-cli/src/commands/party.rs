use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use ql_rules::SrdContent;
use ql_sim::{PartyPreset, generate_party};

pub fn run(
    preset: &str,
    size: usize,
    seed: u64,
    srd_json: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), String> {
    let preset: PartyPreset = preset.parse().map_err(|e| format!("{e}"))?;
    let backgrounds = match srd_json {
        Some(path) => SrdContent::load(path).map_err(|e| e.to_string())?.background_names,
        None => Vec::new(),
    };
    let party = generate_party(size, seed, preset, &backgrounds).map_err(|e| e.to_string())?;

    if let Some(path) = output {
        let text = serde_json::to_string_pretty(&json!({ "party": party })).map_err(|e| e.to_string())?;
        return super::emit(&text, Some(path));
    }

    println!(
        "  {} {}",
        "Party".bold(),
        format!("(preset={preset}, size={size}, seed={seed})").dimmed()
    );
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Class", "Role", "HP", "Background", "Personality", "Flaw"]);
    for member in &party {
        table.add_row(vec![
            member.name.clone(),
            member.char_class.clone(),
            member.role.clone(),
            member.hp.to_string(),
            member.background.clone(),
            member.personality.clone(),
            member.flaw.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}
