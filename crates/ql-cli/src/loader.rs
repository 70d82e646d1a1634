//! Reading campaign, party, policy, and source-text files.

use std::path::Path;

use ql_core::{CampaignState, Character};
use ql_sim::PolicyProfile;
use serde::Deserialize;
use serde_json::Value;

/// Source chunks kept from one file.
pub const MAX_SOURCE_CHUNKS: usize = 800;

fn read(path: &Path, what: &str) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {what} {}: {e}", path.display()))
}

/// Load a campaign seed. The party is checked before anything runs.
pub fn load_campaign(path: &Path) -> Result<CampaignState, String> {
    let text = read(path, "campaign")?;
    let campaign: CampaignState = serde_json::from_str(&text)
        .map_err(|e| format!("invalid campaign {}: {e}", path.display()))?;
    campaign
        .validate()
        .map_err(|e| format!("invalid campaign {}: {e}", path.display()))?;
    Ok(campaign)
}

/// Load a party.
///
/// The expected shape is `{"party": [...]}`. A bare list is still read but
/// logged as deprecated.
pub fn load_party(path: &Path) -> Result<Vec<Character>, String> {
    let text = read(path, "party")?;
    parse_party(&text).map_err(|e| format!("invalid party {}: {e}", path.display()))
}

fn parse_party(text: &str) -> Result<Vec<Character>, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let members = match value {
        Value::Object(mut map) => match map.remove("party") {
            Some(members @ Value::Array(_)) => members,
            _ => return Err("expected a \"party\" list".into()),
        },
        members @ Value::Array(_) => {
            tracing::warn!("party file is a bare list; wrap it as {{\"party\": [...]}}");
            members
        }
        _ => return Err("expected an object with a \"party\" list".into()),
    };
    serde_json::from_value(members).map_err(|e| e.to_string())
}

/// Load a policy profile.
pub fn load_policy(path: &Path) -> Result<PolicyProfile, String> {
    let text = read(path, "policy")?;
    PolicyProfile::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

#[derive(Deserialize)]
struct ChunkFile {
    #[serde(default)]
    chunks: Vec<Chunk>,
}

#[derive(Deserialize)]
struct Chunk {
    #[serde(default)]
    text: String,
}

/// Load source text chunks from `{"chunks": [{"text": ...}]}`.
///
/// Blank chunks are skipped and at most [`MAX_SOURCE_CHUNKS`] are kept.
pub fn load_source_chunks(path: &Path) -> Result<Vec<String>, String> {
    let text = read(path, "source chunks")?;
    let file: ChunkFile = serde_json::from_str(&text)
        .map_err(|e| format!("invalid source chunks {}: {e}", path.display()))?;
    Ok(file
        .chunks
        .into_iter()
        .map(|c| c.text)
        .filter(|t| !t.trim().is_empty())
        .take(MAX_SOURCE_CHUNKS)
        .collect())
}
