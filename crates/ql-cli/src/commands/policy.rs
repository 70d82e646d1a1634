use std::path::Path;

use ql_sim::PolicyProfile;

use crate::loader;

pub fn run(party_json: &Path, output: Option<&Path>) -> Result<(), String> {
    let party = loader::load_party(party_json)?;
    if party.is_empty() {
        return Err(format!("{} has no party members", party_json.display()));
    }
    let profile = PolicyProfile::suggested_for(&party);
    let text = serde_json::to_string_pretty(&profile).map_err(|e| e.to_string())?;
    super::emit(&text, output)
}
