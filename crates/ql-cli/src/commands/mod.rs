pub mod ledger;
pub mod party;
pub mod policy;
pub mod run;

use std::path::Path;

/// Write `text` to `path`, or print it when no path is given.
fn emit(text: &str, path: Option<&Path>) -> Result<(), String> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
            }
            std::fs::write(path, format!("{text}\n"))
                .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            println!("  Wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
