//! SRD content used to flavor the extended ruleset and its director.
//!
//! The source is a merged JSON document of the form
//! `{ "version": "...", "files": { "5e-SRD-Conditions.json": [{ "name": ... }], ... } }`.
//! Only the `name` of each entry is kept. Missing or oddly shaped sections
//! load as empty lists.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RulesError, RulesResult};

const CONDITIONS: &str = "5e-SRD-Conditions.json";
const EQUIPMENT: &str = "5e-SRD-Equipment.json";
const BACKGROUNDS: &str = "5e-SRD-Backgrounds.json";
const WEAPON_PROPERTIES: &str = "5e-SRD-Weapon-Properties.json";
const MASTERY_PROPERTIES: &str = "5e-SRD-Weapon-Mastery-Properties.json";
const DAMAGE_TYPES: &str = "5e-SRD-Damage-Types.json";

/// Name lists extracted from an SRD dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrdContent {
    /// Where the content was loaded from.
    pub source_path: String,
    /// Dataset version.
    pub version: String,
    /// Every file name present in the dataset, sorted.
    pub categories: Vec<String>,
    /// Condition names.
    pub conditions: Vec<String>,
    /// Equipment names.
    pub equipment_names: Vec<String>,
    /// Background names.
    pub background_names: Vec<String>,
    /// Weapon property names.
    pub weapon_property_names: Vec<String>,
    /// Weapon mastery property names.
    pub mastery_property_names: Vec<String>,
    /// Damage type names.
    pub damage_types: Vec<String>,
}

/// Counts reported for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrdSummary {
    /// Where the content was loaded from.
    pub source_path: String,
    /// Dataset version.
    pub version: String,
    /// Number of files in the dataset.
    pub categories: usize,
    /// Number of conditions.
    pub conditions: usize,
    /// Number of equipment items.
    pub equipment: usize,
    /// Number of backgrounds.
    pub backgrounds: usize,
    /// Number of weapon properties.
    pub weapon_properties: usize,
    /// Number of mastery properties.
    pub mastery_properties: usize,
    /// Number of damage types.
    pub damage_types: usize,
}

impl SrdContent {
    /// Load a merged SRD JSON file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::SrdIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut content = Self::from_json(&text)?;
        content.source_path = path.display().to_string();
        tracing::info!(path = %path.display(), version = %content.version, "loaded SRD content");
        Ok(content)
    }

    /// Parse a merged SRD JSON document.
    pub fn from_json(text: &str) -> RulesResult<Self> {
        let payload: Value =
            serde_json::from_str(text).map_err(|e| RulesError::SrdParse(e.to_string()))?;
        let root = payload
            .as_object()
            .ok_or_else(|| RulesError::SrdParse("top level must be an object".to_string()))?;

        let version = match root.get("version") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        };

        let empty = serde_json::Map::new();
        let files = root.get("files").and_then(Value::as_object).unwrap_or(&empty);
        let mut categories: Vec<String> = files.keys().cloned().collect();
        categories.sort();

        let names = |key: &str| extract_names(files.get(key));

        Ok(Self {
            source_path: String::new(),
            version,
            categories,
            conditions: names(CONDITIONS),
            equipment_names: names(EQUIPMENT),
            background_names: names(BACKGROUNDS),
            weapon_property_names: names(WEAPON_PROPERTIES),
            mastery_property_names: names(MASTERY_PROPERTIES),
            damage_types: names(DAMAGE_TYPES),
        })
    }

    /// Counts for reporting.
    pub fn summary(&self) -> SrdSummary {
        SrdSummary {
            source_path: self.source_path.clone(),
            version: self.version.clone(),
            categories: self.categories.len(),
            conditions: self.conditions.len(),
            equipment: self.equipment_names.len(),
            backgrounds: self.background_names.len(),
            weapon_properties: self.weapon_property_names.len(),
            mastery_properties: self.mastery_property_names.len(),
            damage_types: self.damage_types.len(),
        }
    }
}

fn extract_names(items: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = items else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
