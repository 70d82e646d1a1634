//! The on-disk ledger.
//!
//! Layout under `<ledger_dir>/<campaign_id>/`:
//!
//! - `manifest.json` holds the session index
//! - `sessions/session_NNNN.json` holds one payload per session
//! - `latest_state.json` holds the campaign after the most recent session
//!
//! Each file is written to a sibling temporary file and renamed into
//! place. Concurrent writers on one campaign id are not supported.

use std::path::{Path, PathBuf};

use chrono::Utc;
use ql_core::{CampaignState, SessionResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{LedgerError, LedgerResult};
use crate::manifest::{Manifest, SessionPayload, SessionRecord};

const MANIFEST_FILE: &str = "manifest.json";
const LATEST_STATE_FILE: &str = "latest_state.json";
const SESSIONS_DIR: &str = "sessions";

/// Checkpoint store for one campaign.
#[derive(Debug, Clone)]
pub struct Ledger {
    campaign_id: String,
    root: PathBuf,
}

impl Ledger {
    /// Open the ledger for `campaign_id`, creating its directories and an
    /// empty manifest when missing. Idempotent.
    pub fn ensure(ledger_dir: &Path, campaign_id: &str) -> LedgerResult<Self> {
        validate_campaign_id(campaign_id)?;
        let ledger = Self {
            campaign_id: campaign_id.to_string(),
            root: ledger_dir.join(campaign_id),
        };
        let sessions = ledger.sessions_dir();
        std::fs::create_dir_all(&sessions).map_err(|source| LedgerError::Io {
            path: sessions.clone(),
            source,
        })?;

        let manifest_path = ledger.manifest_path();
        if manifest_path.exists() {
            ledger.manifest()?;
        } else {
            write_json(&manifest_path, &Manifest::new(campaign_id, Utc::now()))?;
            tracing::info!(campaign = campaign_id, dir = %ledger.root.display(), "created ledger");
        }
        Ok(ledger)
    }

    /// The campaign id.
    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    /// The campaign directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `manifest.json`.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Path of `latest_state.json`.
    pub fn latest_state_path(&self) -> PathBuf {
        self.root.join(LATEST_STATE_FILE)
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// Load and check the manifest.
    pub fn manifest(&self) -> LedgerResult<Manifest> {
        let path = self.manifest_path();
        let manifest: Manifest = read_json(&path)?;
        manifest
            .check(&self.campaign_id)
            .map_err(|reason| LedgerError::Corrupt { path, reason })?;
        Ok(manifest)
    }

    /// Persist a finished session.
    ///
    /// Writes the payload under the next session id, replaces the latest
    /// state snapshot, then appends to the manifest.
    pub fn record_session(
        &self,
        result: &SessionResult,
        seed: u64,
        turns: u32,
        source_profile: &str,
    ) -> LedgerResult<SessionRecord> {
        let mut manifest = self.manifest()?;
        let session_id = manifest.next_session_id();
        let relative = format!("{SESSIONS_DIR}/{session_id}.json");
        let now = Utc::now();

        let payload = SessionPayload {
            session_id: session_id.clone(),
            created_at: now,
            seed,
            turns,
            source_profile: source_profile.to_string(),
            result: result.clone(),
        };
        write_json(&self.root.join(&relative), &payload)?;
        write_json(&self.latest_state_path(), &result.final_state)?;

        let record = SessionRecord {
            session_id,
            created_at: now,
            seed,
            turns,
            source_profile: source_profile.to_string(),
            path: relative,
        };
        manifest.sessions.push(record.clone());
        manifest.session_count += 1;
        manifest.updated_at = Some(now);
        write_json(&self.manifest_path(), &manifest)?;

        tracing::info!(
            campaign = %self.campaign_id,
            session = %record.session_id,
            turns = result.total_turns,
            "recorded session"
        );
        Ok(record)
    }

    /// Load a stored session payload.
    pub fn load_session(&self, session_id: &str) -> LedgerResult<SessionPayload> {
        let manifest = self.manifest()?;
        let record = manifest.session(session_id).ok_or_else(|| LedgerError::Corrupt {
            path: self.manifest_path(),
            reason: format!("no session {session_id:?} in index"),
        })?;
        let path = self.root.join(&record.path);
        let payload: SessionPayload = read_json(&path)?;
        if payload.session_id != session_id {
            return Err(LedgerError::Corrupt {
                path,
                reason: format!("payload is {:?}", payload.session_id),
            });
        }
        Ok(payload)
    }

    /// Whether a snapshot exists to resume from.
    pub fn has_latest_state(&self) -> bool {
        self.latest_state_path().exists()
    }

    /// The campaign exactly as the last session left it.
    pub fn load_latest_state(&self) -> LedgerResult<CampaignState> {
        let path = self.latest_state_path();
        if !path.exists() {
            return Err(LedgerError::MissingSnapshot(self.campaign_id.clone()));
        }
        let state: CampaignState = read_json(&path)?;
        state.validate().map_err(|e| LedgerError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(campaign = %self.campaign_id, turn = state.turn_index, "loaded snapshot");
        Ok(state)
    }
}

fn validate_campaign_id(id: &str) -> LedgerResult<()> {
    let ok = !id.trim().is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.contains('\0');
    if ok {
        Ok(())
    } else {
        Err(LedgerError::InvalidCampaignId(id.to_string()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LedgerResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| LedgerError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write pretty JSON to a temporary sibling, then rename over `path`.
fn write_json<T: Serialize>(path: &Path, value: &T) -> LedgerResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, text).map_err(|source| LedgerError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
