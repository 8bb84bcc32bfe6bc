//! Snapshot persistence
//!
//! The whole record map is serialized as one flat JSON object keyed by
//! record id, read entirely at startup and rewritten entirely on every
//! mutation. Writes go through a temp file and rename so a crash mid-save
//! never leaves a truncated snapshot behind.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::{Result, StoreError};
use crate::record::VocabRecord;

/// Default snapshot location under the platform data directory
pub fn default_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "wordstash", "wordstash")
        .ok_or_else(|| StoreError::Init("Could not determine project directories".to_string()))?;

    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir)?;
    // Restrict directory permissions to owner-only on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        let _ = fs::set_permissions(data_dir, perms);
    }
    Ok(data_dir.join("records.json"))
}

/// Load the full snapshot; a missing file is an empty store
pub fn load(path: &Path) -> Result<HashMap<String, VocabRecord>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };
    let records = serde_json::from_str(&raw)?;
    Ok(records)
}

/// Rewrite the full snapshot atomically
pub fn save(path: &Path, records: &HashMap<String, VocabRecord>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
