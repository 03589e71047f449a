use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::Snapshot;

pub fn to_json(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Writes the snapshot as pretty JSON, creating parent directories.
pub fn write<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(snapshot)?)?;
    tracing::info!("Data written to {}", path.display());
    Ok(())
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
