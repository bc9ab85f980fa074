use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::model::VessloData;

pub const SNAPSHOT_DIR_NAME: &str = ".vesslo";
pub const SNAPSHOT_FILE_NAME: &str = "data.json";
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot json in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `~/.vesslo/data.json`, or a relative path when no home directory is known.
pub fn default_snapshot_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(SNAPSHOT_DIR_NAME)
        .join(SNAPSHOT_FILE_NAME)
}

pub fn load(path: &Path) -> Result<VessloData, SnapshotError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse(&raw).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(raw: &str) -> Result<VessloData, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Loads the snapshot, logging and swallowing any failure.
pub fn load_optional(path: &Path) -> Option<VessloData> {
    match load(path) {
        Ok(data) => {
            tracing::debug!(
                path = %path.display(),
                apps = data.apps.len(),
                "loaded vesslo snapshot"
            );
            Some(data)
        }
        Err(SnapshotError::NotFound(path)) => {
            tracing::info!(path = %path.display(), "vesslo snapshot missing");
            None
        }
        Err(error) => {
            tracing::error!("failed to load vesslo data: {error}");
            None
        }
    }
}

pub fn exported_at(data: &VessloData) -> Option<DateTime<Utc>> {
    let raw = data.exported_at.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Offset-less timestamps are read as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn is_fresh(data: &VessloData, now: DateTime<Utc>, max_age: Duration) -> bool {
    match exported_at(data) {
        Some(ts) => now.signed_duration_since(ts) < max_age,
        None => false,
    }
}

/// Vesslo exports continuously while running, so a recent snapshot is taken
/// as a sign that the host app is alive.
pub fn is_host_running(path: &Path, now: DateTime<Utc>, max_age: Duration) -> bool {
    if !path.exists() {
        return false;
    }
    load_optional(path)
        .map(|data| is_fresh(&data, now, max_age))
        .unwrap_or(false)
}
