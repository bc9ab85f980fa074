use std::any::Any;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const LOG_FILE_NAME: &str = "vesslo-core.log";
const ARCHIVE_PREFIX: &str = "vesslo-core-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;
const DEFAULT_FILTER: &str = "info";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("log io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

pub fn init() -> Result<PathBuf, LoggingError> {
    init_in(&logs_dir())
}

/// Installs the global subscriber writing to `<log_dir>/vesslo-core.log`.
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_in(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| LoggingError::Subscriber(error.to_string()))?;

    install_panic_hook();
    Ok(log_path)
}

/// Moves an oversized log aside as `vesslo-core-<epoch>.log` and drops the
/// oldest archives beyond the retention limit.
pub(crate) fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => 0,
        Err(err) => return Err(err),
    };
    if size < MAX_LOG_BYTES {
        return Ok(());
    }

    fs::rename(log_path, archive_path(log_dir, Utc::now().timestamp()))?;
    prune_old_archives(log_dir)
}

fn archive_path(log_dir: &Path, stamp: i64) -> PathBuf {
    log_dir.join(format!("{ARCHIVE_PREFIX}{stamp}.log"))
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
}

pub(crate) fn prune_old_archives(log_dir: &Path) -> Result<(), std::io::Error> {
    let mut archives: Vec<PathBuf> = WalkDir::new(log_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_archive(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    // Epoch stamps share a width, so name order is age order.
    archives.sort();
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for stale in &archives[..excess] {
        if let Err(error) = fs::remove_file(stale) {
            eprintln!("[vesslo-core] failed to prune {}: {error}", stale.display());
        }
    }
    Ok(())
}

fn panic_payload(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|at| format!("{}:{}", at.file(), at.line()))
                .unwrap_or_else(|| "<unknown>".to_string());
            tracing::error!(%location, "panic: {}", panic_payload(info.payload()));
            previous(info);
        }));
    });
}
