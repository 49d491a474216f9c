//! Usage: App data directory resolution (dot directory under the user's home).

use crate::shared::error::AppResult;
use std::path::PathBuf;

const DEFAULT_DOTDIR_NAME: &str = ".scholarpath";

/// Override for tests and side-by-side installs.
pub const DOTDIR_NAME_ENV: &str = "SCHOLARPATH_DOTDIR_NAME";

fn home_dir() -> AppResult<PathBuf> {
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    // Windows fallback for `HOME`-less environments.
    if let Some(profile) = std::env::var_os("USERPROFILE").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(profile));
    }
    Err("SYSTEM_ERROR: unable to resolve home directory".into())
}

pub fn app_data_dir() -> AppResult<PathBuf> {
    let dotdir_name = std::env::var(DOTDIR_NAME_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DOTDIR_NAME.to_string());

    let dir = home_dir()?.join(dotdir_name);
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("SYSTEM_ERROR: failed to create app data dir: {e}"))?;
    Ok(dir)
}
