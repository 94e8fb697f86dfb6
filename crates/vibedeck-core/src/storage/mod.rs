mod config;
pub mod database;

pub use config::{Config, LogConfig, ProfileConfig, TasksConfig, TimerConfig};
pub use database::{Database, HISTORY_KEY, PENDING_TASKS_KEY, PROFILE_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding the database and config file.
///
/// `VIBEDECK_DATA_DIR` wins when set. Otherwise `~/.config/vibedeck[-dev]/`,
/// with the `-dev` suffix when `VIBEDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("VIBEDECK_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("VIBEDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("vibedeck-dev")
            } else {
                base_dir.join("vibedeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
