pub mod kv;
pub mod week_store;

pub use kv::{KvStore, MemoryKv, SqliteKv};
pub use week_store::WeekStore;

use std::path::PathBuf;

/// Returns the weekplan data directory, creating it if needed.
///
/// `WEEKPLAN_DATA_DIR` wins when set. Otherwise `~/.config/weekplan`, or
/// `~/.config/weekplan-dev` when `WEEKPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("WEEKPLAN_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("weekplan-dev")
            } else {
                base_dir.join("weekplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
