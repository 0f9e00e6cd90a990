pub mod activity_db;
pub mod config;
pub mod migrations;
pub mod session;

pub use activity_db::ActivityDb;
pub use config::{ApiConfig, Config, GoalsConfig, SessionBackend, StorageConfig, UiConfig};
pub use session::{
    clear_session, load_session, open_store, persist_session, FileSessionStore,
    KeyringSessionStore, MemorySessionStore, SessionKey, SessionStore, StoredSession,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/fittrack[-dev]/` based on FITTRACK_ENV.
///
/// Set FITTRACK_ENV=dev to use the development data directory, or
/// FITTRACK_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FITTRACK_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FITTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fittrack-dev")
            } else {
                base_dir.join("fittrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
