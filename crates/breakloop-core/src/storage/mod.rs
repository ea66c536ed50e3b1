mod config;
pub mod database;

pub use config::{Config, DisplayConfig, TimelineConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/breakloop[-dev]/` based on BREAKLOOP_ENV.
///
/// Set BREAKLOOP_ENV=dev to use the development data directory, or
/// BREAKLOOP_DATA_DIR to point somewhere else entirely (test suites use
/// this to stay out of the real home directory).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var("BREAKLOOP_DATA_DIR") {
        Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BREAKLOOP_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("breakloop-dev")
            } else {
                base_dir.join("breakloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
