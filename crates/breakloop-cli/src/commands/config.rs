//! Settings commands for the CLI.
//!
//! Settings live in `config.toml` under the data directory and are addressed
//! by dot-separated keys, e.g. `timeline.utc_offset_hours`.

use breakloop_core::{Config, ConfigError};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Setting key, e.g. "timeline.utc_offset_hours"
        key: String,
    },
    /// Change a setting and persist it
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Discard all settings and write the defaults back
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();

    match action {
        ConfigAction::Get { key } => {
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            // Echo what was actually stored; set() may normalize the value.
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}
