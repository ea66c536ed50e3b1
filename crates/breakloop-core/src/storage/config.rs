//! TOML-based application configuration.
//!
//! Stored at `<data_dir>/config.toml`. Covers the presentation-side
//! settings the core needs: the calendar offset used to bucket the
//! timeline and the clock format used when printing urge times.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};

/// Timeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Whole-hour UTC offset for day bucketing, e.g. -5 for New York
    /// in winter. Values outside -12..=14 fall back to UTC.
    #[serde(default)]
    pub utc_offset_hours: i32,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print urge times as 24-hour clock; 12-hour with am/pm otherwise.
    #[serde(default = "default_true")]
    pub clock_24h: bool,
}

/// Application configuration, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_true() -> bool {
    true
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { clock_24h: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config on first use.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_at(&Self::path()?)
    }

    /// Load from an explicit path, writing the default config on first use.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load_at(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_at(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_at(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_at(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist the result.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self).map_err(CoreError::Json)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(CoreError::Json)?;
        self.save()?;
        Ok(())
    }

    /// The configured calendar as a fixed offset, UTC when out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timeline.utc_offset_hours.saturating_mul(3600))
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_at_writes_default_on_first_use() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        assert!(!path.exists());

        let cfg = Config::load_at(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg.timeline.utc_offset_hours, 0);
        assert!(cfg.display.clock_24h);
    }

    #[test]
    fn save_at_then_load_at_round_trips_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.timeline.utc_offset_hours = -5;
        cfg.display.clock_24h = false;
        cfg.save_at(&path).unwrap();

        let loaded = Config::load_at(&path).unwrap();
        assert_eq!(loaded.timeline.utc_offset_hours, -5);
        assert!(!loaded.display.clock_24h);
    }

    #[test]
    fn load_at_reports_parse_failures() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "timeline = 3").unwrap();

        let err = Config::load_at(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timeline.utc_offset_hours, 0);
        assert!(parsed.display.clock_24h);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.timeline.utc_offset_hours, 0);
        assert!(parsed.display.clock_24h);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timeline.utc_offset_hours").as_deref(), Some("0"));
        assert_eq!(cfg.get("display.clock_24h").as_deref(), Some("true"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_accepts_negative_offsets() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "timeline.utc_offset_hours", "-5").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "timeline.utc_offset_hours").unwrap(),
            &serde_json::Value::Number((-5).into())
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "display.clock_24h", "false").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "display.clock_24h").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let err =
            Config::set_json_value_by_path(&mut json, "timeline.no_such_key", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_json_value_by_path_rejects_unparseable_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let err =
            Config::set_json_value_by_path(&mut json, "display.clock_24h", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn utc_offset_honors_configured_hours() {
        let mut cfg = Config::default();
        cfg.timeline.utc_offset_hours = -5;
        assert_eq!(cfg.utc_offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn utc_offset_falls_back_to_utc_when_out_of_range() {
        let mut cfg = Config::default();
        cfg.timeline.utc_offset_hours = 99;
        assert_eq!(cfg.utc_offset().local_minus_utc(), 0);
    }
}
