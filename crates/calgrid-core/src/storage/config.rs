//! TOML-based application configuration.
//!
//! Stores layout preferences:
//! - Task block length and week overlap tolerance
//! - First day of the week
//! - Bar colors and named color keys
//! - Holiday display and additional holidays
//!
//! Configuration is stored at `~/.config/calgrid/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::layout::{
    DayOptions, HolidayCalendar, HolidayEntry, Palette, WeekTimelineOptions,
};

/// First column of week and month grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

/// Layout tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_task_block_minutes")]
    pub task_block_minutes: u32,
    #[serde(default = "default_min_overlap_minutes")]
    pub min_overlap_minutes: u32,
    #[serde(default = "default_week_start")]
    pub week_start: WeekStart,
}

/// Holiday display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub extra: Vec<HolidayEntry>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/calgrid/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub colors: Palette,
    #[serde(default)]
    pub holidays: HolidayConfig,
}

fn default_task_block_minutes() -> u32 {
    60
}
fn default_min_overlap_minutes() -> u32 {
    1
}
fn default_week_start() -> WeekStart {
    WeekStart::Sunday
}
fn default_true() -> bool {
    true
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            task_block_minutes: default_task_block_minutes(),
            min_overlap_minutes: default_min_overlap_minutes(),
            week_start: default_week_start(),
        }
    }
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra: Vec::new(),
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, fails
    /// validation, or the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
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

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// for the key's type, or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error for values the layout cannot work with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.layout.task_block_minutes == 0 || self.layout.task_block_minutes > 24 * 60 {
            return Err(ConfigError::InvalidValue {
                key: "layout.task_block_minutes".into(),
                message: "must be between 1 and 1440".into(),
            });
        }
        Ok(())
    }

    pub fn day_options(&self) -> DayOptions {
        DayOptions {
            task_block_minutes: self.layout.task_block_minutes,
        }
    }

    pub fn week_timeline_options(&self) -> WeekTimelineOptions {
        WeekTimelineOptions {
            task_block_minutes: self.layout.task_block_minutes,
            min_overlap_minutes: self.layout.min_overlap_minutes,
        }
    }

    pub fn holiday_calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.holidays.enabled).with_extra(self.holidays.extra.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.layout.task_block_minutes, 60);
        assert_eq!(parsed.layout.week_start, WeekStart::Sunday);
        assert_eq!(parsed.colors, Palette::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r##"
            [layout]
            week_start = "monday"

            [[holidays.extra]]
            date = "2024-07-01"
            name = "Company Day"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.layout.week_start.weekday(), Weekday::Mon);
        assert_eq!(cfg.layout.task_block_minutes, 60);
        let july_first = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(cfg.holiday_calendar().name_for(july_first), Some("Company Day"));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("layout.task_block_minutes").as_deref(), Some("60"));
        assert_eq!(cfg.get("layout.week_start").as_deref(), Some("sunday"));
        assert_eq!(cfg.get("holidays.enabled").as_deref(), Some("true"));
        assert!(cfg.get("layout.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("layout.task_block_minutes", "30").unwrap();
        cfg.set("holidays.enabled", "false").unwrap();
        cfg.set("layout.week_start", "monday").unwrap();
        cfg.set("colors.named", r##"{"work": "#10b981"}"##).unwrap();

        assert_eq!(cfg.day_options().task_block_minutes, 30);
        assert!(!cfg.holidays.enabled);
        assert_eq!(cfg.layout.week_start, WeekStart::Monday);
        assert_eq!(cfg.colors.resolve(Some("work"), false), "#10b981");
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("layout.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("holidays.enabled", "not_a_bool").is_err());
        assert!(cfg.set("layout.week_start", "friday").is_err());
        assert!(cfg.set("layout.task_block_minutes", "0").is_err());
        assert!(cfg.set("", "x").is_err());
        assert_eq!(cfg.layout.task_block_minutes, 60);
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.layout.min_overlap_minutes, 1);
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("layout.min_overlap_minutes", "10").unwrap();
        changed.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.week_timeline_options().min_overlap_minutes, 10);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "layout = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
