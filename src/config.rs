// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User settings persisted as a small JSON file in the platform config directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the settings directory.
pub const CONFIG_DIR_ENV: &str = "TIMESHEET_CONFIG_DIR";

const APP_DIR: &str = "timesheet-tracker";
const SETTINGS_FILE: &str = "settings.json";
const DAY_START_FORMAT: &str = "%H:%M";

/// Preferences and the last opened timesheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Project code used when the form's project field is left blank.
    pub default_project: String,
    /// Project whose hours count as break time instead of work.
    pub lunch_project: String,
    /// Start of the working day as `HH:MM` (24h).
    pub day_start: String,
    /// Timesheet reopened on startup.
    pub last_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_project: "kdg".to_string(),
            lunch_project: "lunch".to_string(),
            day_start: "08:00".to_string(),
            last_file: None,
        }
    }
}

impl Settings {
    /// Directory holding the settings file.
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(SETTINGS_FILE)
    }

    /// Load settings from the default location; never fails.
    pub fn load() -> Self {
        Self::load_from(&Self::config_file())
    }

    /// Load settings from `path`, falling back to defaults when missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings.normalized(),
            Err(err) => {
                log::warn!("ignoring settings file: {err:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file())
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write settings {:?}", path))?;
        Ok(())
    }

    /// Parsed [`Settings::day_start`], or 08:00 when it is not a valid `HH:MM`.
    pub fn day_start_time(&self) -> NaiveTime {
        parse_day_start(&self.day_start).unwrap_or_else(default_day_start)
    }

    /// Trim text fields and replace an unparsable `day_start`; warns once per load.
    fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.default_project = self.default_project.trim().to_string();
        self.lunch_project = self.lunch_project.trim().to_string();
        if self.lunch_project.is_empty() {
            self.lunch_project = defaults.lunch_project;
        }
        match parse_day_start(&self.day_start) {
            Some(time) => self.day_start = time.format(DAY_START_FORMAT).to_string(),
            None => {
                log::warn!("invalid day_start {:?}, using {}", self.day_start, defaults.day_start);
                self.day_start = defaults.day_start;
            }
        }
        self
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse settings {:?}", path))
    }
}

fn parse_day_start(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), DAY_START_FORMAT).ok()
}

fn default_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();

        let settings = Settings::load_from(&tmp.path().join("settings.json"));

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_project, "kdg");
    }

    #[test]
    fn save_and_reload_keeps_last_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/settings.json");
        let settings = Settings {
            last_file: Some(PathBuf::from("/tmp/week.json")),
            ..Default::default()
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"day_start": "07:30"}"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.lunch_project, "lunch");
        assert_eq!(
            settings.day_start_time(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
    }

    #[test]
    fn loading_normalizes_padded_and_invalid_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"lunch_project": " Lunch ", "default_project": " abc", "day_start": "25:99"}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.lunch_project, "Lunch");
        assert_eq!(settings.default_project, "abc");
        assert_eq!(settings.day_start, "08:00");
    }

    #[test]
    fn blank_lunch_project_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"lunch_project": "  ", "day_start": " 07:05 "}"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.lunch_project, "lunch");
        assert_eq!(settings.day_start, "07:05");
    }

    #[test]
    fn invalid_day_start_defaults_to_eight() {
        let settings = Settings {
            day_start: "late".into(),
            ..Default::default()
        };

        assert_eq!(
            settings.day_start_time(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
    }
}
