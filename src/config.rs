//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::timeline::geometry::{clamp_column_width, DEFAULT_COLUMN_WIDTH};
use crate::timeline::history::DEFAULT_HISTORY_LIMIT;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixels per day column.
    pub column_width: f32,
    /// Undo depth.
    pub history_limit: usize,
    /// Write the funnel file after every committed edit when it has a path.
    pub autosave: bool,
    pub last_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            column_width: DEFAULT_COLUMN_WIDTH,
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave: true,
            last_file: None,
        }
    }
}

impl Settings {
    /// `<config dir>/settings.json`, or the working directory when the OS
    /// reports no home.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "FunnelTimeline")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(".").join(SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. Out-of-range values are pulled back into range.
    pub fn load(path: &Path) -> Self {
        let settings = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse settings {}: {e}", path.display());
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                log::warn!("Failed to read settings {}: {e}", path.display());
                Settings::default()
            }
        };
        settings.sanitized()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("settings saved to {}", path.display());
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        self.column_width = clamp_column_width(self.column_width);
        self.history_limit = self.history_limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::geometry::MAX_COLUMN_WIDTH;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.history_limit, 100);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            column_width: 160.0,
            history_limit: 25,
            autosave: false,
            last_file: Some(PathBuf::from("launch.funnel.json")),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn partial_and_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "column_width": 9000, "history_limit": 0 }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.column_width, MAX_COLUMN_WIDTH);
        assert_eq!(settings.history_limit, 1);
        assert!(settings.autosave);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
