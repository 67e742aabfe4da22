use crate::model::ship::ShipDefaults;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Data file; defaults to `fleet.json` in the config directory
    pub data_file: Option<PathBuf>,
    /// CSV export directory; defaults to `exports/` in the config directory
    pub export_dir: Option<PathBuf>,
    pub log_level: String,
    pub tick_rate_ms: u64,
    pub autosave: bool,
    pub ship_defaults: ShipDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            export_dir: None,
            log_level: "info".to_string(),
            tick_rate_ms: 100,
            autosave: true,
            ship_defaults: ShipDefaults::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".fleet-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Load the config, writing a default one on first run
    ///
    /// An unreadable file is left untouched and defaults are used.
    pub fn load_or_init() -> Config {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        if path.exists() {
            return Self::load_from(&path).unwrap_or_default();
        }
        let config = Config::default();
        // Best effort; a read-only home still runs with defaults
        let _ = config.save_to(&path);
        config
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn base_dir() -> PathBuf {
        Self::config_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| Self::base_dir().join("fleet.json"))
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| Self::base_dir().join("exports"))
    }

    pub fn log_dir() -> PathBuf {
        Self::base_dir().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "tickRateMs": 250, "shipDefaults": { "captain": "Nguyen" } }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.tick_rate_ms, 250);
        assert!(config.autosave);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.ship_defaults.captain, "Nguyen");
        assert_eq!(config.ship_defaults.flag, "Vietnam");
    }

    #[test]
    fn test_unreadable_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_none());
        assert!(Config::load_from(&dir.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let config = Config {
            data_file: Some(PathBuf::from("/tmp/fleet.yaml")),
            autosave: false,
            ..Config::default()
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), Some(config));
    }
}
