//! Configuration management module.
//!
//! This module handles loading, saving, and managing console configuration,
//! including theme preference, table page size, share link host, log level and
//! hotkey overrides.

mod error;
pub mod hotkeys;

pub use error::ConfigError;
pub use hotkeys::{HotkeyAction, ViewHotkeys};

use crate::error::AppError;
use crate::services::channels::DEFAULT_SHARE_BASE_URL;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/benefit-console";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub theme_name: String,
    pub page_size: usize,
    pub share_base_url: String,
    pub log_level: String,
    hotkey_overrides: Option<ViewHotkeys>,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkeys: Option<ViewHotkeys>,
}

fn default_theme_name() -> String {
    "civic-light".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the default settings.
    ///
    pub fn new() -> Config {
        Config {
            theme_name: default_theme_name(),
            page_size: default_page_size(),
            share_base_url: default_share_base_url(),
            log_level: default_log_level(),
            hotkey_overrides: None,
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place and
    /// is written on the next save.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            self.apply_yaml(&contents)?;
        }

        Ok(())
    }

    /// Replace the settings with the ones found in a YAML document.
    ///
    fn apply_yaml(&mut self, contents: &str) -> Result<(), AppError> {
        let data: FileSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        if data.page_size == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "page_size",
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        self.theme_name = data.theme_name;
        self.page_size = data.page_size;
        self.share_base_url = data.share_base_url;
        self.log_level = data.log_level;
        self.hotkey_overrides = data.hotkeys;
        Ok(())
    }

    /// Return the hotkey table: defaults with any configured overrides laid
    /// on top.
    ///
    pub fn hotkeys(&self) -> ViewHotkeys {
        let mut hotkeys = ViewHotkeys::default();
        if let Some(overrides) = &self.hotkey_overrides {
            hotkeys.merge(overrides.clone());
        }
        hotkeys
    }

    /// Parse the configured log level, falling back to `Info` for unknown
    /// names.
    ///
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    fn to_yaml(&self) -> Result<String, AppError> {
        let data = FileSpec {
            theme_name: self.theme_name.clone(),
            page_size: self.page_size,
            share_base_url: self.share_base_url.clone(),
            log_level: self.log_level.clone(),
            hotkeys: self.hotkey_overrides.clone(),
        };
        Ok(serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?)
    }

    /// Save the current configuration to disk, creating the parent directory
    /// when it has gone missing.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = self.to_yaml()?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hotkeys::Hotkey;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.share_base_url, "https://app.example.com/s");
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert_eq!(config.hotkeys(), ViewHotkeys::default());
    }

    #[test]
    fn test_apply_yaml_partial_file() {
        let mut config = Config::new();
        config
            .apply_yaml("theme_name: civic-dark\npage_size: 5\nlog_level: debug\n")
            .unwrap();
        assert_eq!(config.theme_name, "civic-dark");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.share_base_url, DEFAULT_SHARE_BASE_URL);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_apply_yaml_rejects_zero_page_size() {
        let mut config = Config::new();
        let result = config.apply_yaml("page_size: 0\n");
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidSetting { .. }))
        ));
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let mut config = Config::new();
        config.log_level = "chatty".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_hotkey_overrides_are_merged() {
        let mut config = Config::new();
        config
            .apply_yaml("hotkeys:\n  designer:\n    save:\n      code: Char\n      char: w\n")
            .unwrap();
        let hotkeys = config.hotkeys();
        assert_eq!(
            hotkeys.designer.get(&HotkeyAction::Save),
            Some(&Hotkey::char('w'))
        );
        assert_eq!(
            hotkeys.designer.get(&HotkeyAction::Publish),
            Some(&Hotkey::char('P'))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!(
            "benefit-console-test-{}",
            rand::random::<u32>()
        ));
        let dir_str = dir.to_string_lossy().to_string();

        let mut config = Config::new();
        config.load(Some(&dir_str)).unwrap();
        config.theme_name = "jade".to_string();
        config.page_size = 7;
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(Some(&dir_str)).unwrap();
        assert_eq!(reloaded.theme_name, "jade");
        assert_eq!(reloaded.page_size, 7);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_without_path_fails() {
        let config = Config::new();
        assert!(matches!(
            config.save(),
            Err(AppError::Config(ConfigError::FilePathNotSet))
        ));
    }
}
