//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
//! 3. Environment variables: `COURSECAT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for coursecat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Course file used when a command gets no FILE argument
    pub data_file: Option<PathBuf>,
    /// Print a warning for every malformed source line
    pub warn_malformed: bool,
    /// Line printed above the sorted course list
    pub list_header: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            warn_malformed: true,
            list_header: "Here is a sample schedule:".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep current).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub warn_malformed: Option<bool>,
    pub list_header: Option<String>,
}

/// Get the XDG config directory for coursecat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursecat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursecat.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings: defaults, then the global config file, then `COURSECAT_*`.
    pub fn load() -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref())
    }

    /// Load settings with an explicit config file instead of the XDG location.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            warn_malformed: overlay.warn_malformed.unwrap_or(self.warn_malformed),
            list_header: overlay
                .list_header
                .clone()
                .unwrap_or_else(|| self.list_header.clone()),
        }
    }

    /// Apply COURSECAT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COURSECAT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("warn_malformed") {
            settings.warn_malformed = val;
        }
        if let Ok(val) = config.get_string("list_header") {
            settings.list_header = val;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_env_vars(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Serialize to TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_warnings_enabled_and_no_data_file() {
        let settings = Settings::default();
        assert!(settings.warn_malformed);
        assert_eq!(settings.data_file, None);
        assert_eq!(settings.list_header, "Here is a sample schedule:");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unset_fields_kept() {
        let overlay = RawSettings {
            warn_malformed: Some(false),
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert!(!merged.warn_malformed);
        assert_eq!(merged.list_header, Settings::default().list_header);
    }
}
