//! Configuration for the meshwatch TUI.
//!
//! A small TOML file merged with `MESHWATCH_`-prefixed environment
//! variables. Besides tunables (refresh and simulation intervals) it
//! persists the bits of UI state worth restoring across runs: whether the
//! network overview was visible and which panel had focus.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Display refresh tick, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Simulation mutation step, in milliseconds.
    #[serde(default = "default_sim_step_ms")]
    pub sim_step_ms: u64,

    /// Persisted UI state.
    #[serde(default)]
    pub ui: UiState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            sim_step_ms: default_sim_step_ms(),
            ui: UiState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiState {
    /// Whether the network overview was visible when the app last exited.
    #[serde(default = "default_true")]
    pub overview_visible: bool,

    /// Panel that had focus: "hierarchy", "network", "streams", "routing".
    #[serde(default = "default_panel")]
    pub focused_panel: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            overview_visible: true,
            focused_panel: default_panel(),
        }
    }
}

fn default_refresh_interval_ms() -> u64 {
    250
}
fn default_sim_step_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}
fn default_panel() -> String {
    "hierarchy".into()
}

impl Config {
    /// Reject values the event loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "refresh_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.sim_step_ms == 0 {
            return Err(ConfigError::Validation {
                field: "sim_step_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "meshwatch", "meshwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meshwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from an explicit file plus environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MESHWATCH_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load the config from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning the defaults when loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.refresh_interval_ms, 250);
        assert_eq!(cfg.sim_step_ms, 500);
        assert!(cfg.ui.overview_visible);
        assert_eq!(cfg.ui.focused_panel, "hierarchy");
        cfg.validate().unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config {
            refresh_interval_ms: 100,
            sim_step_ms: 750,
            ui: UiState {
                overview_visible: false,
                focused_panel: "routing".into(),
            },
        };
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "refresh_interval_ms = 50\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.refresh_interval_ms, 50);
        assert_eq!(loaded.sim_step_ms, 500);
        assert_eq!(loaded.ui, UiState::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "refresh_interval_ms = 0\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }
}
