use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shell::Shell;
use crate::{ylog_debug, Error, Result};

/// Taskfile used when neither `-f` nor the config names one.
pub const DEFAULT_TASKFILE: &str = "yo.yaml";

/// User settings from `~/.yo/yo.toml` (or `$YO_CONFIG`).
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default taskfile path.
    pub taskfile: Option<String>,
    /// Shell program used to run commands, invoked as `<shell> -c <command>`.
    pub shell: Option<String>,
}

impl Config {
    pub fn yo_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".yo"))
    }

    pub fn config_path() -> Result<PathBuf> {
        match std::env::var_os("YO_CONFIG") {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::yo_dir()?.join("yo.toml")),
        }
    }

    pub fn effective_taskfile(&self) -> PathBuf {
        expand_tilde(self.taskfile.as_deref().unwrap_or(DEFAULT_TASKFILE))
    }

    pub fn effective_shell(&self) -> Shell {
        match self.shell.as_deref() {
            Some(program) => Shell::new(program),
            None => Shell::default(),
        }
    }

    /// Load the user config, falling back to defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(Error::NoHomeDir) => {
                ylog_debug!("No home directory, using default config");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        ylog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            ylog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        ylog_debug!(
            "Config loaded: taskfile={:?}, shell={:?}",
            config.taskfile,
            config.shell
        );
        Ok(config)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
