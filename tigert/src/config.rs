//! Configuration for the tigert CLI.
//!
//! Settings come from `tigert.toml`; command-line flags override them.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tiger_rt::abi::ENTRY_SYMBOL;

use crate::error::{Result, TigertError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "tigert.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// C compiler driver used for linking.
    #[serde(default = "default_cc")]
    pub cc: String,

    /// Directory holding `libtiger_start.a`. Defaults to the directory of
    /// the tigert executable.
    #[serde(default)]
    pub runtime_dir: Option<PathBuf>,

    /// Entry label emitted by the code generator.
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Additional libraries passed as `-l<name>`.
    #[serde(default)]
    pub extra_libs: Vec<String>,

    #[serde(default)]
    pub verbose: bool,
}

fn default_cc() -> String {
    "cc".to_string()
}

fn default_entry() -> String {
    ENTRY_SYMBOL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cc: default_cc(),
            runtime_dir: None,
            entry: default_entry(),
            extra_libs: Vec::new(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches the current directory, then `~/.config/tigert/`, then the
    /// system configuration directory. Returns the defaults if none exists.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TigertError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TigertError::Config(format!("Failed to parse configuration: {}", e)))
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("tigert").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("tigert").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cc, "cc");
        assert_eq!(config.entry, "Tiger_main");
        assert!(config.runtime_dir.is_none());
        assert!(config.extra_libs.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let original = Config {
            cc: "clang".to_string(),
            runtime_dir: Some(PathBuf::from("/opt/tiger/lib")),
            entry: "SumRec_main".to_string(),
            extra_libs: vec!["rt".to_string()],
            verbose: true,
        };
        std::fs::write(&config_path, toml::to_string_pretty(&original).unwrap()).unwrap();

        assert_eq!(Config::load_from_path(&config_path).unwrap(), original);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "cc = \"gcc\"\n").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.cc, "gcc");
        assert_eq!(config.entry, "Tiger_main");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "extra_libs = 3\n").unwrap();

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(matches!(err, TigertError::Config(_)));
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/tigert.toml"));
        assert!(result.is_err());
    }
}
