//! Configuration management for trivfold
//!
//! This crate provides functionality for managing the trivfold configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
#[allow(deprecated)]
use std::env::home_dir;
use std::path::PathBuf;
use tracing::debug;
use trivfold_common::utils::{
    env::get_env,
    io::file::{delete_path, read_file, write_file},
};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the location of the configuration file.
pub const CONFIG_PATH_ENV: &str = "TRIVFOLD_CONFIG";

/// The [`Configuration`] struct holds the settings the simplifier reads when the
/// caller does not pass explicit arguments.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Upper bound on repeated runs of the identity pass
    pub max_iterations: usize,

    /// Verify the program before simplifying it
    pub verify_before: bool,

    /// Verify the program after simplifying it
    pub verify_after: bool,

    /// Extra `tracing` filter directives, e.g. `trivfold_simplify=trace`
    pub log_filter: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            max_iterations: 8,
            verify_before: false,
            verify_after: false,
            log_filter: "".to_string(),
        }
    }
}

/// Returns the path of the configuration file: `$TRIVFOLD_CONFIG` if set, otherwise
/// `$HOME/.trivfold/config.toml`.
#[allow(deprecated)]
pub fn config_path() -> Result<PathBuf, Error> {
    if let Some(path) = get_env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut home = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".trivfold");
    home.push("config.toml");
    Ok(home)
}

fn path_str(path: &std::path::Path) -> Result<&str, Error> {
    path.to_str().ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&config_path()?)
    }

    /// Reads the configuration at `path`, writing the defaults there first if the
    /// file doesn't exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self, Error> {
        // if the config file doesn't exist, create it
        if !path.exists() {
            debug!("no configuration at '{}', writing defaults", path.display());
            Configuration::default().save_to(path)?;
        }

        // read the config file
        let contents = read_file(path_str(path)?)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        // parse the config file
        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&config_path()?)
    }

    /// Saves the current configuration to `path`.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), Error> {
        write_file(
            path_str(path)?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file.
    pub fn delete() -> Result<(), Error> {
        let path = config_path()?;
        if !delete_path(path_str(&path)?) {
            return Err(Error::Generic(format!(
                "failed to delete config file at '{}'",
                path.display()
            )));
        }

        Ok(())
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "max_iterations" => {
                self.max_iterations = value.parse::<usize>().map_err(|_| {
                    Error::ParseError(format!(
                        "invalid value: \'{value}\' is not a valid iteration count."
                    ))
                })?;
            }
            "verify_before" => {
                self.verify_before = parse_bool(value)?;
            }
            "verify_after" => {
                self.verify_after = parse_bool(value)?;
            }
            "log_filter" => {
                self.log_filter = value.to_string();
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, Error> {
    value
        .parse::<bool>()
        .map_err(|_| Error::ParseError(format!("invalid value: \'{value}\' is not a boolean.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Points `TRIVFOLD_CONFIG` at a fresh temporary file for the duration of a
    /// test.
    fn isolated_config() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::env::set_var(CONFIG_PATH_ENV, dir.path().join("config.toml"));
        dir
    }

    // Test default configuration
    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.max_iterations, 8);
        assert!(!config.verify_before);
        assert!(!config.verify_after);
        assert_eq!(config.log_filter, "");
    }

    // Test loading configuration from a file
    #[test]
    #[serial]
    fn test_load_configuration() {
        let dir = isolated_config();
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
        assert!(dir.path().join("config.toml").exists());
    }

    // Test saving configuration to a file
    #[test]
    #[serial]
    fn test_save_configuration() {
        let _dir = isolated_config();
        let mut config = Configuration::default();

        config.update("max_iterations", "3").expect("failed to update max_iterations");
        config.update("verify_after", "true").expect("failed to update verify_after");
        config.update("log_filter", "trivfold_simplify=trace").expect("failed to update filter");

        let loaded_config = Configuration::load().expect("failed to load config file");

        assert_eq!(loaded_config.max_iterations, 3);
        assert!(!loaded_config.verify_before);
        assert!(loaded_config.verify_after);
        assert_eq!(loaded_config.log_filter, "trivfold_simplify=trace");
    }

    // Test rejecting bad keys and values
    #[test]
    #[serial]
    fn test_update_is_type_checked() {
        let _dir = isolated_config();
        let mut config = Configuration::default();

        assert!(matches!(config.update("max_iterations", "many"), Err(Error::ParseError(_))));
        assert!(matches!(config.update("verify_before", "yes"), Err(Error::ParseError(_))));
        assert!(matches!(config.update("rpc_url", "http://localhost"), Err(Error::Generic(_))));
        assert_eq!(config, Configuration::default());
    }

    // Test deleting configuration file
    #[test]
    #[serial]
    fn test_delete_configuration() {
        let _dir = isolated_config();
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("max_iterations", "1").expect("failed to update max_iterations");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "verify_before = true\n").expect("failed to write config");

        let config = Configuration::load_from(&path).expect("failed to load config file");
        assert!(config.verify_before);
        assert_eq!(config.max_iterations, 8);

        std::fs::write(&path, "max_iterations = \"eight\"\n").expect("failed to write config");
        assert!(matches!(Configuration::load_from(&path), Err(Error::ParseError(_))));
    }
}
