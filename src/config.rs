//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsvn/rsvn.toml`
//! 3. Local config: `<dir>/.rsvn.toml` (usually the working copy)
//! 4. Environment variables: `RSVN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, IoResultExt};
use crate::domain::{
    expand_env_vars, GlobalOptions, DEFAULT_CONFIG_OPTION, DEFAULT_EXECUTABLE, MASK,
};

/// Unified configuration for rsvn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// svn executable (default: "svn" from PATH)
    pub executable: String,
    /// `--username`
    pub username: Option<String>,
    /// `--password`
    pub password: Option<String>,
    /// Pass `--no-auth-cache`
    pub no_auth_cache: bool,
    /// Pass `--non-interactive`
    pub non_interactive: bool,
    /// Pass `--trust-server-cert`
    pub trust_server_cert: bool,
    /// `--config-option` value; empty disables it
    pub config_option: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let options = GlobalOptions::default();
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            username: options.username,
            password: options.password,
            no_auth_cache: options.no_auth_cache,
            non_interactive: options.non_interactive,
            trust_server_cert: options.trust_server_cert,
            config_option: options.config_option,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
///
/// Has no `password`: config files never supply one, a `password` key is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub executable: Option<String>,
    pub username: Option<String>,
    pub no_auth_cache: Option<bool>,
    pub non_interactive: Option<bool>,
    pub trust_server_cert: Option<bool>,
    pub config_option: Option<String>,
}

/// Get the XDG config directory for rsvn.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsvn").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsvn.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".rsvn.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in the executable path.
    fn expand_paths(&mut self) {
        self.executable = expand_env_vars(&self.executable);
    }

    /// Merge overlay config onto self (base): overlay wins if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            executable: overlay
                .executable
                .clone()
                .unwrap_or_else(|| self.executable.clone()),
            username: overlay.username.clone().or_else(|| self.username.clone()),
            password: self.password.clone(),
            no_auth_cache: overlay.no_auth_cache.unwrap_or(self.no_auth_cache),
            non_interactive: overlay.non_interactive.unwrap_or(self.non_interactive),
            trust_server_cert: overlay.trust_server_cert.unwrap_or(self.trust_server_cert),
            config_option: overlay
                .config_option
                .clone()
                .or_else(|| self.config_option.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `dir` - Optional directory holding a local `.rsvn.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rsvn/rsvn.toml`
    /// 3. Local config: `<dir>/.rsvn.toml`
    /// 4. Environment variables: `RSVN_*` prefix
    pub fn load(dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply RSVN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSVN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("executable") {
            settings.executable = val;
        }
        if let Ok(val) = config.get_string("username") {
            settings.username = Some(val);
        }
        if let Ok(val) = config.get_string("password") {
            settings.password = Some(val);
        }
        if let Ok(val) = config.get_bool("no_auth_cache") {
            settings.no_auth_cache = val;
        }
        if let Ok(val) = config.get_bool("non_interactive") {
            settings.non_interactive = val;
        }
        if let Ok(val) = config.get_bool("trust_server_cert") {
            settings.trust_server_cert = val;
        }
        if let Ok(val) = config.get_string("config_option") {
            settings.config_option = Some(val);
        }

        Ok(settings)
    }

    /// Global options snapshot for a session.
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            username: self.username.clone(),
            password: self.password.clone(),
            no_auth_cache: self.no_auth_cache,
            non_interactive: self.non_interactive,
            trust_server_cert: self.trust_server_cert,
            config_option: self.config_option.clone(),
        }
    }

    /// Show the effective configuration as TOML, password masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.password.is_some() {
            shown.password = Some(MASK.to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# rsvn configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsvn/rsvn.toml  (your baseline)
#   Local:  <working-copy>/.rsvn.toml (per working copy)
#   Env:    RSVN_* environment variables (explicit overrides)

# svn executable (name on PATH or absolute path, ~ and $VAR are expanded)
# executable = "svn"

# User passed as --username
# username = "myid"
#
# The password is never read from this file.
# Pass --password or set RSVN_PASSWORD instead.

# Flags added to every invocation
# no_auth_cache = true
# non_interactive = true
# trust_server_cert = true

# Value for --config-option (set to "" to leave it out)
# config_option = "{DEFAULT_CONFIG_OPTION}"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
