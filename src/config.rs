use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};

/// File name looked up in the current directory
pub const CONFIG_FILE: &str = "gitflow.toml";

/// Represents the complete configuration for gitflow.
///
/// Every section is optional in the file; missing values fall back to defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Name printed by the `version` command; falls back to the manifest `name`
    #[serde(default)]
    pub project_name: Option<String>,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub manifests: ManifestsConfig,

    #[serde(default)]
    pub forge: ForgeConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

fn default_development() -> String {
    "development".to_string()
}

fn default_master() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Names of the two permanent branches and the remote branches are published to
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_development")]
    pub development: String,

    #[serde(default = "default_master")]
    pub master: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            development: default_development(),
            master: default_master(),
            remote: default_remote(),
        }
    }
}

fn default_manifest_files() -> Vec<PathBuf> {
    vec![PathBuf::from("package.json"), PathBuf::from("bower.json")]
}

/// Version manifests kept in sync; the first one is authoritative
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestsConfig {
    #[serde(default = "default_manifest_files")]
    pub files: Vec<PathBuf>,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        ManifestsConfig {
            files: default_manifest_files(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITFLOW_TOKEN".to_string()
}

/// Hosting service receiving review requests.
///
/// The credential itself is never stored here, only the name of the
/// environment variable holding it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ForgeConfig {
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfig {
            owner: None,
            repo: None,
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

impl ForgeConfig {
    /// Owner and repository name, or a configuration error naming what is missing
    pub fn repository(&self) -> Result<(String, String)> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.clone(), repo.clone()))
            }
            _ => Err(FlowError::config(
                "[forge] owner and repo must be set to open review requests",
            )),
        }
    }

    /// Read the credential from the configured environment variable
    pub fn token(&self) -> Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(FlowError::config(format!(
                "environment variable {} must hold an API token",
                self.token_env
            ))),
        }
    }
}

/// What a failing build does to the commit flow
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildPolicy {
    /// A failing build aborts the flow before anything is staged
    #[default]
    Require,
    /// A failing build is reported and the flow continues
    Warn,
    /// The build is not run
    Skip,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BuildConfig {
    /// Argument vector of the build/test command; empty means nothing to run
    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub policy: BuildPolicy,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotificationsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Desktop notification command; title and message are appended as arguments
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        NotificationsConfig {
            enabled: true,
            command: Vec::new(),
        }
    }
}

fn default_git_secs() -> u64 {
    600
}

fn default_http_secs() -> u64 {
    30
}

fn default_build_secs() -> u64 {
    1800
}

/// Upper bounds on external calls, in seconds
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TimeoutsConfig {
    #[serde(default = "default_git_secs")]
    pub git_secs: u64,

    #[serde(default = "default_http_secs")]
    pub http_secs: u64,

    #[serde(default = "default_build_secs")]
    pub build_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        TimeoutsConfig {
            git_secs: default_git_secs(),
            http_secs: default_http_secs(),
            build_secs: default_build_secs(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitflow.toml` in current directory
/// 3. `.gitflow.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE).exists() {
        PathBuf::from(CONFIG_FILE)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(".gitflow.toml");
        if !user_path.exists() {
            return Ok(Config::default());
        }
        user_path
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path)
        .map_err(|e| FlowError::config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&config_str)
        .map_err(|e| FlowError::config(format!("{} is invalid: {}", path.display(), e)))
}

/// Parse configuration text
pub fn parse_config(text: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(text)
}
