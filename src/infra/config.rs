// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::errors::CopilotError;
use crate::infra::paths;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "KCOPILOT_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Covers large uploads as well as slow answers.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_true")]
    pub show_sources: bool,
    /// Whether the documents sidebar starts open.
    #[serde(default = "default_true")]
    pub sidebar: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_sources: true,
            sidebar: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

fn default_accepted_extensions() -> Vec<String> {
    crate::files::ACCEPTED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Config {
    /// Which file to read: `explicit` when given, else the default
    /// location if it exists. `None` means built-in defaults.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(paths::config_file_path()).filter(|p| p.exists()),
        }
    }

    /// Load the located file, or defaults when there is none.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the API base URL: explicit override > `KCOPILOT_API_URL` > file.
    pub fn api_url(&self, cli_override: Option<&str>) -> Result<url::Url, CopilotError> {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(cli_override, env.as_deref(), &self.server.base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_seconds.max(1))
    }
}

fn resolve_api_url(
    cli_override: Option<&str>,
    env: Option<&str>,
    configured: &str,
) -> Result<url::Url, CopilotError> {
    let raw = cli_override
        .or(env.filter(|v| !v.trim().is_empty()))
        .unwrap_or(configured)
        .trim();

    let url = url::Url::parse(raw).map_err(|e| CopilotError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(CopilotError::InvalidUrl {
            url: raw.to_string(),
            message: "expected an http(s) base URL".into(),
        });
    }
    Ok(url)
}
