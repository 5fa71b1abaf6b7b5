//! Polls configuration
//!
//! Read from `~/.polls/config.toml` when it exists, otherwise defaults.
//! `DATABASE_URL`, `POLLS_BIND` and `POLLS_MAX_CONNECTIONS` override the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;
use crate::http::ServerConfig;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path} (invalid TOML): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollsConfig {
    pub bind: SocketAddr,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
}

impl Default for PollsConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

impl PollsConfig {
    /// Default config file path: ~/.polls/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".polls/config.toml")
    }

    /// Load the file (if present) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        let mut config = Self::from_file(&path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // ${VAR} references in the URL come from the environment
        if let Some(url) = config.database_url.take() {
            config.database_url = Some(expand_vars(&url, |name| std::env::var(name).ok()));
        }

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Override fields from environment variables looked up via `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            self.database_url = Some(url);
        }

        if let Some(raw) = lookup("POLLS_BIND") {
            self.bind = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "POLLS_BIND",
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup("POLLS_MAX_CONNECTIONS") {
            self.max_connections = raw
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: "POLLS_MAX_CONNECTIONS",
                    value: raw.clone(),
                })?;
        }

        Ok(())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

fn expand_vars<F>(s: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&lookup(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
