//! Server configuration.
//!
//! Loaded from a YAML file (`WARDEN_CONFIG`, default `warden.yaml`). A missing
//! file yields the defaults; `LISTEN` overrides the listen address.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "warden.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: String,
    /// Deadline for reading one full request off the socket
    pub read_timeout_secs: u64,
    /// Largest header block (request line and headers) accepted
    pub max_header_bytes: usize,
    /// Largest request body accepted via Content-Length
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_secs: 30,
            max_header_bytes: 8 * 1024,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory page and asset paths are resolved against
    pub root: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: "static".to_string(),
        }
    }
}

/// Account seeded into the in-memory credential store at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub account: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

impl Config {
    /// Loads configuration from `WARDEN_CONFIG`, then applies `LISTEN`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("WARDEN_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut cfg = Self::from_file(Path::new(&path))?;

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    /// Reads a YAML config file. A file that does not exist yields defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default().with_default_users());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        Ok(cfg.with_default_users())
    }

    fn with_default_users(mut self) -> Self {
        if self.users.is_empty() {
            self.users.push(UserConfig {
                account: "gugu".to_string(),
                email: "hkkang@woowahan.com".to_string(),
                password: "password".to_string(),
            });
        }
        self
    }
}
