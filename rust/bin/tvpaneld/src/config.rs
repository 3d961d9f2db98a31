//! Server-side configuration, read from a TOML file.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/tvpanel"
//!
//! [server]
//! listen = "0.0.0.0:8080"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use tvpanel_core::ServiceConfig;

/// Directory searched for context names.
pub const CONFIG_DIR: &str = "/etc/tvpanel";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ListenConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,

    /// Defaults to `{data_dir}/panels.redb`.
    #[serde(default)]
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub listen: Option<String>,
}

impl ServerConfig {
    /// A bare name maps to `/etc/tvpanel/<name>.toml`; anything containing
    /// `/` or `.` is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{name_or_path}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        if config.storage.data_dir.trim().is_empty() {
            anyhow::bail!("storage.data_dir is empty in configuration");
        }
        Ok(config)
    }

    /// Shared service config; `listen` wins over the file when given.
    pub fn service_config(&self, listen: Option<&str>) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        let listen = listen
            .map(str::to_string)
            .or_else(|| self.server.listen.clone())
            .unwrap_or(defaults.listen.clone());
        ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            db_path: self.storage.db_path.as_ref().map(PathBuf::from),
            listen,
            ..defaults
        }
    }
}
