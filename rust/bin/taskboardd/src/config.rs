//! Server configuration, loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level server configuration.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/taskboard"
///
/// [server]
/// listen = "0.0.0.0:8080"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ListenConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database and any future data files.
    pub data_dir: String,

    /// Explicit database path, overriding `{data_dir}/data.sqlite`.
    #[serde(default)]
    pub sqlite_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenConfig {
    /// Listen address. The `--listen` CLI flag takes precedence.
    #[serde(default)]
    pub listen: Option<String>,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A bare name resolves to `/etc/taskboard/<name>.toml`; anything
    /// containing `/` or `.` is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/taskboard/{name_or_path}.toml"))
        }
    }

    /// Load and parse the configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
        let config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse {}: {e}", path.display()))?;
        if config.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir must not be empty");
        }
        Ok(config)
    }
}
