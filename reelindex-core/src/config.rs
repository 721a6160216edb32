//! Configuration for reelindex

use crate::ReelError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the scan root when no explicit config is given
pub const CONFIG_FILE_NAME: &str = "reelindex.toml";

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Reelindex Configuration

[server]
# Address the HTTP service binds to
bind = "0.0.0.0"
port = 8080

[scan]
# Video extensions to index (case-insensitive, without the dot)
extensions = ["mp4", "mkv"]
# Follow symbolic links while walking the scan root
follow_links = false

[store]
# SQLite database file, relative paths resolve against the scan root
path = "movies.db"

[ignore]
# Glob patterns (relative to the scan root) to skip while scanning
patterns = []
"#;

/// Reelindex configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

// Default value functions
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_extensions() -> Vec<String> {
    vec!["mp4".to_string(), "mkv".to_string()]
}
fn default_store_path() -> PathBuf {
    PathBuf::from("movies.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            follow_links: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `reelindex.toml` from the scan root, falling back to defaults
    pub fn load_from_root(root: &Path) -> crate::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| ReelError::ConfigParse(e.to_string()))
    }

    /// Database location, with relative paths resolved against `root`
    pub fn store_path(&self, root: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            root.join(&self.store.path)
        }
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
