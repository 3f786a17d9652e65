//! Configuration management for NextMsg CLI
//!
//! Stores the server URL in ~/.config/nextmsg/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "nextmsg";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Set server URL (must be http or https)
    pub fn set_server(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Server URL must start with http:// or https://: {}", url);
        }
        self.server_url = url.to_string();
        Ok(())
    }

    /// Server URL for this invocation; an explicit override wins
    pub fn resolve_server(&self, override_url: Option<&str>) -> String {
        override_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.server_url)
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("nextmsg-cli-test-{}-{}", name, std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path("missing")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("save");
        let mut config = Config::default();
        config.set_server("https://nextmsg.example.com/").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server_url, "https://nextmsg.example.com");

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_empty_file_uses_default_url() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_set_server_rejects_other_schemes() {
        let mut config = Config::default();
        assert!(config.set_server("ftp://example.com").is_err());
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_resolve_server_override() {
        let config = Config::default();
        assert_eq!(config.resolve_server(None), "http://127.0.0.1:8000");
        assert_eq!(config.resolve_server(Some("  ")), "http://127.0.0.1:8000");
        assert_eq!(
            config.resolve_server(Some("http://localhost:3000/")),
            "http://localhost:3000"
        );
    }
}
