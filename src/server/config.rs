//! Server configuration
//!
//! Defaults, optionally overridden by a JSON file (`OVERLORD_CONFIG`) and
//! then by the environment (`PORT`, `OVERLORD_HOST`, `OVERLORD_ROOT`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ServerError;

/// Default listening port
pub const DEFAULT_PORT: u16 = 4000;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV: &str = "OVERLORD_CONFIG";

/// Static file server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    pub port: u16,
    /// Directory whose files are served
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from("dist"),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    /// Read a JSON config file; missing fields keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ServerError> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), ServerError> {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PORT: {:?}", port)))?;
        }
        if let Some(host) = lookup("OVERLORD_HOST") {
            self.host = host;
        }
        if let Some(root) = lookup("OVERLORD_ROOT") {
            self.root = PathBuf::from(root);
        }
        Ok(())
    }

    /// Address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
        assert_eq!(config.root, PathBuf::from("dist"));
    }

    #[test]
    fn test_env_overrides() {
        let config =
            ServerConfig::from_lookup(env(&[("PORT", "8080"), ("OVERLORD_ROOT", "public")]))
                .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.root, PathBuf::from("public"));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.json");
        std::fs::write(&file, r#"{ "host": "127.0.0.1", "port": 5000 }"#).unwrap();
        let file = file.to_string_lossy().to_string();

        let config = ServerConfig::from_lookup(env(&[(CONFIG_ENV, file.as_str())])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.root, PathBuf::from("dist"));

        let config =
            ServerConfig::from_lookup(env(&[(CONFIG_ENV, file.as_str()), ("PORT", "6000")])).unwrap();
        assert_eq!(config.port, 6000);
    }

    #[test]
    fn test_missing_config_file() {
        let err =
            ServerConfig::from_lookup(env(&[(CONFIG_ENV, "/definitely/not/here.json")]))
                .unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
