//! Server configuration from environment variables.

use crate::error::ConfigError;
use crate::merge::Merger;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "db";
pub const DEFAULT_SNAPSHOT_PATH: &str = "db.json";
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of JSON source files.
    pub data_dir: PathBuf,
    /// Where the merged document is written for inspection. `None` disables it.
    pub snapshot_path: Option<PathBuf>,
    /// Directory served for paths no route claims. `None` disables it.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }
}

impl ServerConfig {
    /// Read HOST, PORT, DATA_DIR, SNAPSHOT_PATH and STATIC_DIR; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST").filter(|s| !s.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            if dir.trim().is_empty() {
                return Err(ConfigError::Load("DATA_DIR must not be empty".into()));
            }
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(snapshot) = lookup("SNAPSHOT_PATH") {
            config.snapshot_path = if snapshot.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(snapshot))
            };
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn merger(&self) -> Merger {
        let merger = Merger::new(&self.data_dir);
        match &self.snapshot_path {
            Some(path) => merger.with_snapshot(path),
            None => merger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, PathBuf::from("db"));
        assert_eq!(config.snapshot_path, Some(PathBuf::from("db.json")));
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "3001"),
            ("HOST", "127.0.0.1"),
            ("DATA_DIR", "data"),
            ("SNAPSHOT_PATH", ""),
            ("STATIC_DIR", "assets"),
        ]))
        .unwrap();
        assert_eq!(config.static_dir, Some(PathBuf::from("assets")));
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_empty_static_dir_disables_hosting() {
        let config = ServerConfig::from_lookup(lookup(&[("STATIC_DIR", " ")])).unwrap();
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "http"));
    }
}
