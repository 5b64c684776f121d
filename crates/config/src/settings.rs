// Client settings
// Loaded from ~/.config/filehost/settings.json, then overridden by
// FILEHOST_API_BASE / FILEHOST_DEBUG.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "/api";

/// Environment variable overriding `api_base`.
pub const ENV_API_BASE: &str = "FILEHOST_API_BASE";

/// Environment variable overriding `debug` ("true" or "1" enables it).
pub const ENV_DEBUG: &str = "FILEHOST_DEBUG";

/// Client-side upload limits, checked before any upload request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    /// Largest accepted file, in bytes
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,

    /// Accepted MIME types; `type/*` accepts every subtype
    #[serde(rename = "allowedTypes")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024,
            allowed_types: vec![
                "image/*".to_string(),
                "application/pdf".to_string(),
                "text/*".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every API path is joined onto
    #[serde(rename = "apiBase")]
    pub api_base: String,

    /// Log outgoing requests and raw responses
    pub debug: bool,

    pub upload: UploadLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            debug: false,
            upload: UploadLimits::default(),
        }
    }
}

impl ClientConfig {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("filehost")
            .join("settings.json")
    }

    /// Load settings from the default location and apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::config_path());
        config.apply_overrides(|name| env::var(name).ok());
        config
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Error parsing {}: {} (using defaults)", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a closure in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = matches!(debug.trim(), "true" | "1");
        }
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "/api");
        assert!(!config.debug);
        assert_eq!(config.upload.max_file_size, 104_857_600);
        assert_eq!(config.upload.allowed_types.len(), 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.upload, UploadLimits::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());
    }

    #[test]
    fn test_written_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let config = ClientConfig {
            api_base: "https://files.example.com/api".into(),
            debug: true,
            upload: UploadLimits { max_file_size: 10, allowed_types: vec!["text/plain".into()] },
        };
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(ClientConfig::load_from(&path), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_BASE, " http://localhost:7070/api "),
            (ENV_DEBUG, "true"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.api_base, "http://localhost:7070/api");
        assert!(config.debug);

        config.apply_overrides(|name| (name == ENV_DEBUG).then(|| "no".to_string()));
        assert!(!config.debug);
        assert_eq!(config.api_base, "http://localhost:7070/api");
    }

    #[test]
    fn test_blank_api_base_override_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|name| (name == ENV_API_BASE).then(|| "  ".to_string()));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_endpoint_join() {
        let mut config = ClientConfig::default();
        assert_eq!(config.endpoint("/auth/me"), "/api/auth/me");

        config.api_base = "http://host:1/api/".into();
        assert_eq!(config.endpoint("/files"), "http://host:1/api/files");
        assert_eq!(config.endpoint("files"), "http://host:1/api/files");
    }
}
