use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::error::PanelError;

/// Panel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Backend API the panel reads from and writes to
    #[serde(default)]
    pub backend: BackendConfig,

    /// Public hostname the panel is served from, used to derive the default
    /// client monitor URL
    pub panel_host: Option<String>,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the admin backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `Authorization: Bearer <key>`
    pub api_key: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Get default config paths
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // XDG config path
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("intake-panel").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(
            home_dir
                .join(".config")
                .join("intake-panel")
                .join("config.toml"),
        );
        paths.push(home_dir.join(".intake-panel.rc"));
    }

    paths
}

/// Load configuration from the first default path that exists
pub fn load_config() -> Result<PanelConfig, PanelError> {
    info!("Loading configuration from default paths");

    for path in default_config_paths() {
        if path.exists() {
            info!("Found config at: {:?}", path);
            return load_config_from_path(&path);
        }
    }

    info!("No config file found, using defaults");
    Ok(PanelConfig::default())
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<PanelConfig, PanelError> {
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .map_err(|e| PanelError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<PanelConfig, PanelError> {
    let config: PanelConfig = toml::from_str(content)
        .map_err(|e| PanelError::Config(format!("Failed to parse config: {}", e)))?;

    if config.backend.base_url.trim().is_empty() {
        return Err(PanelError::Config("backend.base_url must not be empty".into()));
    }
    if config.backend.timeout_secs == 0 {
        return Err(PanelError::Config("backend.timeout_secs must be positive".into()));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:3333");
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.panel_host.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            panel_host = "admin.acme.example.com"

            [backend]
            base_url = "https://admin.acme.example.com:3333"
            api_key = "abc123"
            timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.panel_host.as_deref(), Some("admin.acme.example.com"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config("[backend]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nbase_url = \"http://10.0.0.5:3333\"").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:3333");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }
}
