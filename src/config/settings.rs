use super::files::{atomic_write, read_file};
use crate::domain::LayoutConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Application settings stored in config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub map: MapSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Server root; requests go to `<base_url>/api/tasks`
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <token>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub base_radius: f64,
    pub ring_spacing: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            base_radius: layout.base_radius,
            ring_spacing: layout.ring_spacing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// How long status notices stay visible
    pub notice_secs: u64,
    /// Event poll interval; completions are drained at this rate
    pub poll_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notice_secs: crate::notifications::DEFAULT_NOTICE_SECS,
            poll_ms: 100,
        }
    }
}

impl Settings {
    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if token.is_some() {
            self.api.token = token;
        }
        self
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            base_radius: self.map.base_radius,
            ring_spacing: self.map.ring_spacing,
            ..LayoutConfig::default()
        }
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.ui.notice_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ui.poll_ms.max(10))
    }
}

/// Load settings from a TOML file. A missing file yields the defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    match read_file(path)? {
        Some(content) => {
            info!(config = %path.display(), "loading config");
            toml::from_str(&content)
                .with_context(|| format!("Invalid config file: {}", path.display()))
        }
        None => {
            debug!(config = %path.display(), "no config file, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Write settings to a TOML file atomically
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let content = toml::to_string_pretty(settings).context("Failed to serialize config")?;
    atomic_write(path, &content)
}

/// Create a default config file, refusing to overwrite an existing one
pub fn init_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }
    save_settings(path, &Settings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path().join("none.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api.base_url, "http://localhost:8080");
        assert_eq!(settings.notice_ttl(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntoken = \"abc\"\n\n[map]\nbase_radius = 40.0\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.api.token.as_deref(), Some("abc"));
        assert_eq!(settings.api.base_url, "http://localhost:8080");
        assert_eq!(settings.layout_config().base_radius, 40.0);
        assert_eq!(settings.map.ring_spacing, MapSettings::default().ring_spacing);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_init_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskmap").join("config.toml");

        init_config(&path).unwrap();
        assert!(init_config(&path).is_err());

        let settings = load_settings(&path)
            .unwrap()
            .with_overrides(Some("http://example.test".to_string()), Some("t0k".to_string()));
        save_settings(&path, &settings).unwrap();

        let reloaded = load_settings(&path).unwrap();
        assert_eq!(reloaded.api.base_url, "http://example.test");
        assert_eq!(reloaded.api.token.as_deref(), Some("t0k"));
    }

    #[test]
    fn test_overrides_keep_file_token_when_absent() {
        let mut settings = Settings::default();
        settings.api.token = Some("file".to_string());
        let settings = settings.with_overrides(None, None);
        assert_eq!(settings.api.token.as_deref(), Some("file"));
    }
}
