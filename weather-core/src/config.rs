use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::controller::ResponseOrdering;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

/// WeatherAPI.com credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the public API root, e.g. for a local proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// How overlapping queries resolve.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryConfig {
    pub ordering: ResponseOrdering,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weatherapi]
/// api_key = "..."
///
/// [query]
/// ordering = "latest-issued-wins"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weatherapi: ProviderConfig,
    pub query: QueryConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weatherapi.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.weatherapi.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// API key from `WEATHERAPI_KEY`, falling back to the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        Self::api_key_from(std::env::var(API_KEY_ENV).ok(), self)
    }

    pub(crate) fn api_key_from(env_value: Option<String>, config: &Config) -> Result<String> {
        env_value
            .into_iter()
            .chain(config.weatherapi.api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured for WeatherAPI.com.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = Config::api_key_from(None, &cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn set_api_key_marks_configured() {
        let mut cfg = Config::default();
        assert!(!cfg.is_configured());

        cfg.set_api_key("FILE_KEY".into());

        assert!(cfg.is_configured());
        assert_eq!(Config::api_key_from(None, &cfg).unwrap(), "FILE_KEY");
    }

    #[test]
    fn environment_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let key = Config::api_key_from(Some("ENV_KEY".into()), &cfg).unwrap();
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn blank_environment_key_falls_back_to_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let key = Config::api_key_from(Some("   ".into()), &cfg).unwrap();
        assert_eq!(key, "FILE_KEY");
    }

    #[test]
    fn parses_full_toml() {
        let cfg = Config::from_toml(
            r#"
            [weatherapi]
            api_key = "abc"
            base_url = "http://localhost:9000/v1"

            [query]
            ordering = "last-arrival-wins"
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.weatherapi.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.weatherapi.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert_eq!(cfg.query.ordering, ResponseOrdering::LastArrivalWins);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = Config::from_toml("").expect("empty config is valid");

        assert!(!cfg.is_configured());
        assert_eq!(cfg.query.ordering, ResponseOrdering::LatestIssuedWins);
    }

    #[test]
    fn unknown_ordering_is_rejected() {
        let err = Config::from_toml("[query]\nordering = \"random\"\n");
        assert!(err.is_err());
    }
}
