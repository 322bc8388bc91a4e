use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{model::UnitSystem, provider::ServiceId};

const GOOGLE_KEY_VAR: &str = "WEATHER_GOOGLE_API_KEY";
const OPENWEATHER_KEY_VAR: &str = "WEATHER_OPENWEATHER_API_KEY";

/// Credentials for a single upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Unit system used when `--units` is not given.
    #[serde(default)]
    pub units: Option<UnitSystem>,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

/// Both API keys, resolved once at startup and handed to the clients.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeys {
    pub google: String,
    pub openweather: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("google", &"<redacted>")
            .field("openweather", &"<redacted>")
            .finish()
    }
}

/// Key file layout used by older installs (`.apiConfig`).
#[derive(Debug, Deserialize)]
struct LegacyKeyFile {
    #[serde(rename = "OpenWeatherMapApiKey")]
    openweather: Option<String>,
    #[serde(rename = "GoogleApiKey")]
    google: Option<String>,
}

impl Config {
    /// Load config from the platform config directory, or an empty default on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Merge keys from a legacy JSON key file. Keys present in the file win.
    pub fn load_legacy_key_file(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;

        let keys: LegacyKeyFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse key file: {}", path.display()))?;

        if let Some(key) = keys.google {
            self.set_api_key(ServiceId::Google, key);
        }
        if let Some(key) = keys.openweather {
            self.set_api_key(ServiceId::OpenWeather, key);
        }

        Ok(())
    }

    /// Override keys from `WEATHER_GOOGLE_API_KEY` / `WEATHER_OPENWEATHER_API_KEY`.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (id, var) in [
            (ServiceId::Google, GOOGLE_KEY_VAR),
            (ServiceId::OpenWeather, OPENWEATHER_KEY_VAR),
        ] {
            if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
                tracing::debug!(service = %id, "API key taken from {var}");
                self.set_api_key(id, key);
            }
        }
    }

    pub fn set_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services
            .insert(id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key for a service, if present and non-empty.
    pub fn api_key(&self, id: ServiceId) -> Option<&str> {
        self.services
            .get(id.as_str())
            .map(|cfg| cfg.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self, id: ServiceId) -> bool {
        self.api_key(id).is_some()
    }

    /// Both keys, or an error naming the first missing one.
    pub fn api_keys(&self) -> Result<ApiKeys> {
        let key = |id: ServiceId| {
            self.api_key(id).map(str::to_owned).ok_or_else(|| {
                anyhow!(
                    "No API key configured for service '{id}'.\n\
                     Hint: run `weather configure` and enter your API keys."
                )
            })
        };

        Ok(ApiKeys {
            google: key(ServiceId::Google)?,
            openweather: key(ServiceId::OpenWeather)?,
        })
    }
}
