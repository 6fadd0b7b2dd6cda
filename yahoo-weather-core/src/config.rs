use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Yahoo application credentials, issued with the app registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub app_id: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional override for the update window, in seconds. Leaving it unset
    /// keeps the built-in five-minute default.
    pub min_update_timeout_secs: Option<i64>,

    /// Example TOML:
    /// [credentials]
    /// app_id = "..."
    /// client_id = "..."
    /// client_secret = "..."
    pub credentials: Option<Credentials>,
}

impl Config {
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
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
        let dirs = ProjectDirs::from("dev", "yahoo-weather", "yweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            app_id: "APP".into(),
            client_id: "KEY".into(),
            client_secret: "SECRET".into(),
        }
    }

    #[test]
    fn default_config_has_no_credentials() {
        let cfg = Config::default();
        assert!(!cfg.is_configured());
        assert!(cfg.credentials().is_none());
        assert!(cfg.min_update_timeout_secs.is_none());
    }

    #[test]
    fn set_credentials_marks_configured() {
        let mut cfg = Config::default();
        cfg.set_credentials(credentials());

        assert!(cfg.is_configured());
        assert_eq!(cfg.credentials().map(|c| c.app_id.as_str()), Some("APP"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_credentials(credentials());
        cfg.min_update_timeout_secs = Some(60);

        let serialized = toml::to_string_pretty(&cfg).expect("config must serialize");
        let parsed: Config = toml::from_str(&serialized).expect("config must parse back");

        assert_eq!(parsed.min_update_timeout_secs, Some(60));
        assert_eq!(parsed.credentials().map(|c| c.client_id.as_str()), Some("KEY"));
    }
}
