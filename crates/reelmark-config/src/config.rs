use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "zh-TW";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_toast_ttl_seconds")]
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_toast_ttl_seconds() -> u64 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { ttl_seconds: default_toast_ttl_seconds() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file: None }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the config file if it exists (defaults otherwise), then apply environment overrides.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!("Config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `TMDB_*` overrides. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = get("TMDB_API_KEY") {
            self.tmdb.api_key = api_key;
        }
        if let Some(base) = get("TMDB_API_BASE_URL") {
            self.tmdb.api_base_url = base;
        }
        if let Some(base) = get("TMDB_IMAGE_BASE_URL") {
            self.tmdb.image_base_url = base;
        }
        if let Some(language) = get("TMDB_LANGUAGE") {
            self.tmdb.language = language;
        }
    }

    /// Missing credentials or base URLs are fatal at startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_api_key_configured() {
            return Err(anyhow::anyhow!(
                "TMDB api_key is not configured (set it in config.toml or TMDB_API_KEY)"
            ));
        }

        for (name, url) in [
            ("api_base_url", &self.tmdb.api_base_url),
            ("image_base_url", &self.tmdb.image_base_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.tmdb.language.trim().is_empty() {
            return Err(anyhow::anyhow!("language cannot be empty"));
        }

        Ok(())
    }

    pub fn is_api_key_configured(&self) -> bool {
        let key = self.tmdb.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            tmdb: TmdbConfig {
                api_key: "test_key".to_string(),
                language: "en-US".to_string(),
                ..TmdbConfig::default()
            },
            ..Config::default()
        };

        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.tmdb.api_key, "test_key");
        assert_eq!(loaded.tmdb.language, "en-US");
        assert_eq!(loaded.tmdb.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(loaded.toast.ttl_seconds, 3);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let config: Config = toml::from_str("[tmdb]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.tmdb.api_key, "abc");
        assert_eq!(config.tmdb.language, "zh-TW");
        assert_eq!(config.tmdb.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        assert!(!config.is_api_key_configured());

        config.tmdb.api_key = "YOUR_API_KEY".to_string();
        assert!(config.validate().is_err());

        config.tmdb.api_key = "real_key".to_string();
        assert!(config.validate().is_ok());

        config.tmdb.api_base_url = "api.themoviedb.org/3".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            ("TMDB_API_KEY", "from_env"),
            ("TMDB_LANGUAGE", ""),
            ("TMDB_API_BASE_URL", "http://localhost:9000/3"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tmdb.api_key, "from_env");
        assert_eq!(config.tmdb.language, "zh-TW");
        assert_eq!(config.tmdb.api_base_url, "http://localhost:9000/3");
    }
}
