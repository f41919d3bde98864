use std::path::Path;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Backend the replay cache wraps
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    /// Unset keeps entries until cleared
    pub time_to_live_secs: Option<u64>,
    pub max_capacity: Option<u64>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            time_to_live_secs: None,
            max_capacity: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layers `default` and `local` files from `dir`, then `APP__*` variables
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.cache.backend, "in_memory");
        assert!(config.cache.time_to_live_secs.is_none());
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let config = from_json(r#"{"cache": {"backend": "redis", "redis_url": "redis://cache"}}"#);

        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://cache"));
        assert_eq!(config.logging.level, "info");
    }

    fn config_dir(name: &str, local: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "llm-replay-cache-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("local.toml"), local).unwrap();
        dir
    }

    #[test]
    fn test_load_from_layers_local_file() {
        let dir = config_dir("layered", "[cache]\nbackend = \"redis\"\nmax_capacity = 5\n");

        let config = AppConfig::load_from(&dir).unwrap();

        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.max_capacity, Some(5));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_from_rejects_malformed_values() {
        let dir = config_dir("malformed", "[cache]\nmax_capacity = \"lots\"\n");

        assert!(AppConfig::load_from(&dir).is_err());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_log_format_is_lowercase() {
        let config = from_json(r#"{"logging": {"level": "debug", "format": "json"}}"#);

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
    }
}
