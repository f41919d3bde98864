//! CLI module for the replay cache
//!
//! Operator commands against the configured cache backend:
//! - `inspect`: print the recorded sequence of a logical key
//! - `clear`: drop every recorded slot

pub mod clear;
pub mod inspect;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::LlmCache;
use crate::infrastructure::cache::{CacheConfig, CacheFactory, CacheType};
use crate::infrastructure::logging;

/// LLM Replay Cache - inspect and manage recorded LLM responses
#[derive(Parser)]
#[command(name = "llm-replay-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the values recorded for a (prompt, llm_string) pair, oldest first
    Inspect(inspect::InspectArgs),

    /// Remove every recorded value from the configured backend
    Clear,
}

/// Loads configuration, starts logging and opens the configured backend
pub(crate) async fn bootstrap() -> anyhow::Result<Arc<dyn LlmCache>> {
    bootstrap_from(Path::new("config")).await
}

async fn bootstrap_from(config_dir: &Path) -> anyhow::Result<Arc<dyn LlmCache>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_from(config_dir)
        .with_context(|| format!("failed to load configuration from {}", config_dir.display()))?;
    logging::init_logging(&config.logging);

    let cache_config = CacheConfig::from_settings(&config.cache)?;
    if cache_config.cache_type == CacheType::InMemory {
        warn!("in_memory backend selected; it holds no data outside this process");
    }

    Ok(CacheFactory::new().create(&cache_config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_fails_on_malformed_config() {
        let dir = std::env::temp_dir().join(format!("llm-replay-cache-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("local.toml"), "[cache]\nmax_capacity = \"lots\"\n").unwrap();

        let result = bootstrap_from(&dir).await;

        let err = result.err().unwrap();
        assert!(err.to_string().contains("failed to load configuration"));
        std::fs::remove_dir_all(dir).ok();
    }
}
