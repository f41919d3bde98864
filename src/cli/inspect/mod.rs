//! Inspect command - prints a recorded sequence as JSON lines

use std::io::Write;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::domain::cache::{Generation, LogicalKey};
use crate::domain::{recorded_sequence, LlmCache};

/// Arguments for the inspect command
#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Prompt text of the logical key
    #[arg(long)]
    pub prompt: String,

    /// Configuration fingerprint of the logical key
    #[arg(long)]
    pub llm_string: String,

    /// Highest number of positions to read
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct RecordedSlot<'a> {
    position: usize,
    generations: &'a [Generation],
}

/// Run the inspect command
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let cache = super::bootstrap().await?;
    let stdout = std::io::stdout();

    let count = write_sequence(cache.as_ref(), &args, &mut stdout.lock()).await?;
    info!(count, "recorded sequence printed");

    Ok(())
}

async fn write_sequence<W: Write>(
    cache: &dyn LlmCache,
    args: &InspectArgs,
    out: &mut W,
) -> anyhow::Result<usize> {
    let key = LogicalKey::new(args.prompt.as_str(), args.llm_string.as_str());
    let sequence = recorded_sequence(cache, &key, args.limit).await?;

    for (position, generations) in sequence.iter().enumerate() {
        let line = serde_json::to_string(&RecordedSlot {
            position,
            generations,
        })?;
        writeln!(out, "{}", line)?;
    }

    Ok(sequence.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCache;

    fn args(limit: usize) -> InspectArgs {
        InspectArgs {
            prompt: "Hello!".to_string(),
            llm_string: "cfg".to_string(),
            limit,
        }
    }

    async fn recorded() -> InMemoryCache {
        let cache = InMemoryCache::new();
        let key = LogicalKey::new("Hello!", "cfg");

        for (position, text) in ["One", "Two", "Four"].into_iter().enumerate() {
            let slot = key.at(position as u64);
            cache
                .store(slot.prompt(), slot.llm_string(), vec![Generation::new(text)])
                .await
                .unwrap();
        }

        cache
    }

    #[tokio::test]
    async fn test_writes_one_line_per_slot() {
        let cache = recorded().await;
        let mut out = Vec::new();

        let count = write_sequence(&cache, &args(10), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(count, 3);
        assert_eq!(lines.len(), 3);

        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["position"], 2);
        assert_eq!(last["generations"][0]["text"], "Four");
    }

    #[tokio::test]
    async fn test_respects_limit() {
        let cache = recorded().await;
        let mut out = Vec::new();

        let count = write_sequence(&cache, &args(1), &mut out).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_key_prints_nothing() {
        let cache = InMemoryCache::new();
        let mut out = Vec::new();

        let count = write_sequence(&cache, &args(10), &mut out).await.unwrap();

        assert_eq!(count, 0);
        assert!(out.is_empty());
    }
}
