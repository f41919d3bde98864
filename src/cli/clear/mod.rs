//! Clear command - drops every recorded slot in the configured backend

use tracing::info;

/// Run the clear command
pub async fn run() -> anyhow::Result<()> {
    let cache = super::bootstrap().await?;

    cache.clear().await?;
    info!("recorded responses cleared");
    println!("cleared");

    Ok(())
}
