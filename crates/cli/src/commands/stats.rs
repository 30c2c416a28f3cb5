use anyhow::{Context, Result};
use stylescope_client::api::StyleApi;
use stylescope_client::config::ClientConfig;

use crate::display;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let api = StyleApi::from_config(config).context("Failed to build HTTP client")?;
    let stats = api.stats().await.context("Failed to fetch statistics")?;
    display::print_stats(&stats);
    Ok(())
}
