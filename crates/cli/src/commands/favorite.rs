use anyhow::{bail, Context, Result};
use stylescope_client::api::StyleApi;
use stylescope_client::config::ClientConfig;
use stylescope_core::prediction::FavoriteResponse;

pub async fn remove(config: &ClientConfig, favorite_id: &str) -> Result<()> {
    let api = StyleApi::from_config(config).context("Failed to build HTTP client")?;
    let response = api
        .remove_favorite(favorite_id)
        .await
        .with_context(|| format!("Failed to remove favorite {favorite_id}"))?;
    report(response, "Removed from favorites")
}

pub async fn update(config: &ClientConfig, favorite_id: &str, notes: &str) -> Result<()> {
    let api = StyleApi::from_config(config).context("Failed to build HTTP client")?;
    let response = api
        .update_favorite_notes(favorite_id, notes)
        .await
        .with_context(|| format!("Failed to update favorite {favorite_id}"))?;
    report(response, "Notes updated")
}

fn report(response: FavoriteResponse, default_message: &str) -> Result<()> {
    let message = response
        .message
        .clone()
        .unwrap_or_else(|| default_message.to_string());
    if !response.is_success() {
        bail!("{message}");
    }
    println!("✅ {message}");
    Ok(())
}
