use anyhow::{Context, Result};
use stylescope_client::api::StyleApi;
use stylescope_client::config::ClientConfig;
use stylescope_controller::controller::PageController;
use stylescope_core::upload::UploadLimits;

use crate::display;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let api = StyleApi::from_config(config).context("Failed to build HTTP client")?;
    let mut controller = PageController::new(
        api,
        UploadLimits {
            max_bytes: config.max_upload_bytes,
        },
    );

    let refreshed = controller.refresh_status().await;
    if let Some(status) = controller.view().service_status.as_ref() {
        display::print_service_status(status);
    }
    refreshed?;
    Ok(())
}
