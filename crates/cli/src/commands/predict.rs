use std::path::PathBuf;

use anyhow::{Context, Result};
use stylescope_client::api::StyleApi;
use stylescope_client::client::ProgressClient;
use stylescope_client::config::ClientConfig;
use stylescope_client::listener::ProgressListener;
use stylescope_controller::controller::PageController;
use stylescope_controller::view::ProgressView;
use stylescope_core::upload::{UploadLimits, UploadSelection};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::display;

pub struct PredictOptions {
    pub image: PathBuf,
    pub comment: Option<String>,
    pub favorite: bool,
    /// `Some(true)` for accurate, `Some(false)` for inaccurate.
    pub feedback: Option<bool>,
}

pub async fn run(config: &ClientConfig, options: PredictOptions) -> Result<()> {
    let api = StyleApi::from_config(config).context("Failed to build HTTP client")?;
    let limits = UploadLimits {
        max_bytes: config.max_upload_bytes,
    };
    let mut controller = PageController::new(api, limits);

    let selection = UploadSelection::from_path(&options.image).await?;
    if let Err(e) = controller.select_file(selection).await {
        display::print_page(controller.view());
        return Err(e.into());
    }
    if let Some(preview) = controller.view().upload.preview.as_ref() {
        println!(
            "📷 {} ({}x{})",
            options.image.display(),
            preview.width,
            preview.height
        );
    }

    let listener = config.ws_url.as_ref().map(|url| {
        let (listener, rx) = ProgressListener::start_with_receiver(ProgressClient::new(url.clone()));
        controller.attach_progress(rx);
        listener
    });
    let printer = spawn_progress_printer(controller.watch_progress());

    let outcome = controller.submit(options.comment.as_deref()).await;
    printer.abort();
    if let Some(listener) = listener {
        listener.shutdown().await;
    }
    display::print_page(controller.view());
    outcome?;

    if options.favorite {
        let saved = controller.save_favorite().await;
        display::print_notice(controller.view());
        saved?;
    }

    if let Some(is_accurate) = options.feedback {
        let sent = controller.submit_feedback(is_accurate).await;
        display::print_feedback(controller.view());
        sent?;
    }

    Ok(())
}

/// Echo the controller's progress indicator to stderr while the
/// prediction runs.
fn spawn_progress_printer(mut watched: watch::Receiver<Option<ProgressView>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while watched.changed().await.is_ok() {
            let current = watched.borrow_and_update().clone();
            if let Some(ProgressView { step, percent }) = current {
                eprintln!("⏳ {step} ({percent}%)");
            }
        }
    })
}
