//! `stylescope` -- command-line front end for the style-prediction backend.
//!
//! Drives the page controller the way the upload page would: pick a file,
//! preview it, submit, then optionally save a favorite and leave feedback.
//! The resulting view is printed to stdout; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                      |
//! |------------------------|----------|-------------------------|----------------------------------|
//! | `STYLE_API_URL`        | no       | `http://localhost:5000` | Backend base URL                 |
//! | `STYLE_WS_URL`         | no       | --                      | Progress WebSocket URL           |
//! | `REQUEST_TIMEOUT_SECS` | no       | --                      | Per-request timeout              |
//! | `MAX_UPLOAD_BYTES`     | no       | `5242880`               | Upload size ceiling              |
//! | `FEEDBACK_PATH`        | no       | `/feedback`             | Feedback endpoint path           |
//! | `STATUS_PATH`          | no       | `/api/status`           | Status endpoint path             |

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stylescope_client::config::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "stylescope")]
#[command(about = "Classify the style of an outfit photo and browse recommendations", long_about = None)]
struct Cli {
    /// Backend base URL (overrides STYLE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Progress WebSocket URL (overrides STYLE_WS_URL)
    #[arg(long, global = true)]
    ws_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and print the predicted style and recommendations
    Predict {
        /// Image file (JPEG, PNG, GIF or WebP)
        image: PathBuf,

        /// Free-text comment sent along with the image
        #[arg(long)]
        comment: Option<String>,

        /// Save the prediction to favorites
        #[arg(long)]
        favorite: bool,

        /// Submit an accuracy judgment for the prediction
        #[arg(long, value_enum)]
        feedback: Option<Judgment>,
    },
    /// Check the backend's upstream service status
    Status,
    /// Show aggregate feedback statistics
    Stats,
    /// Manage saved favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Remove a saved favorite
    Remove { favorite_id: String },
    /// Replace the notes stored with a favorite
    Update {
        favorite_id: String,
        #[arg(long)]
        notes: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Judgment {
    Accurate,
    Inaccurate,
}

impl Judgment {
    fn is_accurate(self) -> bool {
        matches!(self, Judgment::Accurate)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stylescope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(ws_url) = cli.ws_url {
        config.ws_url = Some(ws_url);
    }
    tracing::debug!(api_url = %config.api_url, ws_url = ?config.ws_url, "Loaded client configuration");

    match cli.command {
        Commands::Predict {
            image,
            comment,
            favorite,
            feedback,
        } => {
            let options = commands::predict::PredictOptions {
                image,
                comment,
                favorite,
                feedback: feedback.map(Judgment::is_accurate),
            };
            commands::predict::run(&config, options).await?
        }
        Commands::Status => commands::status::run(&config).await?,
        Commands::Stats => commands::stats::run(&config).await?,
        Commands::Favorite { action } => match action {
            FavoriteAction::Remove { favorite_id } => {
                commands::favorite::remove(&config, &favorite_id).await?
            }
            FavoriteAction::Update { favorite_id, notes } => {
                commands::favorite::update(&config, &favorite_id, &notes).await?
            }
        },
    }

    Ok(())
}
