use anyhow::{Context, Result};
use bio_snake::commentary::{CommentaryService, GeminiCommentary, OfflineCommentary};
use bio_snake::modes::HumanMode;
use bio_snake::settings::Settings;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bio_snake")]
#[command(version, about = "Steer a growing organism with your mouse")]
struct Cli {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in simulation units
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in simulation units
    #[arg(long)]
    height: Option<f64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the commentary backend and use the built-in text
    #[arg(long)]
    offline: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    // CLI flags override the settings file
    if let Some(width) = cli.width {
        settings.game.viewport_width = width;
    }
    if let Some(height) = cli.height {
        settings.game.viewport_height = height;
    }
    if cli.seed.is_some() {
        settings.game.seed = cli.seed;
    }
    settings.validate()?;

    let service = commentary_service(&settings, cli.offline);
    let timeout = Duration::from_secs(settings.commentary.timeout_secs);

    let mut human_mode = HumanMode::new(settings.game, service, timeout);
    human_mode.run().await?;

    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bio_snake=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}

fn commentary_service(settings: &Settings, offline: bool) -> Arc<dyn CommentaryService> {
    if offline {
        info!("commentary disabled by --offline");
        return Arc::new(OfflineCommentary);
    }

    match GeminiCommentary::from_env(settings.commentary.clone()) {
        Ok(backend) => {
            info!(model = %settings.commentary.model, "using Gemini commentary");
            Arc::new(backend)
        }
        Err(err) => {
            warn!(
                error = %err,
                key_env = %settings.commentary.api_key_env,
                "commentary backend unavailable, using built-in text"
            );
            Arc::new(OfflineCommentary)
        }
    }
}
