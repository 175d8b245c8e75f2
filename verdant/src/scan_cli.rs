//! verdant-scan - run one plant scan from the command line
//!
//! Captures a photo with the simulated camera (or takes one from `--image` or
//! the configured photo library), runs it through the analysis service and
//! prints the result screen as text or JSON.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/verdant/verdant.<date>.log
//! - Config: $XDG_CONFIG_HOME/verdant/config.toml (~/.config/verdant/config.toml)

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use verdant_core::analysis::MockAnalysisService;
use verdant_core::media::{self, MediaError, MediaKind, MediaSource, PermissionStatus, SimulatedMedia};
use verdant_core::results::{self, ResultAction};
use verdant_core::scan::{self, ScanError, ScanRoute, ScanSession, SessionSettings};
use verdant_core::{AnalysisResult, Config, Garden, ImageRef, ScanMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "verdant-scan")]
#[command(about = "Identify or diagnose a plant from a photo")]
#[command(version)]
struct Args {
    /// Scan mode (identify, diagnose, add-plant)
    #[arg(short, long, default_value = "identify")]
    mode: ScanMode,

    /// Analyze this photo (path or URI) instead of using the camera
    #[arg(short, long, conflicts_with = "library")]
    image: Option<String>,

    /// Pick the first photo from the configured library directory
    #[arg(long)]
    library: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Override the simulated analysis latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Add an identified plant to the sample garden and report the new count
    #[arg(long)]
    add_to_garden: bool,
}

/// JSON report for one scan.
#[derive(Serialize)]
struct ScanReport<'a> {
    session_id: String,
    mode: ScanMode,
    image: &'a ImageRef,
    title: &'static str,
    confidence: &'a str,
    actions: Vec<&'static str>,
    result: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    garden_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        verdant_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(mode = %args.mode, "verdant-scan starting");

    let media = SimulatedMedia::from_config(&config.media);
    let mut session = ScanSession::with_settings(
        ScanRoute::locked(args.mode),
        SessionSettings::from(&config),
    );

    let image = acquire(&args, &config, &media, &mut session).await?;

    let latency = args
        .latency_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.analysis.latency());
    let service = MockAnalysisService::new(latency);

    if args.format == Format::Text {
        eprintln!("{}", args.mode.analysis_text());
    }

    let result = session
        .analyze(&service, config.analysis.watchdog())
        .await
        .context("analysis failed")?;

    let view = results::present(&image, session.mode(), &result);

    let garden_size = if args.add_to_garden {
        let mut garden = Garden::seeded();
        match garden.add_from_result(&image, &result) {
            Some(id) => {
                tracing::info!(plant = %id, "Added scanned plant to garden");
                Some(garden.collection.len())
            }
            None => bail!("only identifications can be added to the garden"),
        }
    } else {
        None
    };

    match args.format {
        Format::Text => {
            print!("{}", view);
            if let Some(size) = garden_size {
                println!("\nAdded to My Garden ({} plants)", size);
            }
        }
        Format::Json => {
            let report = ScanReport {
                session_id: session.id().to_string(),
                mode: view.mode,
                image: &view.image,
                title: view.title,
                confidence: &view.confidence,
                actions: view.actions.iter().map(ResultAction::label).collect(),
                result: &result,
                garden_size,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to encode report")?
            );
        }
    }

    tracing::info!(session = %session.id(), "verdant-scan complete");
    Ok(())
}

/// Put an image into the session from the source the flags ask for.
async fn acquire(
    args: &Args,
    config: &Config,
    media: &SimulatedMedia,
    session: &mut ScanSession,
) -> Result<ImageRef> {
    if let Some(raw) = &args.image {
        let image = image_arg(raw);
        session
            .accept_image(image.clone())
            .context("failed to load image")?;
        return Ok(image);
    }

    if args.library {
        let dir = config.media.library_dir();
        let images = media::library_images(&dir)
            .with_context(|| format!("failed to list photos in {}", dir.display()))?;
        media.set_library(images);
        return match session.pick_from_library(media).await {
            Ok(Some(image)) => Ok(image),
            Ok(None) => bail!("no photo selected from {}", dir.display()),
            Err(e) => Err(e).context("photo library unavailable"),
        };
    }

    match session.capture(media).await {
        Ok(image) => Ok(image),
        Err(ScanError::Media(MediaError::PermissionDenied(MediaKind::Camera))) => {
            // One retry, like the denial screen's action button
            if media.request_permission(MediaKind::Camera).await != PermissionStatus::Granted {
                bail!("{}: {}", scan::PERMISSION_TITLE, scan::PERMISSION_TEXT);
            }
            session
                .capture(media)
                .await
                .context("failed to capture photo")
        }
        Err(e) => Err(e).context("failed to capture photo"),
    }
}

/// Existing files become `file://` references; anything else is taken as a URI.
fn image_arg(raw: &str) -> ImageRef {
    let path = Path::new(raw);
    if !raw.contains("://") && path.exists() {
        ImageRef::from_path(path)
    } else {
        ImageRef::new(raw)
    }
}
