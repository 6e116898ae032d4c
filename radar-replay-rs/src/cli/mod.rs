//! Command-line interface for the replay viewer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ColorBy;
use crate::core::loaders::{self, Frame, ReplayStats};
use crate::visualization::{self, PresentOptions};
use crate::ViewerConfig;

#[derive(Parser)]
#[command(name = "radar-replay")]
#[command(about = "Interactive 3D viewer for recorded radar point clouds", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a replay as a slider-controlled 3D scatter plot
    View {
        /// Replay JSON file
        replay: PathBuf,
        /// Point attribute used for marker color
        #[arg(long, value_enum)]
        color_by: Option<ColorBy>,
        /// Radar mount height in meters
        #[arg(long)]
        radar_height: Option<f64>,
        /// Keep the generated HTML page at this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the page without launching a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print frame and point statistics for a replay
    Info {
        /// Replay JSON file
        replay: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 40 {
            format!("{}...", value.chars().take(37).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<18}: {:<40} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match ViewerConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                ViewerConfig::default()
            }
        },
        None => ViewerConfig::default(),
    };

    let result = match cli.command {
        Commands::View { replay, color_by, radar_height, output, no_open } => {
            let options = PresentOptions {
                output,
                open_browser: !no_open,
            };
            cmd_view(&replay, color_by, radar_height, &options, config)
        }
        Commands::Info { replay } => cmd_info(&replay),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(
    mut config: ViewerConfig,
    color_by: Option<ColorBy>,
    radar_height: Option<f64>,
) -> Result<ViewerConfig> {
    if let Some(mode) = color_by {
        config.display.color_by = mode;
    }
    if let Some(height) = radar_height {
        config.radar.height_m = height;
    }
    config.validate().context("invalid viewer settings")?;
    Ok(config)
}

fn load_with_spinner(replay: &Path) -> Result<Vec<Frame>> {
    let spinner = create_spinner("Loading replay...");
    let frames = loaders::load_replay(replay);
    spinner.finish_and_clear();

    let frames = frames.with_context(|| format!("Failed to load replay {}", replay.display()))?;
    println!("Loaded {} frames", frames.len());
    Ok(frames)
}

fn cmd_view(
    replay: &Path,
    color_by: Option<ColorBy>,
    radar_height: Option<f64>,
    options: &PresentOptions,
    config: ViewerConfig,
) -> Result<()> {
    let start = Instant::now();
    let config = apply_overrides(config, color_by, radar_height)?;

    let frames = load_with_spinner(replay)?;
    if frames.is_empty() {
        warn!("{} contains no frames", replay.display());
    }

    let spinner = create_spinner("Building scene...");
    let scene = visualization::assemble_scene(&frames, &config);
    spinner.finish_and_clear();

    if options.open_browser {
        println!("Opening interactive 3D plot in browser...");
        println!("Use the slider at the bottom to change frames");
    }

    let page = visualization::present(&scene, &config.display, options)
        .context("Failed to present scene")?;

    print_summary(
        "Replay Viewer",
        &[
            ("Input file", replay.display().to_string()),
            ("Frames", frames.len().to_string()),
            ("Color by", format!("{:?}", config.display.color_by)),
            ("Radar height (m)", config.radar.height_m.to_string()),
            ("Page", page.display().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    Ok(())
}

fn cmd_info(replay: &Path) -> Result<()> {
    let start = Instant::now();
    let frames = load_with_spinner(replay)?;
    let stats = ReplayStats::from_frames(&frames);

    let span = match stats.frame_span {
        Some((first, last)) => format!("{} .. {}", first, last),
        None => "-".to_string(),
    };

    print_summary(
        "Replay Info",
        &[
            ("Input file", replay.display().to_string()),
            ("Frames", stats.frames.to_string()),
            ("Frame numbers", span),
            ("Total points", stats.total_points.to_string()),
            ("Max points/frame", stats.max_points.to_string()),
            ("Empty frames", stats.empty_frames.to_string()),
            ("Count mismatches", stats.count_mismatches.to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    Ok(())
}
