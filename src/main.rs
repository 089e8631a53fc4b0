mod app;
mod canvas;
mod coordinate;
mod overlay;
mod ui;

use anyhow::Context as _;
use app::MarkersApp;
use clap::Parser;
use scene_markers::{logging, AppState, Config};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scene-markers", version, about = "Screen-space markers for streamed scene nodes")]
struct Cli {
    /// Application state snapshot (JSON with propertyTree and fetchData)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_tracing(&config.log_level);

    let state = match &cli.snapshot {
        Some(path) => AppState::load(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        None => AppState::default(),
    };
    tracing::info!(
        roots = state.property_tree.subowners.len(),
        story_uri = %config.story_uri,
        "starting scene markers"
    );

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1280.0, 800.0)),
        min_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    let snapshot_path = cli.snapshot.clone();
    eframe::run_native(
        "Scene Markers",
        native_options,
        Box::new(move |cc| Box::new(MarkersApp::new(cc, config, state, snapshot_path))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
