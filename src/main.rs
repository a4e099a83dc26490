use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use massing::config::PipelineConfig;
use massing::pipeline;
use massing::render::RaycastBackend;

/// Extrude building footprints and render 360° panoramas.
#[derive(Parser, Debug, Clone)]
#[command(name = "massing", version)]
struct Args {
    /// Footprint CSV with `ID`, `X(m)`, `Y(m)` and `h` columns.
    #[arg(long)]
    build: Option<PathBuf>,

    /// Camera CSV with `x` and `y` columns.
    #[arg(long)]
    cameras: Option<PathBuf>,

    /// Directory receiving `panorama_<N>.jpg`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding paths, render and scene settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width; height follows at 2:1 unless given.
    #[arg(long)]
    width: Option<u32>,

    /// Output height; must be half the width.
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel handed to the renderer.
    #[arg(long)]
    samples: Option<u32>,
}

impl Args {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(build) = self.build {
            config.build_csv = build;
        }
        if let Some(cameras) = self.cameras {
            config.camera_csv = cameras;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(width) = self.width {
            config.render = config.render.with_width(width);
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(samples) = self.samples {
            config.render.samples = samples;
        }
        Ok(config)
    }
}

/// Directives used when `RUST_LOG` is unset: WARN for everything, INFO for massing.
const DEFAULT_LOG_DIRECTIVES: &str = "warn,massing=info";

/// Builds the log filter from `RUST_LOG`, falling back to the defaults when it
/// is unset or does not parse.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = Args::parse().into_config()?;
    let mut backend = RaycastBackend::new();

    let summary = pipeline::run(&config, &mut backend).with_context(|| {
        format!(
            "rendering {} with cameras from {}",
            config.build_csv.display(),
            config.camera_csv.display()
        )
    })?;

    for (id, reason) in &summary.skipped {
        info!(%id, %reason, "building skipped");
    }
    info!(
        buildings = summary.built.len(),
        panoramas = summary.rendered.len(),
        output = %config.output_dir.display(),
        "all done"
    );
    Ok(())
}
