//! End-to-end run: read tables, extrude footprints, assemble the scene and
//! render one panorama per camera.

use std::path::PathBuf;

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::input::{read_cameras_from_path, read_footprints_from_path, FootprintRecord};
use crate::massing::{group_footprints, ExtrusionOutcome, FootprintExtruder, SkipReason};
use crate::render::{CameraPose, PanoramaBatchRenderer};
use crate::scene::{build_scene, SceneBackend};
use crate::topology::TopologyStore;

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// Names of the solids placed in the scene, in input order.
    pub built: Vec<String>,
    /// Building ids that were skipped, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
    /// Written panoramas, in camera order.
    pub rendered: Vec<PathBuf>,
}

/// Runs the pipeline on the files named in `config`.
///
/// Both tables are read before any geometry is built, so a malformed file
/// aborts the run without side effects.
///
/// # Errors
///
/// Returns an error if an input table cannot be read, the render settings
/// are invalid, or the backend fails.
pub fn run<B: SceneBackend + ?Sized>(
    config: &PipelineConfig,
    backend: &mut B,
) -> Result<PipelineSummary> {
    let records = read_footprints_from_path(&config.build_csv)?;
    let poses = read_cameras_from_path(&config.camera_csv)?;
    info!(rows = records.len(), cameras = poses.len(), "inputs loaded");
    run_with(records, &poses, config, backend)
}

/// Runs the pipeline on already-parsed rows.
///
/// # Errors
///
/// Returns an error if the render settings are invalid or the backend fails.
pub fn run_with<B: SceneBackend + ?Sized>(
    records: Vec<FootprintRecord>,
    poses: &[CameraPose],
    config: &PipelineConfig,
    backend: &mut B,
) -> Result<PipelineSummary> {
    config.render.validate()?;

    let groups = group_footprints(records);
    let mut store = TopologyStore::new();
    let outcomes = FootprintExtruder::new().extrude_all(&groups, &mut store);

    let mut summary = PipelineSummary::default();
    let mut solids = Vec::new();
    for outcome in outcomes {
        match outcome {
            ExtrusionOutcome::Built(solid) => {
                summary.built.push(solid.name.clone());
                solids.push(solid);
            }
            ExtrusionOutcome::Skipped { id, reason } => summary.skipped.push((id, reason)),
        }
    }
    info!(
        groups = groups.len(),
        built = summary.built.len(),
        skipped = summary.skipped.len(),
        "footprints extruded"
    );

    build_scene(backend, &solids, &config.scene)?;

    let renderer = PanoramaBatchRenderer::new(&config.output_dir, config.render.clone());
    summary.rendered = renderer.render_all(poses, backend)?;
    info!(
        panoramas = summary.rendered.len(),
        output = %config.output_dir.display(),
        "render batch finished"
    );

    Ok(summary)
}
