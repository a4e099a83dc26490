//! Scene assembly on top of a rendering backend.
//!
//! The pipeline never talks to a renderer directly. It goes through
//! [`SceneBackend`], which covers mesh and material creation, ground, sky,
//! sun, camera, and still rendering.

#[cfg(test)]
pub(crate) mod recording;
mod settings;

pub use settings::{GroundPlane, Material, PanoramicCamera, SceneSettings, SkySettings, SunLamp};

use tracing::info;

use crate::error::RenderError;
use crate::massing::BuiltSolid;
use crate::render::{RenderJob, RenderSettings};
use crate::tessellation::TriangleMesh;

/// Handle to a material registered with a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Capabilities a renderer must offer to host a massing scene.
///
/// Renders are synchronous: `render_still` returns once the image is on
/// disk. Every job carries its own camera state, so a backend keeps no
/// camera pose between calls.
pub trait SceneBackend {
    /// Registers a material and returns its handle.
    fn add_material(&mut self, material: &Material) -> Result<MaterialId, RenderError>;

    /// Adds a named triangle mesh shaded with `material`.
    fn add_mesh(
        &mut self,
        name: &str,
        mesh: &TriangleMesh,
        material: MaterialId,
    ) -> Result<(), RenderError>;

    /// Adds the ground plane.
    fn add_ground_plane(
        &mut self,
        ground: &GroundPlane,
        material: MaterialId,
    ) -> Result<(), RenderError>;

    /// Configures the environment sky.
    fn set_sky(&mut self, sky: &SkySettings) -> Result<(), RenderError>;

    /// Adds a sun lamp.
    fn add_sun(&mut self, sun: &SunLamp) -> Result<(), RenderError>;

    /// Configures the panoramic camera used by every job.
    fn set_camera(&mut self, camera: &PanoramicCamera) -> Result<(), RenderError>;

    /// Renders one still image for `job` and writes it to `job.output_path`.
    fn render_still(&mut self, job: &RenderJob, settings: &RenderSettings) -> Result<(), RenderError>;
}

/// Populates `backend` with the buildings and the scene dressing.
///
/// Buildings share one material; the ground gets its own.
///
/// # Errors
///
/// Returns the first error reported by the backend.
pub fn build_scene<B: SceneBackend + ?Sized>(
    backend: &mut B,
    solids: &[BuiltSolid],
    settings: &SceneSettings,
) -> Result<(), RenderError> {
    let building_material = backend.add_material(&settings.building_material)?;
    for solid in solids {
        backend.add_mesh(&solid.name, &solid.mesh, building_material)?;
    }

    let ground_material = backend.add_material(&settings.ground_material)?;
    backend.add_ground_plane(&settings.ground, ground_material)?;
    backend.set_sky(&settings.sky)?;
    backend.add_sun(&settings.sun)?;
    backend.set_camera(&settings.camera)?;

    info!(buildings = solids.len(), "scene assembled");
    Ok(())
}
