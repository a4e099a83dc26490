//! In-memory backend that records every call, for tests.

use std::fs;
use std::path::PathBuf;

use crate::error::RenderError;
use crate::render::{RenderJob, RenderSettings};
use crate::tessellation::TriangleMesh;

use super::{GroundPlane, Material, MaterialId, PanoramicCamera, SceneBackend, SkySettings, SunLamp};

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub materials: Vec<Material>,
    pub meshes: Vec<(String, TriangleMesh, MaterialId)>,
    pub ground: Option<(GroundPlane, MaterialId)>,
    pub sky: Option<SkySettings>,
    pub suns: Vec<SunLamp>,
    pub camera: Option<PanoramicCamera>,
    pub jobs: Vec<RenderJob>,
    /// 1-based job index that fails instead of rendering.
    pub fail_on: Option<usize>,
}

impl RecordingBackend {
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub fn mesh_names(&self) -> Vec<&str> {
        self.meshes.iter().map(|(name, _, _)| name.as_str()).collect()
    }
}

impl SceneBackend for RecordingBackend {
    fn add_material(&mut self, material: &Material) -> Result<MaterialId, RenderError> {
        self.materials.push(material.clone());
        Ok(MaterialId(self.materials.len() - 1))
    }

    fn add_mesh(
        &mut self,
        name: &str,
        mesh: &TriangleMesh,
        material: MaterialId,
    ) -> Result<(), RenderError> {
        self.meshes.push((name.to_owned(), mesh.clone(), material));
        Ok(())
    }

    fn add_ground_plane(
        &mut self,
        ground: &GroundPlane,
        material: MaterialId,
    ) -> Result<(), RenderError> {
        self.ground = Some((ground.clone(), material));
        Ok(())
    }

    fn set_sky(&mut self, sky: &SkySettings) -> Result<(), RenderError> {
        self.sky = Some(sky.clone());
        Ok(())
    }

    fn add_sun(&mut self, sun: &SunLamp) -> Result<(), RenderError> {
        self.suns.push(sun.clone());
        Ok(())
    }

    fn set_camera(&mut self, camera: &PanoramicCamera) -> Result<(), RenderError> {
        self.camera = Some(camera.clone());
        Ok(())
    }

    fn render_still(&mut self, job: &RenderJob, _settings: &RenderSettings) -> Result<(), RenderError> {
        if self.fail_on == Some(job.index) {
            return Err(RenderError::Backend(format!("job {} rejected", job.index)));
        }
        fs::write(&job.output_path, b"jpeg").map_err(|source| RenderError::Io {
            path: job.output_path.clone(),
            source,
        })?;
        self.jobs.push(job.clone());
        Ok(())
    }
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("massing_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}
