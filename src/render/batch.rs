use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::RenderError;
use crate::scene::SceneBackend;

use super::{CameraPose, CameraState, RenderSettings};

/// One panorama to render: where the camera stands and where the image goes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// 1-based position in the camera list.
    pub index: usize,
    pub camera: CameraState,
    pub output_path: PathBuf,
}

/// Renders one panorama per camera pose, strictly in order.
#[derive(Debug, Clone)]
pub struct PanoramaBatchRenderer {
    output_dir: PathBuf,
    settings: RenderSettings,
}

impl PanoramaBatchRenderer {
    /// Creates a renderer writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            output_dir: output_dir.into(),
            settings,
        }
    }

    /// Builds the job for the pose at 0-based `position`.
    #[must_use]
    pub fn job(&self, position: usize, pose: &CameraPose) -> RenderJob {
        let index = position + 1;
        RenderJob {
            index,
            camera: CameraState::from_pose(pose),
            output_path: self.output_dir.join(format!("panorama_{index}.jpg")),
        }
    }

    /// Renders every pose and returns the written paths in order.
    ///
    /// The first backend failure aborts the batch; images already written
    /// stay on disk and later poses are not attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, the output directory
    /// cannot be created, or the backend fails.
    pub fn render_all<B: SceneBackend + ?Sized>(
        &self,
        poses: &[CameraPose],
        backend: &mut B,
    ) -> Result<Vec<PathBuf>, RenderError> {
        self.settings.validate()?;
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(poses.len());
        for (position, pose) in poses.iter().enumerate() {
            let job = self.job(position, pose);
            backend.render_still(&job, &self.settings)?;
            info!(
                index = job.index,
                x = pose.x,
                y = pose.y,
                path = %job.output_path.display(),
                "saved panorama"
            );
            written.push(job.output_path);
        }
        Ok(written)
    }
}
