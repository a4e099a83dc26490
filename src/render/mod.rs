//! Panorama rendering: camera poses, render settings, the batch loop, and a
//! CPU preview backend.

mod batch;
mod camera;
pub mod raycast;
mod settings;

pub use batch::{PanoramaBatchRenderer, RenderJob};
pub use camera::{euler_xyz, CameraPose, CameraState, CAMERA_HEIGHT, HORIZON_ROTATION};
pub use raycast::RaycastBackend;
pub use settings::RenderSettings;
