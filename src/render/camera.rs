use std::f64::consts::FRAC_PI_2;

use serde::Deserialize;

use crate::math::{Matrix3, Point3, Vector3};

/// Eye height of every panorama, in metres above the ground.
pub const CAMERA_HEIGHT: f64 = 2.5;

/// Horizon-level orientation as XYZ Euler angles: pitched up a quarter turn
/// so the camera looks along `+Y` with `+Z` up.
pub const HORIZON_ROTATION: [f64; 3] = [FRAC_PI_2, 0.0, 0.0];

/// A camera position read from the camera table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CameraPose {
    pub x: f64,
    pub y: f64,
}

impl CameraPose {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Full pose handed to the backend with every render job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Camera location in world space.
    pub position: Point3,
    /// XYZ Euler rotation in radians.
    pub rotation: Vector3,
}

impl CameraState {
    /// Places the camera over `pose` at [`CAMERA_HEIGHT`], looking at the horizon.
    #[must_use]
    pub fn from_pose(pose: &CameraPose) -> Self {
        let [rx, ry, rz] = HORIZON_ROTATION;
        Self {
            position: Point3::new(pose.x, pose.y, CAMERA_HEIGHT),
            rotation: Vector3::new(rx, ry, rz),
        }
    }

    /// Camera-to-world rotation.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3 {
        euler_xyz(&self.rotation)
    }
}

/// Rotation matrix for XYZ Euler angles, applied X first, then Y, then Z.
#[must_use]
pub fn euler_xyz(angles: &Vector3) -> Matrix3 {
    let rx = nalgebra::Rotation3::from_axis_angle(&Vector3::x_axis(), angles.x);
    let ry = nalgebra::Rotation3::from_axis_angle(&Vector3::y_axis(), angles.y);
    let rz = nalgebra::Rotation3::from_axis_angle(&Vector3::z_axis(), angles.z);
    (rz * ry * rx).into_inner()
}
