use serde::Deserialize;

use crate::math::{Point3, Vector3};

/// A flat-coloured surface description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Material {
    pub name: String,
    /// Linear RGBA base colour.
    pub base_color: [f32; 4],
    pub roughness: f32,
}

/// A square ground plane centred on `location`, lying in the XY plane.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundPlane {
    pub name: String,
    /// Edge length in metres.
    pub size: f64,
    pub location: Point3,
}

/// Analytic daylight sky.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkySettings {
    /// Sun elevation above the horizon, radians.
    pub sun_elevation: f64,
    /// Sun rotation about the vertical axis, radians.
    pub sun_rotation: f64,
    /// Atmospheric haze; 1 is perfectly clear.
    pub turbidity: f64,
    /// Background strength multiplier.
    pub strength: f64,
}

impl SkySettings {
    /// Unit vector pointing from the ground towards the sky's sun.
    #[must_use]
    pub fn sun_direction(&self) -> Vector3 {
        let (sin_el, cos_el) = self.sun_elevation.sin_cos();
        let (sin_rot, cos_rot) = self.sun_rotation.sin_cos();
        Vector3::new(cos_el * sin_rot, cos_el * cos_rot, sin_el)
    }
}

/// A directional sun lamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SunLamp {
    pub name: String,
    pub energy: f64,
    /// Angular diameter of the sun disc, radians.
    pub angle: f64,
    pub location: Point3,
    /// XYZ Euler rotation in radians; the lamp shines along its local `-Z`.
    pub rotation: Vector3,
}

/// Equirectangular camera intrinsics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanoramicCamera {
    pub name: String,
    pub clip_start: f64,
    pub clip_end: f64,
}

/// Everything placed in the scene besides the buildings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub building_material: Material,
    pub ground_material: Material,
    pub ground: GroundPlane,
    pub sky: SkySettings,
    pub sun: SunLamp,
    pub camera: PanoramicCamera,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            building_material: Material {
                name: "LightBlue".into(),
                base_color: [0.0, 0.1, 0.2, 1.0],
                roughness: 0.8,
            },
            ground_material: Material {
                name: "DarkGray".into(),
                base_color: [0.1, 0.1, 0.1, 1.0],
                roughness: 1.0,
            },
            ground: GroundPlane {
                name: "GroundPlane".into(),
                size: 2000.0,
                location: Point3::origin(),
            },
            sky: SkySettings {
                sun_elevation: 1.2,
                sun_rotation: 2.0,
                turbidity: 2.0,
                strength: 0.8,
            },
            sun: SunLamp {
                name: "Sun".into(),
                energy: 3.0,
                angle: 0.03,
                location: Point3::new(0.0, 0.0, 100.0),
                rotation: Vector3::new(1.1, 0.3, 0.8),
            },
            camera: PanoramicCamera {
                name: "PanoCam".into(),
                clip_start: 0.1,
                clip_end: 1000.0,
            },
        }
    }
}
