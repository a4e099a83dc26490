//! CPU ray caster for equirectangular previews.
//!
//! Casts one primary ray per pixel against the ground plane and every
//! building mesh, shades hits with a Lambert sun term plus sky ambient, and
//! writes the frame as JPEG. Rows are traced in parallel.

use std::f64::consts::{PI, TAU};
use std::fs::File;
use std::io::BufWriter;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use crate::error::RenderError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::query::Aabb;
use crate::scene::{
    GroundPlane, Material, MaterialId, PanoramicCamera, SceneBackend, SkySettings, SunLamp,
};
use crate::tessellation::TriangleMesh;

use super::{euler_xyz, RenderJob, RenderSettings};

const ZENITH: [f64; 3] = [0.18, 0.36, 0.75];
const HORIZON: [f64; 3] = [0.70, 0.80, 0.92];
const HAZE: [f64; 3] = [0.80, 0.80, 0.78];
const BELOW_HORIZON: [f64; 3] = [0.05, 0.05, 0.05];
const SUN_DISC: [f64; 3] = [20.0, 18.0, 15.0];

/// Smallest sun disc drawn in the sky, half-angle in radians.
const MIN_SUN_HALF_ANGLE: f64 = 0.01;

/// A ray with a unit direction.
#[derive(Debug, Clone, Copy)]
struct Ray {
    origin: Point3,
    dir: Vector3,
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    a: Point3,
    e1: Vector3,
    e2: Vector3,
    normal: Vector3,
}

impl Triangle {
    fn new([a, b, c]: [Point3; 3]) -> Option<Self> {
        let e1 = b - a;
        let e2 = c - a;
        let normal = e1.cross(&e2).try_normalize(TOLERANCE)?;
        Some(Self { a, e1, e2, normal })
    }

    /// Möller–Trumbore; returns the ray parameter of the hit.
    #[allow(clippy::many_single_char_names)]
    fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<f64> {
        let p = ray.dir.cross(&self.e2);
        let det = self.e1.dot(&p);
        if det.abs() < TOLERANCE {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&self.e1);
        let v = ray.dir.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = self.e2.dot(&q) * inv_det;
        (t >= t_min && t <= t_max).then_some(t)
    }
}

#[derive(Debug, Clone)]
struct MeshInstance {
    triangles: Vec<Triangle>,
    bounds: Aabb,
    material: MaterialId,
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    distance: f64,
    normal: Vector3,
    material: MaterialId,
}

/// Software [`SceneBackend`] producing flat-shaded panorama previews.
///
/// Sample count, denoising and bounce limits are accepted but ignored: every
/// pixel gets exactly one primary ray and no secondary bounces.
#[derive(Debug, Default)]
pub struct RaycastBackend {
    materials: Vec<Material>,
    meshes: Vec<MeshInstance>,
    ground: Option<(GroundPlane, MaterialId)>,
    sky: Option<SkySettings>,
    suns: Vec<SunLamp>,
    camera: Option<PanoramicCamera>,
}

impl RaycastBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes added so far.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn material(&self, id: MaterialId) -> Result<&Material, RenderError> {
        self.materials
            .get(id.0)
            .ok_or_else(|| RenderError::Backend(format!("unknown material {}", id.0)))
    }

    fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit> {
        let mut closest = None;
        let mut limit = t_max;

        if let Some((ground, material)) = &self.ground {
            if let Some(t) = intersect_ground(ray, ground, t_min, limit) {
                limit = t;
                closest = Some(Hit {
                    distance: t,
                    normal: facing(Vector3::z(), ray),
                    material: *material,
                });
            }
        }

        for mesh in &self.meshes {
            if !ray_hits_box(ray, &mesh.bounds, t_min, limit) {
                continue;
            }
            for triangle in &mesh.triangles {
                if let Some(t) = triangle.intersect(ray, t_min, limit) {
                    limit = t;
                    closest = Some(Hit {
                        distance: t,
                        normal: facing(triangle.normal, ray),
                        material: mesh.material,
                    });
                }
            }
        }

        closest
    }

    fn trace(&self, ray: &Ray, camera: &PanoramicCamera) -> Vector3 {
        match self.intersect(ray, camera.clip_start, camera.clip_end) {
            Some(hit) => {
                // Distant surfaces fade into the horizon haze.
                let haze = self
                    .sky
                    .as_ref()
                    .map_or(0.0, |sky| (sky.turbidity / 10.0).clamp(0.0, 1.0));
                let fade = (hit.distance / camera.clip_end).clamp(0.0, 1.0) * haze;
                self.surface_color(&hit).lerp(&Vector3::from(HAZE), fade)
            }
            None => self.sky_color(&ray.dir),
        }
    }

    fn surface_color(&self, hit: &Hit) -> Vector3 {
        let Some(material) = self.materials.get(hit.material.0) else {
            return Vector3::zeros();
        };
        let [r, g, b, _] = material.base_color;
        let albedo = Vector3::new(f64::from(r), f64::from(g), f64::from(b));

        let direct: f64 = self
            .suns
            .iter()
            .map(|sun| sun.energy * hit.normal.dot(&sun_direction(sun)).max(0.0))
            .sum();
        // Rough surfaces scatter more of the sky back towards the camera.
        let ambient = self.sky.as_ref().map_or(0.3, |sky| sky.strength)
            * 0.5
            * (0.5 + 0.5 * f64::from(material.roughness));

        albedo * (direct + ambient)
    }

    fn sky_color(&self, dir: &Vector3) -> Vector3 {
        let Some(sky) = &self.sky else {
            return Vector3::from(HORIZON);
        };
        if dir.z < 0.0 {
            return Vector3::from(BELOW_HORIZON) * sky.strength;
        }

        let haze = ((sky.turbidity - 1.0) / 9.0).clamp(0.0, 1.0);
        let zenith = Vector3::from(ZENITH).lerp(&Vector3::from(HAZE), haze);
        let mut color = Vector3::from(HORIZON).lerp(&zenith, dir.z.sqrt());

        let half_angle = self
            .suns
            .first()
            .map_or(MIN_SUN_HALF_ANGLE, |sun| sun.angle * 0.5)
            .max(MIN_SUN_HALF_ANGLE);
        if dir.dot(&sky.sun_direction()) >= half_angle.cos() {
            color += Vector3::from(SUN_DISC);
        }

        color * sky.strength
    }
}

impl SceneBackend for RaycastBackend {
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
        self.material(material)?;
        let triangles: Vec<_> = (0..mesh.triangle_count())
            .filter_map(|i| Triangle::new(mesh.triangle(i)))
            .collect();
        let Some(bounds) = Aabb::from_points(&mesh.vertices) else {
            debug!(mesh = name, "ignoring empty mesh");
            return Ok(());
        };
        debug!(mesh = name, triangles = triangles.len(), "mesh added");
        self.meshes.push(MeshInstance {
            triangles,
            bounds,
            material,
        });
        Ok(())
    }

    fn add_ground_plane(
        &mut self,
        ground: &GroundPlane,
        material: MaterialId,
    ) -> Result<(), RenderError> {
        self.material(material)?;
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
        if !(camera.clip_start >= 0.0 && camera.clip_end > camera.clip_start) {
            return Err(RenderError::Backend(format!(
                "invalid clip range {}..{}",
                camera.clip_start, camera.clip_end
            )));
        }
        self.camera = Some(camera.clone());
        Ok(())
    }

    fn render_still(&mut self, job: &RenderJob, settings: &RenderSettings) -> Result<(), RenderError> {
        let camera = self
            .camera
            .as_ref()
            .ok_or_else(|| RenderError::Backend("no camera configured".into()))?;
        let (width, height) = (settings.width, settings.height);
        let rotation = job.camera.rotation_matrix();
        let origin = job.camera.position;
        let scene = &*self;

        let row_len = width as usize * 3;
        let mut pixels = vec![0u8; row_len * height as usize];
        pixels
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, line)| {
                for (col, px) in line.chunks_exact_mut(3).enumerate() {
                    let dir = rotation * pixel_direction(col, row, width, height);
                    let color = scene.trace(&Ray { origin, dir }, camera);
                    px.copy_from_slice(&to_srgb8(&color));
                }
            });

        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::Backend("pixel buffer does not match resolution".into()))?;
        let file = File::create(&job.output_path).map_err(|source| RenderError::Io {
            path: job.output_path.clone(),
            source,
        })?;
        JpegEncoder::new_with_quality(BufWriter::new(file), settings.jpeg_quality)
            .encode_image(&image)
            .map_err(|source| RenderError::Image {
                path: job.output_path.clone(),
                source,
            })?;

        debug!(
            index = job.index,
            meshes = self.meshes.len(),
            width,
            height,
            "frame traced"
        );
        Ok(())
    }
}

/// View direction in camera space for the centre of pixel (`col`, `row`).
///
/// Longitude runs left to right across the image, latitude top to bottom.
/// The image centre looks down the camera's `-Z` with `+Y` up.
#[allow(clippy::cast_precision_loss)]
fn pixel_direction(col: usize, row: usize, width: u32, height: u32) -> Vector3 {
    let u = (col as f64 + 0.5) / f64::from(width);
    let v = (row as f64 + 0.5) / f64::from(height);
    let lon = (u - 0.5) * TAU;
    let lat = (0.5 - v) * PI;
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(sin_lon * cos_lat, sin_lat, -cos_lon * cos_lat)
}

/// Unit vector towards the light of a sun lamp shining along its local `-Z`.
fn sun_direction(sun: &SunLamp) -> Vector3 {
    euler_xyz(&sun.rotation) * Vector3::z()
}

fn facing(normal: Vector3, ray: &Ray) -> Vector3 {
    if normal.dot(&ray.dir) > 0.0 {
        -normal
    } else {
        normal
    }
}

fn intersect_ground(ray: &Ray, ground: &GroundPlane, t_min: f64, t_max: f64) -> Option<f64> {
    if ray.dir.z.abs() < TOLERANCE {
        return None;
    }
    let t = (ground.location.z - ray.origin.z) / ray.dir.z;
    if t < t_min || t > t_max {
        return None;
    }
    let hit = ray.origin + ray.dir * t;
    let half = ground.size * 0.5;
    ((hit.x - ground.location.x).abs() <= half && (hit.y - ground.location.y).abs() <= half)
        .then_some(t)
}

/// Slab test against an axis-aligned box.
fn ray_hits_box(ray: &Ray, bounds: &Aabb, t_min: f64, t_max: f64) -> bool {
    let mut near = t_min;
    let mut far = t_max;
    for axis in 0..3 {
        let inv = 1.0 / ray.dir[axis];
        let mut t0 = (bounds.min[axis] - ray.origin[axis]) * inv;
        let mut t1 = (bounds.max[axis] - ray.origin[axis]) * inv;
        if inv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        near = near.max(t0);
        far = far.min(t1);
        if far < near {
            return false;
        }
    }
    true
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_srgb8(linear: &Vector3) -> [u8; 3] {
    let encode = |c: f64| {
        let c = c.clamp(0.0, 1.0);
        let s = if c <= 0.003_130_8 {
            12.92 * c
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        };
        (s * 255.0).round() as u8
    };
    [encode(linear.x), encode(linear.y), encode(linear.z)]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::massing::{BuildingGroup, FootprintExtruder};
    use crate::math::Point2;
    use crate::render::{CameraPose, CameraState};
    use crate::scene::recording::scratch_dir;
    use crate::scene::{build_scene, SceneSettings};
    use crate::topology::TopologyStore;
    use approx::assert_relative_eq;

    /// A 10 m cube centred ahead of a camera standing at (5, 5).
    fn scene_with_tower() -> RaycastBackend {
        let mut store = TopologyStore::new();
        let group = BuildingGroup::with_outline(
            "T",
            vec![
                Point2::new(0.0, 20.0),
                Point2::new(10.0, 20.0),
                Point2::new(10.0, 30.0),
                Point2::new(0.0, 30.0),
            ],
            Some(10.0),
        );
        let solid = FootprintExtruder::new().extrude(&group, &mut store).built().cloned().unwrap();

        let mut backend = RaycastBackend::new();
        build_scene(&mut backend, &[solid], &SceneSettings::default()).unwrap();
        backend
    }

    fn ray_from(pose: &CameraPose, dir: Vector3) -> Ray {
        Ray {
            origin: CameraState::from_pose(pose).position,
            dir: dir.normalize(),
        }
    }

    #[test]
    fn image_centre_looks_forward() {
        let state = CameraState::from_pose(&CameraPose::new(0.0, 0.0));
        let centre = state.rotation_matrix() * pixel_direction(1000, 500, 2000, 1000);
        assert!(centre.y > 0.99);

        // Pixel (2, 1) of a 4x2 frame sits right of and below the centre.
        let off = state.rotation_matrix() * pixel_direction(2, 1, 4, 2);
        assert!(off.y > 0.0);
        assert!(off.x > 0.0);
        assert!(off.z < 0.0);
    }

    #[test]
    fn top_row_looks_up() {
        let dir = pixel_direction(0, 0, 512, 256);
        assert!(dir.y > 0.99);
    }

    #[test]
    fn triangle_hit_distance() {
        let tri = Triangle::new([
            Point3::new(-1.0, 5.0, -1.0),
            Point3::new(1.0, 5.0, -1.0),
            Point3::new(0.0, 5.0, 2.0),
        ])
        .unwrap();
        let ray = Ray {
            origin: Point3::origin(),
            dir: Vector3::y(),
        };
        assert_relative_eq!(tri.intersect(&ray, 0.0, 100.0).unwrap(), 5.0);
        assert!(tri.intersect(&ray, 0.0, 4.0).is_none());
    }

    #[test]
    fn forward_ray_hits_building_wall() {
        let backend = scene_with_tower();
        let ray = ray_from(&CameraPose::new(5.0, 5.0), Vector3::y());
        let hit = backend.intersect(&ray, 0.1, 1000.0).unwrap();
        assert_relative_eq!(hit.distance, 15.0, epsilon = 1e-9);
        assert_relative_eq!(hit.normal, -Vector3::y(), epsilon = 1e-9);
        assert_eq!(hit.material, MaterialId(0));
    }

    #[test]
    fn downward_ray_hits_ground() {
        let backend = scene_with_tower();
        let ray = ray_from(&CameraPose::new(5.0, 5.0), -Vector3::z());
        let hit = backend.intersect(&ray, 0.1, 1000.0).unwrap();
        assert_relative_eq!(hit.distance, 2.5, epsilon = 1e-9);
        assert_eq!(hit.material, MaterialId(1));
    }

    #[test]
    fn clip_end_limits_hits() {
        let backend = scene_with_tower();
        let ray = ray_from(&CameraPose::new(5.0, 5.0), Vector3::y());
        assert!(backend.intersect(&ray, 0.1, 10.0).is_none());
    }

    #[test]
    fn upward_ray_sees_sky() {
        let backend = scene_with_tower();
        let ray = ray_from(&CameraPose::new(5.0, 5.0), Vector3::z());
        assert!(backend.intersect(&ray, 0.1, 1000.0).is_none());
        let sky = backend.sky_color(&ray.dir);
        assert!(sky.z > sky.x);
    }

    #[test]
    fn sun_disc_is_brighter_than_sky() {
        let backend = scene_with_tower();
        let sky = backend.sky.clone().unwrap();
        let towards_sun = backend.sky_color(&sky.sun_direction());
        let away = backend.sky_color(&Vector3::new(0.0, 0.0, 1.0));
        assert!(towards_sun.x > away.x);
    }

    #[test]
    fn empty_meshes_are_ignored() {
        let mut backend = scene_with_tower();
        assert_eq!(backend.mesh_count(), 1);
        backend
            .add_mesh("empty", &TriangleMesh::default(), MaterialId(0))
            .unwrap();
        assert_eq!(backend.mesh_count(), 1);
    }

    #[test]
    fn unknown_material_is_rejected() {
        let mut backend = RaycastBackend::new();
        let result = backend.add_mesh("x", &TriangleMesh::default(), MaterialId(3));
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }

    #[test]
    fn render_without_camera_fails() {
        let mut backend = RaycastBackend::new();
        let job = RenderJob {
            index: 1,
            camera: CameraState::from_pose(&CameraPose::new(0.0, 0.0)),
            output_path: scratch_dir("raycast_nocam").join("panorama_1.jpg"),
        };
        let result = backend.render_still(&job, &RenderSettings::default().with_width(8));
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }

    #[test]
    fn writes_jpeg_at_requested_size() {
        let dir = scratch_dir("raycast_jpeg");
        std::fs::create_dir_all(&dir).unwrap();
        let mut backend = scene_with_tower();
        let job = RenderJob {
            index: 1,
            camera: CameraState::from_pose(&CameraPose::new(5.0, 5.0)),
            output_path: dir.join("panorama_1.jpg"),
        };

        backend
            .render_still(&job, &RenderSettings::default().with_width(32))
            .unwrap();

        let image = image::open(&job.output_path).unwrap();
        assert_eq!((image.width(), image.height()), (32, 16));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn srgb_encoding_clamps() {
        assert_eq!(to_srgb8(&Vector3::new(-1.0, 0.0, 5.0)), [0, 0, 255]);
    }
}
