use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically. For a normal along
    /// `+Z` they are `+X` and `+Y`, so ground-plane coordinates are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        let (u_dir, v_dir) = if (normal.z.abs() - 1.0).abs() < TOLERANCE {
            let u = Vector3::x();
            (u, normal.cross(&u))
        } else {
            // Keep U horizontal for walls so V runs up the extrusion.
            let u = Vector3::z().cross(&normal).normalize();
            (u, normal.cross(&u))
        };

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Projects a point onto the plane's UV coordinate system.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Point2 {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u_dir), d.dot(&self.v_dir))
    }

    /// Evaluates the plane at parameter `(u, v)`.
    #[must_use]
    pub fn evaluate(&self, uv: &Point2) -> Point3 {
        self.origin + self.u_dir * uv.x + self.v_dir * uv.y
    }

    /// Signed distance from `point` to the plane along its normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }
}
