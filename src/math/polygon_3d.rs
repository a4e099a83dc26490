use super::{Point3, Vector3, TOLERANCE};
use crate::error::{OperationError, Result};

/// Computes the unit normal of a polygon using Newell's method.
///
/// The normal follows the right-hand rule with respect to the vertex order.
///
/// # Errors
///
/// Returns [`OperationError::Failed`] if the polygon has no area (fewer than
/// three points, all collinear, or coincident).
pub fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let n = points.len();
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(
            OperationError::Failed("degenerate polygon: cannot compute normal".into()).into(),
        );
    }
    Ok(normal / len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn ccw_square_points_up() {
        let n = newell_normal(&[
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(n, Vector3::z());
    }

    #[test]
    fn cw_square_points_down() {
        let n = newell_normal(&[
            p(0.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 0.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(n, -Vector3::z());
    }

    #[test]
    fn collinear_points_fail() {
        assert!(newell_normal(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]).is_err());
    }
}
