use super::intersect_2d::segments_intersect_2d;
use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A trailing vertex
/// that repeats the first one contributes nothing, so open and closed rings
/// give the same result.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if two ground-plane points coincide within [`TOLERANCE`].
#[must_use]
pub fn same_point(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() < TOLERANCE
}

/// Returns `true` if the ring's last vertex repeats its first.
#[must_use]
pub fn is_ring_closed(points: &[Point2]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => same_point(first, last),
        _ => false,
    }
}

/// Closes a ring by appending a copy of its first vertex.
///
/// Does nothing if the ring is empty or already closed. Returns `true` if a
/// vertex was appended.
pub fn close_ring(points: &mut Vec<Point2>) -> bool {
    let Some(&first) = points.first() else {
        return false;
    };
    if is_ring_closed(points) {
        return false;
    }
    points.push(first);
    true
}

/// Returns the distinct boundary vertices of a (possibly closed) ring.
///
/// Drops the closing duplicate and any consecutive repeats, so the result can
/// be walked cyclically without zero-length edges.
#[must_use]
pub fn ring_boundary(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &pt in points {
        if out.last().is_some_and(|last| same_point(last, &pt)) {
            continue;
        }
        out.push(pt);
    }
    while out.len() > 1 && is_ring_closed(&out) {
        out.pop();
    }
    out
}

/// Returns `true` if the cyclic boundary has no self-intersections.
///
/// Adjacent edges may only share their common vertex; every other pair of
/// edges must be disjoint. The input must not repeat its first vertex.
#[must_use]
pub fn is_simple_ring(boundary: &[Point2]) -> bool {
    let n = boundary.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = &boundary[i];
        let a1 = &boundary[(i + 1) % n];
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let b0 = &boundary[j];
            let b1 = &boundary[(j + 1) % n];
            if adjacent {
                // Adjacent edges fold back onto each other only if collinear and overlapping.
                let (shared, a_far, b_far) = if j == i + 1 { (a1, a0, b1) } else { (a0, a1, b0) };
                let u = a_far - shared;
                let v = b_far - shared;
                if (u.x * v.y - u.y * v.x).abs() <= TOLERANCE && u.dot(&v) > 0.0 {
                    return false;
                }
                continue;
            }
            if segments_intersect_2d(a0, a1, b0, b1) {
                return false;
            }
        }
    }
    true
}
