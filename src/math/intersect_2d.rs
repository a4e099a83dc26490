use super::{Point2, TOLERANCE};

/// 2D cross product of `(b - a) x (c - a)`.
///
/// Positive when `c` lies to the left of the directed line `a -> b`.
#[inline]
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if `p` lies within the axis-aligned box spanned by `a` and `b`.
///
/// Only meaningful when `p` is already known to be collinear with `a` and `b`.
fn within_span(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Bounded segment-segment intersection test in 2D.
///
/// Returns `true` if the closed segments `a0-a1` and `b0-b1` share at least
/// one point, including touching endpoints and collinear overlap.
#[must_use]
pub fn segments_intersect_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = orient_2d(b0, b1, a0);
    let d2 = orient_2d(b0, b1, a1);
    let d3 = orient_2d(a0, a1, b0);
    let d4 = orient_2d(a0, a1, b1);

    if ((d1 > TOLERANCE && d2 < -TOLERANCE) || (d1 < -TOLERANCE && d2 > TOLERANCE))
        && ((d3 > TOLERANCE && d4 < -TOLERANCE) || (d3 < -TOLERANCE && d4 > TOLERANCE))
    {
        return true;
    }

    (d1.abs() <= TOLERANCE && within_span(b0, b1, a0))
        || (d2.abs() <= TOLERANCE && within_span(b0, b1, a1))
        || (d3.abs() <= TOLERANCE && within_span(a0, a1, b0))
        || (d4.abs() <= TOLERANCE && within_span(a0, a1, b1))
}
