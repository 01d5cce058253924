use super::*;

/// Twice the signed area of the triangle (a, b, c).
///
/// Positive for counter-clockwise order.
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Checks if (multiple) points are collinear
pub fn are_points_collinear(pts: &[Point]) -> bool {
    if pts.len() <= 2 {
        return true; // 1 or 2 points are always collinear
    }
    // Use the point farthest from the first one as the reference direction
    let origin = pts[0];
    let far = pts
        .iter()
        .skip(1)
        .max_by(|a, b| origin.distance_sq(a).total_cmp(&origin.distance_sq(b)))
        .copied()
        .unwrap_or(origin);
    let base = origin.distance(&far);
    if base < EPS {
        return true; // all points coincide
    }
    pts.iter()
        .all(|p| (orientation(&origin, &far, p) / base).abs() < EPS * base.max(1.0))
}
