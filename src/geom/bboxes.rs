use crate::geom::point::Point;
use crate::vecutils::{max, min};

/// Returns the lower-left and upper-right corners of the box holding `pts`.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(pts: &[Point]) -> Option<(Point, Point)> {
    let x: Vec<f64> = pts.iter().map(|v| v.x).collect();
    let y: Vec<f64> = pts.iter().map(|v| v.y).collect();
    let pmin = Point::new(min(&x)?, min(&y)?);
    let pmax = Point::new(max(&x)?, max(&y)?);
    Some((pmin, pmax))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let pts = vec![Point::new(1., 5.), Point::new(-2., 3.), Point::new(4., -1.)];
        let (pmin, pmax) = bounding_box(&pts).unwrap();
        assert!(pmin.is_close(&Point::new(-2., -1.)));
        assert!(pmax.is_close(&Point::new(4., 5.)));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(bounding_box(&[]).is_none());
    }
}
