//! Minimum-spacing relaxation of a point set.
//!
//! A single pass visits every unordered pair `(i, j)` with `i < j` once and
//! pushes the two points apart symmetrically when they are closer than
//! `min_distance`. Positions are updated as the pass goes, so a later pair can
//! push a point back into an earlier neighbour: the result is best-effort and
//! some pairs may still violate the spacing after the call.

use log::trace;

use crate::Point;
use crate::error::{MeshResult, ensure_positive};

/// Separation direction used for coincident points.
const COINCIDENT_DIRECTION: (f64, f64) = (1.0, 0.0);

/// Runs one relaxation pass over `points` in place.
///
/// Returns the number of pairs that were pushed apart.
pub fn smooth_points(points: &mut [Point], min_distance: f64) -> MeshResult<usize> {
    ensure_positive("min_distance", min_distance)?;
    Ok(relax_pass(points, min_distance))
}

/// Relaxation pass for an already validated `min_distance`.
pub(crate) fn relax_pass(points: &mut [Point], min_distance: f64) -> usize {
    let mut relaxed = 0;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let dx = points[i].x - points[j].x;
            let dy = points[i].y - points[j].y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= min_distance {
                continue;
            }

            let (ux, uy) = if distance > 0.0 {
                (dx / distance, dy / distance)
            } else {
                COINCIDENT_DIRECTION
            };
            let shift = (min_distance - distance) / 2.0;
            points[i].shift(ux * shift, uy * shift);
            points[j].shift(-ux * shift, -uy * shift);
            relaxed += 1;
        }
    }
    if relaxed > 0 {
        trace!("Relaxed {relaxed} point pairs closer than {min_distance}");
    }
    relaxed
}

/// Smallest pairwise distance, or `None` for fewer than two points.
pub fn min_pairwise_distance(points: &[Point]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance(b);
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn test_close_pair_is_pushed_to_min_distance() {
        let mut pts = vec![Point::new(0.0, 0.0), Point::new(0.1, 0.0)];
        let relaxed = smooth_points(&mut pts, 0.3).unwrap();
        assert_eq!(relaxed, 1);
        assert!((pts[0].distance(&pts[1]) - 0.3).abs() < 1e-12);
        // Symmetric displacement around the midpoint
        assert!((pts[0].x + 0.1).abs() < 1e-12);
        assert!((pts[1].x - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_well_spaced_points_are_untouched() {
        let original = vec![Point::new(0., 0.), Point::new(1., 0.), Point::new(0., 1.)];
        let mut pts = original.clone();
        assert_eq!(smooth_points(&mut pts, 0.5).unwrap(), 0);
        assert_eq!(pts, original);
    }

    #[test]
    fn test_coincident_points_use_fallback_direction() {
        let mut pts = vec![Point::new(2.0, 2.0), Point::new(2.0, 2.0)];
        smooth_points(&mut pts, 0.4).unwrap();
        assert!(pts[0].is_close(&Point::new(2.2, 2.0)));
        assert!(pts[1].is_close(&Point::new(1.8, 2.0)));
        assert!(pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_single_pass_is_best_effort() {
        // The middle point is pushed right by the first pair and into the third.
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.05, 0.0),
            Point::new(0.3, 0.0),
        ];
        assert_eq!(smooth_points(&mut pts, 0.3).unwrap(), 2);
        // (1, 2) was relaxed after (0, 1); (0, 1) now violates again
        assert!(pts[0].distance(&pts[1]) < 0.3);
        assert!((pts[1].distance(&pts[2]) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_is_kept() {
        let mut pts = vec![Point::with_temperature(0., 10., 100.), Point::new(0.01, 10.)];
        smooth_points(&mut pts, 0.3).unwrap();
        assert_eq!(pts[0].temperature, Some(100.));
    }

    #[test]
    fn test_rejects_non_positive_min_distance() {
        let mut pts = vec![Point::new(0., 0.), Point::new(0., 0.)];
        assert!(matches!(
            smooth_points(&mut pts, 0.0),
            Err(MeshError::InvalidConfiguration { .. })
        ));
        // Rejected before any mutation
        assert_eq!(pts[0], pts[1]);
    }

    #[test]
    fn test_min_pairwise_distance() {
        let pts = vec![Point::new(0., 0.), Point::new(3., 4.), Point::new(0., 1.)];
        assert_eq!(min_pairwise_distance(&pts), Some(1.0));
        assert_eq!(min_pairwise_distance(&pts[..1]), None);
    }
}
