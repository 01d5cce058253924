use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::{MeshError, MeshResult};
use crate::geom::bboxes::bounding_box;

/// Rectangular domain `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Domain {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Takes `width` and `height` as the largest x and y found in `points`.
    pub fn from_points(points: &[Point]) -> MeshResult<Self> {
        let (_, pmax) = bounding_box(points)
            .ok_or_else(|| MeshError::invalid("points", "empty point set"))?;
        if !(pmax.x > 0.0 && pmax.y > 0.0) {
            return Err(MeshError::invalid(
                "domain",
                format!("zero-size domain {} x {}", pmax.x, pmax.y),
            ));
        }
        Ok(Self::new(pmax.x, pmax.y))
    }
}

/// Fixed-temperature rule applied on the domain edges.
///
/// The vertical edges (`x == 0`, `x == width`) take precedence over the
/// horizontal ones, so corners get `x_edge_temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirichletEdges {
    /// Temperature on `x == 0` and `x == width`.
    pub x_edge_temperature: f64,
    /// Temperature on `y == 0` and `y == height`.
    pub y_edge_temperature: f64,
}

impl DirichletEdges {
    /// Fixed temperature at `p`, if it lies exactly on an edge.
    pub fn temperature_at(&self, p: &Point, domain: &Domain) -> Option<f64> {
        if p.x == 0.0 || p.x == domain.width {
            Some(self.x_edge_temperature)
        } else if p.y == 0.0 || p.y == domain.height {
            Some(self.y_edge_temperature)
        } else {
            None
        }
    }
}

impl Default for DirichletEdges {
    fn default() -> Self {
        Self {
            x_edge_temperature: 50.0,
            y_edge_temperature: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_takes_x_rule() {
        let edges = DirichletEdges::default();
        let domain = Domain::new(10., 10.);
        assert_eq!(edges.temperature_at(&Point::new(0., 0.), &domain), Some(50.));
        assert_eq!(edges.temperature_at(&Point::new(10., 10.), &domain), Some(50.));
        assert_eq!(edges.temperature_at(&Point::new(5., 0.), &domain), Some(20.));
        assert_eq!(edges.temperature_at(&Point::new(5., 10.), &domain), Some(20.));
        assert_eq!(edges.temperature_at(&Point::new(5., 5.), &domain), None);
        // Exact comparison only
        assert_eq!(edges.temperature_at(&Point::new(1e-12, 5.), &domain), None);
    }

    #[test]
    fn test_domain_from_points() {
        let pts = vec![Point::new(0., 0.), Point::new(10., 2.), Point::new(3., 8.)];
        assert_eq!(Domain::from_points(&pts).unwrap(), Domain::new(10., 8.));
    }

    #[test]
    fn test_zero_size_domain() {
        let pts = vec![Point::new(0., 0.), Point::new(0., 5.)];
        assert!(matches!(
            Domain::from_points(&pts),
            Err(MeshError::InvalidConfiguration { .. })
        ));
        assert!(Domain::from_points(&[]).is_err());
    }
}
