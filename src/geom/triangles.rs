use crate::Point;
use crate::error::{MeshError, MeshResult};
use crate::geom::point::check::orientation;
use serde::{Deserialize, Serialize};

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

impl TriangleIndex {
    pub fn as_array(&self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }
}

/// Read-only set of triangles over the indices of a point set.
///
/// Never mutated once built: a new point set needs a new triangulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangulation {
    triangles: Vec<TriangleIndex>,
    num_points: usize,
}

impl Triangulation {
    pub(crate) fn new(triangles: Vec<TriangleIndex>, num_points: usize) -> Self {
        Self {
            triangles,
            num_points,
        }
    }

    pub fn triangles(&self) -> &[TriangleIndex] {
        &self.triangles
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Size of the point set this triangulation was computed from.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Checks that every referenced index is valid for `points`.
    pub fn check_indices(&self, points: &[Point]) -> MeshResult<()> {
        for t in &self.triangles {
            for index in t.as_array() {
                if index >= points.len() {
                    return Err(MeshError::IndexOutOfRange {
                        index,
                        len: points.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Total area covered by the triangles.
    pub fn area(&self, points: &[Point]) -> MeshResult<f64> {
        self.check_indices(points)?;
        Ok(self
            .triangles
            .iter()
            .map(|t| triangle_area(&points[t.0], &points[t.1], &points[t.2]))
            .sum())
    }
}

/// Unsigned triangle area.
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    orientation(a, b, c).abs() * 0.5
}
