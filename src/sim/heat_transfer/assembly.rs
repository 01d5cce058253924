//! Assembly of the steady-state heat system.
//!
//! Every triangle adds `+2` on the diagonal and `-1` between each pair of
//! distinct vertices, a graph-Laplacian stencil rather than a true FEM
//! stiffness matrix. A point source is placed at index `N / 2` by position in
//! the point set, then fixed-temperature rows replace the rows of edge points.

use log::debug;

use crate::Point;
use crate::error::MeshResult;
use crate::geom::triangles::Triangulation;
use crate::sim::heat_transfer::boundary::Domain;
use crate::sim::heat_transfer::matrix::{CsrMatrix, SparseMatrixBuilder};
use crate::sim::heat_transfer::solver::HeatSolverConfig;

/// Square sparse system `A t = b` indexed like the point set.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub matrix: CsrMatrix,
    pub rhs: Vec<f64>,
}

impl LinearSystem {
    pub fn size(&self) -> usize {
        self.rhs.len()
    }
}

/// Index of the heat source for `n` points.
pub fn source_index(n: usize) -> usize {
    n / 2
}

/// Builds the system for `triangulation` over `points`.
///
/// Boundary detection uses the domain spanned by `points`.
pub fn assemble_heat_system(
    triangulation: &Triangulation,
    points: &[Point],
    config: &HeatSolverConfig,
) -> MeshResult<LinearSystem> {
    triangulation.check_indices(points)?;
    let domain = Domain::from_points(points)?;
    assemble_with_domain(triangulation, points, &domain, config)
}

/// Same as [`assemble_heat_system`] with explicit domain extents.
pub fn assemble_with_domain(
    triangulation: &Triangulation,
    points: &[Point],
    domain: &Domain,
    config: &HeatSolverConfig,
) -> MeshResult<LinearSystem> {
    triangulation.check_indices(points)?;
    let n = points.len();
    let mut a = SparseMatrixBuilder::new(n);
    let mut b = vec![0.0; n];

    for t in triangulation.triangles() {
        let v = t.as_array();
        for (i, &vi) in v.iter().enumerate() {
            for (j, &vj) in v.iter().enumerate() {
                a.add(vi, vj, if i == j { 2.0 } else { -1.0 });
            }
        }
    }

    if n > 0 {
        b[source_index(n)] = config.source_strength;
    }

    let mut fixed = 0;
    for (i, p) in points.iter().enumerate() {
        if let Some(temperature) = config.edges.temperature_at(p, domain) {
            a.clear_row(i);
            a.set(i, i, 1.0);
            b[i] = temperature;
            fixed += 1;
        }
    }
    debug!(
        "Assembled {n}x{n} system from {} triangles, {fixed} fixed rows",
        triangulation.len()
    );

    Ok(LinearSystem {
        matrix: a.build(),
        rhs: b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::geom::mesh::triangulate;
    use crate::geom::triangles::TriangleIndex;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(1., 1.),
            Point::new(0., 1.),
            Point::new(0.5, 0.5),
        ]
    }

    #[test]
    fn test_stencil_accumulation() {
        let pts = unit_square();
        let tri = Triangulation::new(
            vec![TriangleIndex(0, 1, 4), TriangleIndex(1, 2, 4)],
            pts.len(),
        );
        let config = HeatSolverConfig {
            source_strength: 0.0,
            ..Default::default()
        };
        // Domain larger than the points: no fixed rows
        let domain = Domain::new(5., 5.);
        let mut shifted = pts.clone();
        for p in shifted.iter_mut() {
            p.shift(1., 1.);
        }
        let sys = assemble_with_domain(&tri, &shifted, &domain, &config).unwrap();
        let a = &sys.matrix;
        assert_eq!(a.get(4, 4), 4.0);
        assert_eq!(a.get(1, 1), 4.0);
        assert_eq!(a.get(0, 0), 2.0);
        assert_eq!(a.get(1, 4), -2.0);
        assert_eq!(a.get(0, 1), -1.0);
        assert_eq!(a.get(0, 2), 0.0);
        assert_eq!(a.row_nnz(3), 0);
    }

    #[test]
    fn test_source_overridden_by_boundary() {
        // Index 2 = N / 2 is a corner
        let pts = unit_square();
        let tri = triangulate(&pts).unwrap();
        let sys = assemble_heat_system(&tri, &pts, &HeatSolverConfig::default()).unwrap();
        assert_eq!(source_index(pts.len()), 2);
        assert_eq!(sys.rhs[2], 50.0);
        assert_eq!(sys.matrix.row(2).collect::<Vec<_>>(), vec![(2, 1.0)]);
    }

    #[test]
    fn test_source_on_interior_point() {
        let pts = vec![
            Point::new(0., 0.),
            Point::new(2., 0.),
            Point::new(1., 1.),
            Point::new(2., 2.),
            Point::new(0., 2.),
        ];
        let tri = triangulate(&pts).unwrap();
        let sys = assemble_heat_system(&tri, &pts, &HeatSolverConfig::default()).unwrap();
        assert_eq!(sys.rhs[2], 100.0);
        assert_eq!(sys.matrix.get(2, 2), 8.0);
        assert_eq!(sys.rhs[0], 50.0);
    }

    #[test]
    fn test_out_of_range_triangle() {
        let pts = unit_square();
        let tri = Triangulation::new(vec![TriangleIndex(0, 1, 9)], 10);
        assert!(matches!(
            assemble_heat_system(&tri, &pts, &HeatSolverConfig::default()),
            Err(MeshError::IndexOutOfRange { index: 9, .. })
        ));
    }
}
