use log::debug;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::{MeshError, MeshResult};
use crate::geom::triangles::Triangulation;
use crate::sim::heat_transfer::assembly::{LinearSystem, assemble_heat_system, assemble_with_domain};
use crate::sim::heat_transfer::boundary::{DirichletEdges, Domain};
use crate::sim::heat_transfer::solver_sparse::{SparseSolverConfig, solve_sparse};
use crate::vecutils::mean;

/// Heat source, boundary temperatures and linear solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatSolverConfig {
    /// Right-hand side value at the source index `N / 2`.
    pub source_strength: f64,
    pub edges: DirichletEdges,
    pub solver: SparseSolverConfig,
}

impl HeatSolverConfig {
    pub fn new() -> Self {
        Self {
            source_strength: 100.0,
            edges: DirichletEdges::default(),
            solver: SparseSolverConfig::default(),
        }
    }
}

impl Default for HeatSolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Solved temperatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSolution {
    /// One value per point.
    pub node_temperatures: Vec<f64>,
    /// One value per triangle: mean of its three vertices.
    pub triangle_temperatures: Vec<f64>,
}

/// Stateless steady-state heat solver: assemble, solve, average.
#[derive(Debug, Clone, Default)]
pub struct HeatSolver {
    config: HeatSolverConfig,
}

impl HeatSolver {
    pub fn new(config: HeatSolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeatSolverConfig {
        &self.config
    }

    /// Builds the linear system without solving it.
    pub fn assemble(
        &self,
        triangulation: &Triangulation,
        points: &[Point],
    ) -> MeshResult<LinearSystem> {
        assemble_heat_system(triangulation, points, &self.config)
    }

    /// Solves on the domain spanned by `points` (largest x and y).
    ///
    /// Use [`HeatSolver::solve_with_domain`] when the domain extents are known:
    /// points outside `[0, W] x [0, H]` would otherwise move the edges.
    pub fn solve(&self, triangulation: &Triangulation, points: &[Point]) -> MeshResult<HeatSolution> {
        let system = self.assemble(triangulation, points)?;
        self.solve_system(triangulation, &system)
    }

    /// Solves with the Dirichlet edges of an explicit `domain`.
    pub fn solve_with_domain(
        &self,
        triangulation: &Triangulation,
        points: &[Point],
        domain: &Domain,
    ) -> MeshResult<HeatSolution> {
        let system = assemble_with_domain(triangulation, points, domain, &self.config)?;
        self.solve_system(triangulation, &system)
    }

    fn solve_system(
        &self,
        triangulation: &Triangulation,
        system: &LinearSystem,
    ) -> MeshResult<HeatSolution> {
        let node_temperatures = solve_sparse(&system.matrix, &system.rhs, &self.config.solver)?;
        let triangle_temperatures = triangle_temperatures(triangulation, &node_temperatures)?;
        debug!(
            "Solved heat equation on {} points, {} triangles",
            node_temperatures.len(),
            triangle_temperatures.len()
        );
        Ok(HeatSolution {
            node_temperatures,
            triangle_temperatures,
        })
    }
}

/// Per-triangle mean of the node values.
///
/// Fails with [`MeshError::IndexOutOfRange`] when a triangle refers past the
/// end of `node_values`.
pub fn triangle_temperatures(
    triangulation: &Triangulation,
    node_values: &[f64],
) -> MeshResult<Vec<f64>> {
    triangulation
        .triangles()
        .iter()
        .map(|t| {
            let mut v = [0.0; 3];
            for (value, index) in v.iter_mut().zip(t.as_array()) {
                *value = *node_values.get(index).ok_or(MeshError::IndexOutOfRange {
                    index,
                    len: node_values.len(),
                })?;
            }
            Ok(mean(&v).unwrap_or(f64::NAN))
        })
        .collect()
}

/// Solves with the default configuration and returns the per-triangle field.
pub fn solve_heat_equation(triangulation: &Triangulation, points: &[Point]) -> MeshResult<Vec<f64>> {
    let solution = HeatSolver::default().solve(triangulation, points)?;
    Ok(solution.triangle_temperatures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::mesh::triangulate;
    use crate::geom::triangles::TriangleIndex;

    #[test]
    fn test_square_with_center() {
        // Corners fixed at 50, center gets the source (index 2 = N / 2)
        let pts = vec![
            Point::new(0., 0.),
            Point::new(2., 0.),
            Point::new(1., 1.),
            Point::new(2., 2.),
            Point::new(0., 2.),
        ];
        let tri = triangulate(&pts).unwrap();
        let sol = HeatSolver::default().solve(&tri, &pts).unwrap();
        // 8 t - 2 * 4 * 50 = 100
        assert!((sol.node_temperatures[2] - 62.5).abs() < 1e-12);
        assert_eq!(sol.node_temperatures[0], 50.0);
        assert_eq!(sol.triangle_temperatures.len(), 4);
        for t in &sol.triangle_temperatures {
            assert!((t - (50.0 + 50.0 + 62.5) / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_interior_point_is_singular() {
        let pts = vec![
            Point::new(0., 0.),
            Point::new(2., 0.),
            Point::new(2., 2.),
            Point::new(1., 1.5),
            Point::new(0., 2.),
        ];
        // Point 3 belongs to no triangle
        let tri = Triangulation::new(
            vec![TriangleIndex(0, 1, 2), TriangleIndex(0, 2, 4)],
            pts.len(),
        );
        let err = HeatSolver::default().solve(&tri, &pts).unwrap_err();
        assert!(matches!(err, MeshError::SingularSystem { row: Some(3), .. }));
    }

    #[test]
    fn test_triangle_temperatures_mean() {
        let tri = Triangulation::new(vec![TriangleIndex(0, 1, 2), TriangleIndex(1, 2, 3)], 4);
        let means = triangle_temperatures(&tri, &[0.0, 3.0, 6.0, 9.0]).unwrap();
        assert_eq!(means, vec![3.0, 6.0]);
        assert!(matches!(
            triangle_temperatures(&tri, &[0.0, 3.0, 6.0]),
            Err(MeshError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_solve_heat_equation_field_length() {
        let pts = vec![
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(1., 1.),
            Point::new(0., 1.),
        ];
        let tri = triangulate(&pts).unwrap();
        let field = solve_heat_equation(&tri, &pts).unwrap();
        assert_eq!(field.len(), tri.len());
        assert!(field.iter().all(|&t| t == 50.0));
    }

    #[test]
    fn test_explicit_domain_keeps_edges() {
        // Point 4 sticks out past x = 2, which would move the right edge
        let pts = vec![
            Point::new(0., 0.),
            Point::new(2., 0.),
            Point::new(2., 2.),
            Point::new(0., 2.),
            Point::new(2.5, 1.),
            Point::new(1., 1.),
        ];
        let tri = triangulate(&pts).unwrap();
        let domain = Domain::new(2., 2.);
        let sol = HeatSolver::default()
            .solve_with_domain(&tri, &pts, &domain)
            .unwrap();
        for i in 0..4 {
            assert_eq!(sol.node_temperatures[i], 50.0);
        }
        assert!(sol.node_temperatures[4].is_finite());

        let inferred = HeatSolver::default().solve(&tri, &pts).unwrap();
        assert_eq!(inferred.node_temperatures[4], 50.0);
        assert_eq!(inferred.node_temperatures[1], 20.0);
    }
}
