//! Adaptive 2-D point-cloud meshing and steady-state heat diffusion.
//!
//! ```text
//! GridConfig ──► PointSet ──► MeshRefiner (snapshots) ──► triangulate()
//!                                                             │
//!                                                 HeatSolver::solve()
//! ```

pub mod config;
pub mod error;
pub mod geom;
pub mod sim;
pub mod vecutils;

// Prelude
pub use config::SimulationConfig;
pub use error::{MeshError, MeshResult};
pub use geom::grid::{GridConfig, generate_boundary_points, generate_grid_points, generate_triangular_mesh};
pub use geom::mesh::triangulate;
pub use geom::point::{Point, PointSet};
pub use geom::refine::{MeshRefiner, RefinementConfig, RegionShape, refine_mesh};
pub use geom::smooth::smooth_points;
pub use geom::triangles::{TriangleIndex, Triangulation};
pub use sim::heat_transfer::{HeatSolution, HeatSolver, HeatSolverConfig, solve_heat_equation};
pub use sim::pipeline::{SimulationOutput, run_simulation, run_simulation_with_observer};
