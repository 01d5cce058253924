//! Steady-state heat diffusion on a triangulated point set.
//!
//! # Architecture
//!
//! ```text
//! (Triangulation, points) ──► assemble_heat_system() ──► LinearSystem
//!                                                            │
//!                                                     solve_sparse()
//!                                                            │
//!                              node temperatures ──► triangle_temperatures()
//! ```
//!
//! The assembler holds no state between calls: the matrix and right-hand
//! side live only for one solve.

pub mod assembly;
pub mod boundary;
pub mod matrix;
pub mod solver;
pub mod solver_sparse;

pub use assembly::{LinearSystem, assemble_heat_system, assemble_with_domain, source_index};
pub use boundary::{DirichletEdges, Domain};
pub use matrix::{CsrMatrix, SparseMatrixBuilder};
pub use solver::{HeatSolution, HeatSolver, HeatSolverConfig, solve_heat_equation, triangle_temperatures};
pub use solver_sparse::{SolverMethod, SparseSolverConfig, solve_sparse};
