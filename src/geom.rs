pub mod bboxes;
pub mod grid;
pub mod mesh;
pub mod point;
pub mod refine;
pub mod smooth;
pub mod triangles;

/// Geometric precision
const EPS: f64 = 1e-13;
