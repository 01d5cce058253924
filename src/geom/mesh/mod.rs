//! Triangulation of 2-D point sets.

pub mod delaunay;

pub use delaunay::{triangulate, triangulate_array};
