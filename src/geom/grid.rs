//! Initial point sets: regular grids, scattered clouds and boundary samples.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult, ensure_nonzero, ensure_positive};
use crate::geom::mesh::triangulate;
use crate::geom::point::{Point, PointSet};
use crate::geom::triangles::Triangulation;
use crate::vecutils::linspace;

/// One of the four edges of the rectangular domain `[0, W] x [0, H]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Bottom,
    Top,
    Left,
    Right,
}

impl Edge {
    /// Exact test of whether `p` lies on this edge of a `width x height` domain.
    pub fn contains(&self, p: &Point, width: f64, height: f64) -> bool {
        match self {
            Edge::Bottom => p.y == 0.0,
            Edge::Top => p.y == height,
            Edge::Left => p.x == 0.0,
            Edge::Right => p.x == width,
        }
    }
}

/// Parameters of the initial point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Domain width (x extent).
    pub width: f64,
    /// Domain height (y extent).
    pub height: f64,
    pub num_points_x: usize,
    pub num_points_y: usize,
    /// Points per side sampled along the edges of a scattered cloud.
    pub num_boundary_points_per_side: usize,
    /// Temperature stamped on points of the top edge (`y == height`).
    pub top_wall_temperature: Option<f64>,
    /// Regular Cartesian grid when true, uniform random cloud plus edge
    /// samples otherwise.
    pub regular: bool,
}

impl GridConfig {
    pub fn new() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            num_points_x: 10,
            num_points_y: 10,
            num_boundary_points_per_side: 10,
            top_wall_temperature: Some(100.0),
            regular: true,
        }
    }

    pub fn validate(&self) -> MeshResult<()> {
        ensure_positive("width", self.width)?;
        ensure_positive("height", self.height)?;
        ensure_nonzero("num_points_x", self.num_points_x)?;
        ensure_nonzero("num_points_y", self.num_points_y)?;
        if !self.regular && self.num_boundary_points_per_side < 2 {
            return Err(MeshError::invalid(
                "num_boundary_points_per_side",
                format!("must be at least 2, got {}", self.num_boundary_points_per_side),
            ));
        }
        Ok(())
    }

    /// Builds the initial point set described by this configuration.
    ///
    /// A scattered cloud is followed by the edge samples of
    /// [`generate_boundary_points`], so the heat problem always has fixed
    /// edges to lean on.
    pub fn generate_points<R: Rng>(&self, rng: &mut R) -> MeshResult<PointSet> {
        self.validate()?;
        let mut points = generate_grid_points(
            self.width,
            self.height,
            self.num_points_x,
            self.num_points_y,
            self.regular,
            rng,
        )?;
        if !self.regular {
            points.extend(generate_boundary_points(
                self.width,
                self.height,
                self.num_boundary_points_per_side,
            )?);
        }
        if let Some(t) = self.top_wall_temperature {
            stamp_edge_temperature(&mut points, Edge::Top, self.width, self.height, t);
        }
        Ok(points)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates `nx * ny` points inside `[0, width] x [0, height]`.
///
/// Regular mode yields the Cartesian product of evenly spaced values, x-major
/// (all y values of the first x column come first). Scattered mode draws
/// every point uniformly at random.
pub fn generate_grid_points<R: Rng>(
    width: f64,
    height: f64,
    nx: usize,
    ny: usize,
    regular: bool,
    rng: &mut R,
) -> MeshResult<PointSet> {
    ensure_positive("width", width)?;
    ensure_positive("height", height)?;
    ensure_nonzero("num_points_x", nx)?;
    ensure_nonzero("num_points_y", ny)?;

    if regular {
        Ok(regular_grid(width, height, nx, ny))
    } else {
        Ok((0..nx * ny)
            .map(|_| Point::new(rng.gen_range(0.0..=width), rng.gen_range(0.0..=height)))
            .collect())
    }
}

/// Cartesian product of evenly spaced x and y values, x-major.
fn regular_grid(width: f64, height: f64, nx: usize, ny: usize) -> PointSet {
    let xs = linspace(0.0, width, nx);
    let ys = linspace(0.0, height, ny);
    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| Point::new(x, y)))
        .collect()
}

/// Generates `num_points_per_side` evenly spaced points along each domain edge.
///
/// For every step the bottom, top, left and right samples are emitted in that
/// order. Corner points appear twice; they are not deduplicated.
pub fn generate_boundary_points(
    width: f64,
    height: f64,
    num_points_per_side: usize,
) -> MeshResult<PointSet> {
    ensure_positive("width", width)?;
    ensure_positive("height", height)?;
    if num_points_per_side < 2 {
        return Err(MeshError::invalid(
            "num_points_per_side",
            format!("must be at least 2, got {num_points_per_side}"),
        ));
    }

    let xs = linspace(0.0, width, num_points_per_side);
    let ys = linspace(0.0, height, num_points_per_side);
    let mut points = Vec::with_capacity(4 * num_points_per_side);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        points.extend([
            Point::new(x, 0.0),
            Point::new(x, height),
            Point::new(0.0, y),
            Point::new(width, y),
        ]);
    }
    Ok(points)
}

/// Sets `temperature` on every point lying exactly on `edge`.
///
/// Returns the number of stamped points.
pub fn stamp_edge_temperature(
    points: &mut [Point],
    edge: Edge,
    width: f64,
    height: f64,
    temperature: f64,
) -> usize {
    let mut count = 0;
    for p in points.iter_mut().filter(|p| edge.contains(p, width, height)) {
        p.temperature = Some(temperature);
        count += 1;
    }
    count
}

/// Builds a regular grid, stamps the top wall temperature and triangulates it.
pub fn generate_triangular_mesh(config: &GridConfig) -> MeshResult<(PointSet, Triangulation)> {
    config.validate()?;
    let mut points = regular_grid(
        config.width,
        config.height,
        config.num_points_x,
        config.num_points_y,
    );
    if let Some(t) = config.top_wall_temperature {
        stamp_edge_temperature(&mut points, Edge::Top, config.width, config.height, t);
    }
    let triangulation = triangulate(&points)?;
    Ok((points, triangulation))
}
