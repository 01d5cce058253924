//! Delaunay triangulation via the Bowyer-Watson incremental insertion algorithm.
//!
//! Points are inserted in index order into a super-triangle whose three
//! vertices sit at infinity. Their positions are never computed: a triangle
//! with one vertex at infinity degenerates into the half-plane beyond its
//! finite edge, a triangle with two of them into a half-plane through its
//! finite vertex. This way every hull edge is recovered, whatever the shape
//! of the point cloud.
//!
//! A point is "inside" a circumcircle only when strictly inside, so
//! cocircular configurations (e.g. regular grids) never produce zero-area
//! triangles. Points coinciding with an earlier point are not inserted and are
//! therefore not referenced by any triangle.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use log::{debug, warn};
use ndarray as nd;

use crate::Point;
use crate::error::{MeshError, MeshResult};
use crate::geom::bboxes::bounding_box;
use crate::geom::point::check::{are_points_collinear, orientation};
use crate::geom::point::convert::{array_to_points, points_to_array};
use crate::geom::triangles::{TriangleIndex, Triangulation, triangle_area};

/// Points closer than `extent / DEDUP_SCALE` (per axis) are treated as one.
const DEDUP_SCALE: f64 = 1e12;

/// Relative tolerance of the in-circle and orientation tests.
const REL_TOL: f64 = 1e-12;

/// Rotation of the directions towards the vertices at infinity.
///
/// Keeps those directions off the coordinate axes and the grid diagonals.
const INFINITY_ROTATION: f64 = 0.3;

/// Triangles smaller than this fraction of `extent^2` are dropped as slivers.
const SLIVER_AREA: f64 = 1e-14;

/// An edge key with sorted vertex indices for hashing.
#[derive(Hash, Eq, PartialEq, Clone, Copy)]
struct EdgeKey([usize; 2]);

impl EdgeKey {
    fn new(a: usize, b: usize) -> Self {
        if a < b { EdgeKey([a, b]) } else { EdgeKey([b, a]) }
    }
}

/// Triangulates a point set.
///
/// Fails with [`MeshError::DegenerateGeometry`] for fewer than 3 distinct
/// points, non-finite coordinates or fully collinear input.
pub fn triangulate(points: &[Point]) -> MeshResult<Triangulation> {
    triangulate_array(points_to_array(points).view())
}

/// Triangulates an `(N, 2)` array of `(x, y)` rows.
///
/// Triangle indices refer to array rows.
pub fn triangulate_array(coords: nd::ArrayView2<f64>) -> MeshResult<Triangulation> {
    if coords.ncols() != 2 {
        return Err(MeshError::invalid(
            "coords",
            format!("expected an (N, 2) array, got {} columns", coords.ncols()),
        ));
    }
    let points = array_to_points(coords);
    let triangles = bowyer_watson(&points)?;
    debug!(
        "Triangulated {} points into {} triangles",
        points.len(),
        triangles.len()
    );
    Ok(Triangulation::new(triangles, points.len()))
}

/// Strict in-circle test for the counter-clockwise triangle `(a, b, c)`.
fn in_circumcircle(a: &Point, b: &Point, c: &Point, p: &Point) -> bool {
    let (adx, ady) = (a.x - p.x, a.y - p.y);
    let (bdx, bdy) = (b.x - p.x, b.y - p.y);
    let (cdx, cdy) = (c.x - p.x, c.y - p.y);
    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    let det = adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx)
        + ad * (bdx * cdy - bdy * cdx);
    let magnitude = adx.abs() * (bdy.abs() * cd + bd * cdy.abs())
        + ady.abs() * (bdx.abs() * cd + bd * cdx.abs())
        + ad * ((bdx * cdy).abs() + (bdy * cdx).abs());
    det > REL_TOL * magnitude
}

/// Limit of the circumcircle of `(a, b, infinity)`: the open half-plane left
/// of `a -> b` plus the open segment `ab`.
fn in_half_plane(a: &Point, b: &Point, p: &Point) -> bool {
    let tol = REL_TOL * a.distance(b) * a.distance(p).max(b.distance(p));
    let o = orientation(a, b, p);
    if o > tol {
        true
    } else if o < -tol {
        false
    } else {
        let (ex, ey) = (b.x - a.x, b.y - a.y);
        let along_a = (p.x - a.x) * ex + (p.y - a.y) * ey;
        let along_b = (b.x - p.x) * ex + (b.y - p.y) * ey;
        along_a > 0.0 && along_b > 0.0
    }
}

/// Input points followed by the three vertices at infinity.
struct Vertices<'a> {
    points: &'a [Point],
    /// Unit directions towards the vertices at infinity, counter-clockwise.
    infinity: [(f64, f64); 3],
}

impl<'a> Vertices<'a> {
    fn new(points: &'a [Point]) -> Self {
        let direction = |k: usize| {
            let angle = FRAC_PI_2 + INFINITY_ROTATION + k as f64 * TAU / 3.0;
            (angle.cos(), angle.sin())
        };
        Self {
            points,
            infinity: [direction(0), direction(1), direction(2)],
        }
    }

    fn is_finite(&self, v: usize) -> bool {
        v < self.points.len()
    }

    fn circumcircle_contains(&self, v: [usize; 3], p: &Point) -> bool {
        let n = self.points.len();
        match v.iter().filter(|&&i| i >= n).count() {
            0 => in_circumcircle(&self.points[v[0]], &self.points[v[1]], &self.points[v[2]], p),
            1 => {
                // Rotate to (a, b, infinity), keeping the orientation
                let k = v.iter().position(|&i| i >= n).unwrap_or(2);
                let a = &self.points[v[(k + 1) % 3]];
                let b = &self.points[v[(k + 2) % 3]];
                in_half_plane(a, b, p)
            }
            2 => {
                // Half-plane through the finite vertex, facing the sum of the
                // two directions to infinity
                let mut normal = (0.0, 0.0);
                let mut a = &self.points[0];
                for &i in &v {
                    if i < n {
                        a = &self.points[i];
                    } else {
                        let (dx, dy) = self.infinity[i - n];
                        normal.0 += dx;
                        normal.1 += dy;
                    }
                }
                (p.x - a.x) * normal.0 + (p.y - a.y) * normal.1 > 0.0
            }
            _ => true,
        }
    }
}

/// Bowyer-Watson incremental Delaunay triangulation.
///
/// The returned triangles are counter-clockwise and reference indices into
/// the input `points` slice.
pub(crate) fn bowyer_watson(points: &[Point]) -> MeshResult<Vec<TriangleIndex>> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::degenerate(format!(
            "at least 3 points are required, got {n}"
        )));
    }
    if let Some(i) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(MeshError::degenerate(format!(
            "point {i} has a non-finite coordinate"
        )));
    }
    if are_points_collinear(points) {
        return Err(MeshError::degenerate("all points are collinear"));
    }
    let (pmin, pmax) =
        bounding_box(points).ok_or_else(|| MeshError::degenerate("empty point set"))?;
    let extent = (pmax.x - pmin.x).max(pmax.y - pmin.y);

    let vertices = Vertices::new(points);
    let mut tris: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];
    let mut inserted: HashMap<(i64, i64), usize> = HashMap::new();

    // Insert points one at a time
    for (i, pt) in points.iter().enumerate() {
        // Quantized relative to the bounding box: fits in i64 at any scale
        let key = (
            ((pt.x - pmin.x) / extent * DEDUP_SCALE).round() as i64,
            ((pt.y - pmin.y) / extent * DEDUP_SCALE).round() as i64,
        );
        if let Some(&first) = inserted.get(&key) {
            debug!("Skipping point {i}: coincides with point {first}");
            continue;
        }
        inserted.insert(key, i);

        let bad_indices: Vec<usize> = tris
            .iter()
            .enumerate()
            .filter(|(_, v)| vertices.circumcircle_contains(**v, pt))
            .map(|(ti, _)| ti)
            .collect();

        if bad_indices.is_empty() {
            warn!("Point {i} is not inside any circumcircle, leaving it out");
            continue;
        }

        // Cavity boundary: edges shared by exactly one bad triangle.
        // Directed edges keep the counter-clockwise orientation.
        let mut edge_count: HashMap<EdgeKey, usize> = HashMap::new();
        let mut edges: Vec<(EdgeKey, [usize; 2])> = Vec::with_capacity(bad_indices.len() * 3);
        for &bi in &bad_indices {
            let v = tris[bi];
            for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
                let key = EdgeKey::new(a, b);
                *edge_count.entry(key).or_insert(0) += 1;
                edges.push((key, [a, b]));
            }
        }

        // Remove bad triangles (in reverse order to preserve indices)
        for &bi in bad_indices.iter().rev() {
            tris.swap_remove(bi);
        }

        for (key, [a, b]) in edges {
            if edge_count.get(&key) == Some(&1) {
                tris.push([a, b, i]);
            }
        }
    }

    // Keep finite triangles, dropping slivers
    let min_area = SLIVER_AREA * extent * extent;
    let result: Vec<TriangleIndex> = tris
        .into_iter()
        .filter(|v| v.iter().all(|&vi| vertices.is_finite(vi)))
        .filter(|v| triangle_area(&points[v[0]], &points[v[1]], &points[v[2]]) > min_area)
        .map(|v| TriangleIndex(v[0], v[1], v[2]))
        .collect();

    if result.is_empty() {
        Err(MeshError::degenerate("no non-degenerate triangle could be formed"))
    } else {
        Ok(result)
    }
}
