//! Adaptive point insertion around regions of interest.
//!
//! [`MeshRefiner`] is a lazy iterator: every call to `next()` performs at most
//! one successful insertion and yields a copy of the working point set right
//! after it. Insertion attempts that run out of samples are skipped without
//! yielding. The sequence ends once every region has been processed and cannot
//! be restarted.
//!
//! ```text
//! for each specified point p:
//!     for each q in working set with |q - p| < radius (chosen when p starts):
//!         repeat refinement_factor times:
//!             draw up to `tries` samples around q
//!             first sample at >= min_distance from all points:
//!                 append, relax spacing, yield snapshot
//! ```

use std::f64::consts::TAU;
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult, ensure_nonzero, ensure_positive};
use crate::geom::point::{Point, PointSet};
use crate::geom::smooth::relax_pass;

/// Shape of the sampling region around an eligible point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionShape {
    /// Uniform angle and uniform radius in `[0, radius)`.
    #[default]
    Circle,
    /// Uniform in the square `[-radius, radius)^2`.
    Rectangle,
}

impl FromStr for RegionShape {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(RegionShape::Circle),
            "rectangle" => Ok(RegionShape::Rectangle),
            other => Err(MeshError::invalid(
                "shape",
                format!("expected 'circle' or 'rectangle', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for RegionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionShape::Circle => write!(f, "circle"),
            RegionShape::Rectangle => write!(f, "rectangle"),
        }
    }
}

/// Parameters of the refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Points closer than this to a specified point are refined around.
    pub radius: f64,
    /// Insertion attempts per eligible point.
    pub refinement_factor: usize,
    /// Minimum spacing between any two points.
    pub min_distance: f64,
    /// Random samples per insertion attempt.
    pub tries: usize,
    pub shape: RegionShape,
}

impl RefinementConfig {
    pub fn new() -> Self {
        Self {
            radius: 1.0,
            refinement_factor: 100,
            min_distance: 0.3,
            tries: 30,
            shape: RegionShape::Circle,
        }
    }

    pub fn validate(&self) -> MeshResult<()> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("min_distance", self.min_distance)?;
        ensure_nonzero("refinement_factor", self.refinement_factor)?;
        ensure_nonzero("tries", self.tries)?;
        Ok(())
    }
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy sequence of refined point-set snapshots.
pub struct MeshRefiner<R: Rng> {
    working: PointSet,
    regions: Vec<Point>,
    config: RefinementConfig,
    rng: R,
    /// Region currently processed.
    region: usize,
    /// Indices of the points eligible for the current region.
    eligible: Option<Vec<usize>>,
    /// Position in `eligible`.
    candidate: usize,
    /// Insertion attempts already made for the current candidate.
    attempt: usize,
}

impl<R: Rng> MeshRefiner<R> {
    /// Takes ownership of `points` as the working set.
    ///
    /// The configuration is validated before anything else happens.
    pub fn new(
        points: PointSet,
        specified_points: Vec<Point>,
        config: RefinementConfig,
        rng: R,
    ) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self {
            working: points,
            regions: specified_points,
            config,
            rng,
            region: 0,
            eligible: None,
            candidate: 0,
            attempt: 0,
        })
    }

    /// Current working set.
    pub fn points(&self) -> &[Point] {
        &self.working
    }

    /// Consumes the refiner and returns the working set as it stands.
    pub fn into_points(self) -> PointSet {
        self.working
    }

    fn eligible_points(&self, center: &Point) -> Vec<usize> {
        self.working
            .iter()
            .enumerate()
            .filter(|(_, q)| q.distance(center) < self.config.radius)
            .map(|(i, _)| i)
            .collect()
    }

    fn sample_around(&mut self, center: Point) -> Point {
        let radius = self.config.radius;
        match self.config.shape {
            RegionShape::Circle => {
                let angle = self.rng.gen_range(0.0..TAU);
                let r = self.rng.gen_range(0.0..radius);
                Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            }
            RegionShape::Rectangle => Point::new(
                center.x + self.rng.gen_range(-radius..radius),
                center.y + self.rng.gen_range(-radius..radius),
            ),
        }
    }

    /// Draws up to `tries` samples and returns the first well-spaced one.
    fn find_spaced_sample(&mut self, center: Point) -> Option<Point> {
        let min_distance_sq = self.config.min_distance * self.config.min_distance;
        for _ in 0..self.config.tries {
            let candidate = self.sample_around(center);
            if self
                .working
                .iter()
                .all(|p| p.distance_sq(&candidate) >= min_distance_sq)
            {
                return Some(candidate);
            }
        }
        None
    }
}

impl<R: Rng> Iterator for MeshRefiner<R> {
    type Item = PointSet;

    fn next(&mut self) -> Option<PointSet> {
        loop {
            let region = *self.regions.get(self.region)?;

            if self.eligible.is_none() {
                let eligible = self.eligible_points(&region);
                debug!(
                    "Refining around {} with {} eligible points",
                    region,
                    eligible.len()
                );
                self.eligible = Some(eligible);
            }

            let index = self
                .eligible
                .as_ref()
                .and_then(|e| e.get(self.candidate).copied());
            let Some(index) = index else {
                self.region += 1;
                self.eligible = None;
                self.candidate = 0;
                self.attempt = 0;
                continue;
            };

            if self.attempt >= self.config.refinement_factor {
                self.candidate += 1;
                self.attempt = 0;
                continue;
            }
            self.attempt += 1;

            let center = self.working[index];
            match self.find_spaced_sample(center) {
                Some(new_point) => {
                    self.working.push(new_point);
                    relax_pass(&mut self.working, self.config.min_distance);
                    debug!(
                        "Inserted {} near point {} ({} points)",
                        new_point,
                        index,
                        self.working.len()
                    );
                    return Some(self.working.clone());
                }
                None => {
                    trace!(
                        "No spaced sample near point {} after {} tries",
                        index, self.config.tries
                    );
                }
            }
        }
    }
}

impl<R: Rng> FusedIterator for MeshRefiner<R> {}

/// Runs the whole refinement and returns the final point set.
///
/// Returns `points` unchanged when no insertion succeeds.
pub fn refine_mesh<R: Rng>(
    points: PointSet,
    specified_points: Vec<Point>,
    config: RefinementConfig,
    rng: R,
) -> MeshResult<PointSet> {
    let mut refiner = MeshRefiner::new(points, specified_points, config, rng)?;
    refiner.by_ref().for_each(drop);
    Ok(refiner.into_points())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::grid::generate_grid_points;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid_10x10() -> PointSet {
        generate_grid_points(10., 10., 10, 10, true, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    fn config(factor: usize, shape: RegionShape) -> RefinementConfig {
        RefinementConfig {
            radius: 1.0,
            refinement_factor: factor,
            min_distance: 0.3,
            tries: 30,
            shape,
        }
    }

    #[test]
    fn test_snapshots_grow_by_one() {
        let points = grid_10x10();
        let refiner = MeshRefiner::new(
            points.clone(),
            vec![Point::new(5., 5.)],
            config(5, RegionShape::Circle),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        let mut prev = points.len();
        let mut count = 0;
        for snapshot in refiner {
            assert_eq!(snapshot.len(), prev + 1);
            prev = snapshot.len();
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn test_snapshot_count_is_bounded() {
        let points = grid_10x10();
        let center = Point::new(5., 5.);
        let eligible = points.iter().filter(|q| q.distance(&center) < 1.0).count();
        // Grid spacing 10/9: four points surround (5, 5)
        assert_eq!(eligible, 4);

        let refiner = MeshRefiner::new(
            points,
            vec![center],
            config(5, RegionShape::Circle),
            StdRng::seed_from_u64(11),
        )
        .unwrap();
        assert!(refiner.count() <= 5 * eligible);
    }

    #[test]
    fn test_snapshots_are_independent_copies() {
        let mut refiner = MeshRefiner::new(
            grid_10x10(),
            vec![Point::new(5., 5.)],
            config(3, RegionShape::Rectangle),
            StdRng::seed_from_u64(5),
        )
        .unwrap();
        let mut first = refiner.next().unwrap();
        let before: Vec<Point> = refiner.points().to_vec();
        first[0] = Point::new(-100., -100.);
        assert_eq!(refiner.points(), before.as_slice());
    }

    #[test]
    fn test_new_points_respect_spacing_at_insertion() {
        let cfg = config(10, RegionShape::Circle);
        let refiner = MeshRefiner::new(
            grid_10x10(),
            vec![Point::new(5., 5.)],
            cfg.clone(),
            StdRng::seed_from_u64(9),
        )
        .unwrap();
        for snapshot in refiner {
            let (new_point, rest) = snapshot.split_last().unwrap();
            assert!(new_point.temperature.is_none());
            // The grid and every accepted sample keep the spacing, so the
            // relaxation pass after an insertion moves nothing
            let nearest = rest
                .iter()
                .map(|p| p.distance(new_point))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest >= cfg.min_distance - 1e-9);
        }
    }

    #[test]
    fn test_exhausted_tries_are_skipped() {
        // The domain is saturated: no sample can be 5 units from every point.
        let points = grid_10x10();
        let cfg = RefinementConfig {
            min_distance: 5.0,
            ..config(4, RegionShape::Circle)
        };
        let mut refiner = MeshRefiner::new(
            points.clone(),
            vec![Point::new(5., 5.)],
            cfg,
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert!(refiner.next().is_none());
        // Fused: stays exhausted
        assert!(refiner.next().is_none());
        assert_eq!(refiner.into_points(), points);
    }

    #[test]
    fn test_region_without_eligible_points() {
        let points = grid_10x10();
        let refiner = MeshRefiner::new(
            points,
            vec![Point::new(50., 50.)],
            config(5, RegionShape::Circle),
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(refiner.count(), 0);
    }

    #[test]
    fn test_multiple_regions_are_chained() {
        let points = grid_10x10();
        let n = points.len();
        let refined = refine_mesh(
            points,
            vec![Point::new(2., 2.), Point::new(8., 8.)],
            config(5, RegionShape::Circle),
            StdRng::seed_from_u64(21),
        )
        .unwrap();
        assert!(refined.len() > n);
        let near = |c: Point| refined[n..].iter().filter(|p| p.distance(&c) < 3.0).count();
        assert!(near(Point::new(2., 2.)) > 0);
        assert!(near(Point::new(8., 8.)) > 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            refine_mesh(
                grid_10x10(),
                vec![Point::new(5., 5.)],
                config(5, RegionShape::Rectangle),
                StdRng::seed_from_u64(77),
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = [
            RefinementConfig {
                min_distance: 0.0,
                ..RefinementConfig::new()
            },
            RefinementConfig {
                radius: -1.0,
                ..RefinementConfig::new()
            },
            RefinementConfig {
                tries: 0,
                ..RefinementConfig::new()
            },
            RefinementConfig {
                refinement_factor: 0,
                ..RefinementConfig::new()
            },
        ];
        for cfg in bad {
            let res = MeshRefiner::new(
                grid_10x10(),
                vec![Point::new(5., 5.)],
                cfg,
                StdRng::seed_from_u64(0),
            );
            assert!(matches!(res, Err(MeshError::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn test_shape_from_str() {
        assert_eq!("circle".parse::<RegionShape>().unwrap(), RegionShape::Circle);
        assert_eq!(
            "Rectangle".parse::<RegionShape>().unwrap(),
            RegionShape::Rectangle
        );
        assert!("hexagon".parse::<RegionShape>().is_err());
        assert_eq!(RegionShape::Rectangle.to_string(), "rectangle");
    }
}
