use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod check;
pub mod convert;

/// Ordered collection of points. A point is identified by its index.
pub type PointSet = Vec<Point>;

/// A 2-D point with an optional temperature attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            temperature: None,
        }
    }

    pub fn with_temperature(x: f64, y: f64, temperature: f64) -> Self {
        Self {
            x,
            y,
            temperature: Some(temperature),
        }
    }

    /// Squared Euclidean distance.
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS && (self.y - other.y).abs() < EPS
    }

    /// Moves the point by `(dx, dy)` in place.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        match self.temperature {
            Some(t) => write!(
                f,
                "Point({:.prec$}, {:.prec$}, T={:.prec$})",
                self.x,
                self.y,
                t,
                prec = prec
            ),
            None => write!(f, "Point({:.prec$}, {:.prec$})", self.x, self.y, prec = prec),
        }
    }
}
