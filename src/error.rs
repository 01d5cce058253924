//! Error types for meshing and heat solving.
//!
//! Failed insertion attempts during refinement are not errors: they are
//! skipped silently once the sampling budget is spent.

use thiserror::Error;

/// Result type used across the crate.
pub type MeshResult<T> = Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {
    /// The geometry service cannot triangulate the input.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    /// The assembled system cannot be solved.
    #[error("singular system{}: {reason}", row_suffix(.row))]
    SingularSystem { row: Option<usize>, reason: String },

    /// A parameter was rejected before any work was done.
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    /// A triangle refers to a point outside the point set.
    #[error("point index {index} out of range ({len} points)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl MeshError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub fn singular(row: Option<usize>, reason: impl Into<String>) -> Self {
        Self::SingularSystem {
            row,
            reason: reason.into(),
        }
    }

    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

/// Rejects values that are not strictly positive and finite.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> MeshResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid(parameter, format!("must be > 0, got {value}")))
    }
}

/// Rejects zero counts.
pub(crate) fn ensure_nonzero(parameter: &'static str, value: usize) -> MeshResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(MeshError::invalid(parameter, "must be > 0"))
    }
}
