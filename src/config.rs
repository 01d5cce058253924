//! Top-level configuration of a meshing + heat run.
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! seed = 7
//! specified_points = [{ x = 5.0, y = 5.0 }]
//!
//! [refinement]
//! refinement_factor = 20
//! shape = "rectangle"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::{MeshError, MeshResult};
use crate::geom::grid::GridConfig;
use crate::geom::refine::RefinementConfig;
use crate::sim::heat_transfer::HeatSolverConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub refinement: RefinementConfig,
    /// Regions of interest, refined in order.
    pub specified_points: Vec<Point>,
    pub solver: HeatSolverConfig,
    /// Seed of the random source used for scattered grids and refinement.
    pub seed: u64,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            grid: GridConfig::new(),
            refinement: RefinementConfig::new(),
            specified_points: vec![Point::new(5.0, 5.0)],
            solver: HeatSolverConfig::new(),
            seed: 0,
        }
    }

    pub fn from_toml_str(s: &str) -> MeshResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> MeshResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MeshError::invalid("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> MeshResult<()> {
        self.grid.validate()?;
        self.refinement.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
