//! End-to-end run: initial grid, refinement, triangulation, heat solve.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimulationConfig;
use crate::error::MeshResult;
use crate::geom::mesh::triangulate;
use crate::geom::point::PointSet;
use crate::geom::refine::MeshRefiner;
use crate::geom::triangles::Triangulation;
use crate::sim::heat_transfer::{Domain, HeatSolver};

/// Output of [`run_simulation`].
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Final (refined) point set.
    pub points: PointSet,
    pub triangulation: Triangulation,
    pub node_temperatures: Vec<f64>,
    pub triangle_temperatures: Vec<f64>,
    /// Number of refinement snapshots observed.
    pub snapshots: usize,
}

/// Runs the whole chain without observing intermediate snapshots.
pub fn run_simulation(config: &SimulationConfig) -> MeshResult<SimulationOutput> {
    run_simulation_with_observer(config, |_| {})
}

/// Runs the whole chain, handing every refinement snapshot to `observer`.
pub fn run_simulation_with_observer<F>(
    config: &SimulationConfig,
    mut observer: F,
) -> MeshResult<SimulationOutput>
where
    F: FnMut(&PointSet),
{
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let initial = config.grid.generate_points(&mut rng)?;
    info!("Generated {} initial points", initial.len());

    let mut refiner = MeshRefiner::new(
        initial,
        config.specified_points.clone(),
        config.refinement.clone(),
        &mut rng,
    )?;
    let mut snapshots = 0;
    for snapshot in refiner.by_ref() {
        observer(&snapshot);
        snapshots += 1;
    }
    let points = refiner.into_points();
    info!(
        "Refinement produced {} snapshots, {} points",
        snapshots,
        points.len()
    );

    // Edges come from the grid: refined points may land outside it
    let domain = Domain::new(config.grid.width, config.grid.height);
    let triangulation = triangulate(&points)?;
    let solution = HeatSolver::new(config.solver.clone()).solve_with_domain(
        &triangulation,
        &points,
        &domain,
    )?;
    info!(
        "Solved heat equation on {} triangles",
        triangulation.len()
    );

    Ok(SimulationOutput {
        points,
        triangulation,
        node_temperatures: solution.node_temperatures,
        triangle_temperatures: solution.triangle_temperatures,
        snapshots,
    })
}
