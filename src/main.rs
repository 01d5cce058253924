use std::path::PathBuf;

use anyhow::{Context, Result};
use heatmesh::{SimulationConfig, run_simulation_with_observer, vecutils};

fn main() -> Result<()> {
    env_logger::init();

    // Optional TOML configuration as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            SimulationConfig::from_file(&path)
                .with_context(|| format!("loading configuration from {}", path.display()))?
        }
        None => SimulationConfig::new(),
    };

    let output = run_simulation_with_observer(&config, |snapshot| {
        log::debug!("snapshot with {} points", snapshot.len());
    })
    .context("simulation failed")?;

    println!(
        "Mesh: {} points, {} triangles ({} refinement steps)",
        output.points.len(),
        output.triangulation.len(),
        output.snapshots
    );
    let t = &output.triangle_temperatures;
    println!(
        "Triangle temperatures: min = {:.2}, mean = {:.2}, max = {:.2}",
        vecutils::min(t).unwrap_or(f64::NAN),
        vecutils::mean(t).unwrap_or(f64::NAN),
        vecutils::max(t).unwrap_or(f64::NAN)
    );
    Ok(())
}
