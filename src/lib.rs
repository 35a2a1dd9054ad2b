pub mod config;
pub mod error;
pub mod gradient;
pub mod grid;
pub mod interval;
pub mod mesh;
pub mod noise;
pub mod render;
pub mod sampler;
pub mod scroll;
pub mod terrain;

use std::time::Instant;

use config::{ConfigError, TerrainConfig};
use grid::GridSize;
use terrain::Terrain;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Build a terrain and optionally pan it to `(pan_x, pan_y)`, timing each stage.
pub fn generate(
    config: &TerrainConfig,
    grid: GridSize,
    pan: Option<(i64, i64)>,
) -> Result<(Box<dyn Terrain>, Vec<Timing>), ConfigError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Validate + initial mesh
    let t = Instant::now();
    let mut terrain = terrain::build(config, grid)?;
    timings.push(Timing {
        name: "build",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Incremental pan to the requested window
    if let Some((x, y)) = pan {
        let t = Instant::now();
        terrain.pan_to(x, y);
        timings.push(Timing {
            name: "pan",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });
    }

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((terrain, timings))
}
