use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use terrainpan::config::{TerrainMap, map_path};
use terrainpan::grid::GridSize;
use terrainpan::render;
use terrainpan::terrain::Terrain;

fn usage() -> ExitCode {
    eprintln!("usage: terrainpan <map name|map.json> <grid_w> <grid_h> [out_dir] [pan_x pan_y]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(map) = args.get(1).map(|a| map_path(a)) else {
        return usage();
    };
    let (Some(w), Some(h)) = (
        args.get(2).and_then(|s| s.parse::<u32>().ok()),
        args.get(3).and_then(|s| s.parse::<u32>().ok()),
    ) else {
        return usage();
    };
    let out_dir: PathBuf = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));
    let pan = match (args.get(5), args.get(6)) {
        (Some(x), Some(y)) => match (x.parse::<i64>(), y.parse::<i64>()) {
            (Ok(x), Ok(y)) => Some((x, y)),
            _ => return usage(),
        },
        _ => None,
    };
    let grid = GridSize::new(w, h);

    let config = match TerrainMap::load(&map) {
        Ok(c) => c,
        Err(e) => {
            error!(path = %map.display(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(kind = ?config.kind, w, h, ?pan, "generating terrain");
    let (terrain, timings) = match terrainpan::generate(&config, grid, pan) {
        Ok(r) => r,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        error!(dir = %out_dir.display(), "failed to create output directory: {e}");
        return ExitCode::FAILURE;
    }

    let mesh = terrain.mesh();
    let outputs = [
        ("heightmap.png", render::render_heightmap(mesh)),
        ("water_land.png", render::render_water_land(mesh)),
    ];
    for (name, rgba) in &outputs {
        if let Err(e) = save(&out_dir.join(name), rgba, grid) {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    eprintln!("\nDone.");
    ExitCode::SUCCESS
}

fn save(path: &Path, rgba: &[u8], grid: GridSize) -> Result<(), image::ImageError> {
    image::save_buffer(path, rgba, grid.w, grid.h, image::ColorType::Rgba8)?;
    info!("saved {}", path.display());
    Ok(())
}
