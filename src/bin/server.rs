use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use terrainpan::config::TerrainConfig;
use terrainpan::grid::GridSize;
use terrainpan::render;
use terrainpan::terrain::Terrain;

#[derive(Deserialize)]
struct TerrainRequest {
    #[serde(default)]
    config: TerrainConfig,
    width: Option<u32>,
    height: Option<u32>,
    pan_x: Option<i64>,
    pan_y: Option<i64>,
}

#[derive(Serialize)]
struct TerrainResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: u32,
    height: u32,
    vertices: usize,
    triangles: usize,
    x_disp: i64,
    y_disp: i64,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

fn encode_png(rgba: &[u8], grid: GridSize) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, grid.w, grid.h, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

type ApiError = (StatusCode, String);

/// Largest window a request may ask for.
const MAX_GRID_VERTICES: u64 = 4096 * 4096;

fn check_grid_limit(grid: GridSize) -> Result<(), ApiError> {
    if grid.w as u64 * grid.h as u64 > MAX_GRID_VERTICES {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "grid {}x{} exceeds the {MAX_GRID_VERTICES} vertex limit",
                grid.w, grid.h
            ),
        ));
    }
    Ok(())
}

fn build_response(req: TerrainRequest) -> Result<TerrainResponse, ApiError> {
    let grid = GridSize::new(req.width.unwrap_or(255), req.height.unwrap_or(255));
    check_grid_limit(grid)?;
    let pan = match (req.pan_x, req.pan_y) {
        (None, None) => None,
        (x, y) => Some((x.unwrap_or(0), y.unwrap_or(0))),
    };

    let (terrain, timings) = terrainpan::generate(&req.config, grid, pan)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let mesh = terrain.mesh();

    let internal = |e: image::ImageError| {
        error!("PNG encode failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    };
    let layers = vec![
        Layer {
            name: "heightmap".into(),
            data_url: encode_png(&render::render_heightmap(mesh), grid).map_err(internal)?,
        },
        Layer {
            name: "water_land".into(),
            data_url: encode_png(&render::render_water_land(mesh), grid).map_err(internal)?,
        },
    ];

    let timing_entries = timings
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect();

    let disp = terrain.displacement();
    Ok(TerrainResponse {
        layers,
        timings: timing_entries,
        width: grid.w,
        height: grid.h,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        x_disp: disp.x_disp,
        y_disp: disp.y_disp,
    })
}

async fn terrain_handler(
    Json(req): Json<TerrainRequest>,
) -> Result<Json<TerrainResponse>, ApiError> {
    tokio::task::spawn_blocking(move || build_response(req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map(Json)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/terrain", post(terrain_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("terrainpan server at http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("server stopped: {e}");
        std::process::exit(1);
    }
}
